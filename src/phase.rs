use chrono::NaiveDate;
use tracing::debug;

use crate::dates::days_between;
use crate::models::{CyclePhase, CycleRecord, PhaseResult};
use crate::settings::Settings;

/// Cycle day and phase for the most recent cycle as of `reference`.
///
/// Only an open cycle yields a phase; a missing or closed latest cycle is
/// reported as `Unknown`. `average_cycle_length` of `None` or zero falls back
/// to the 28-day default.
pub fn compute_phase(
    latest: Option<&CycleRecord>,
    reference: NaiveDate,
    average_cycle_length: Option<u32>,
) -> PhaseResult {
    compute_phase_with(&Settings::default(), latest, reference, average_cycle_length)
}

pub fn compute_phase_with(
    settings: &Settings,
    latest: Option<&CycleRecord>,
    reference: NaiveDate,
    average_cycle_length: Option<u32>,
) -> PhaseResult {
    let Some(cycle) = latest.filter(|c| c.is_open()) else {
        return PhaseResult::unknown();
    };

    let day = days_between(cycle.start_date, reference) + 1;
    if day <= 0 {
        // Start date in the future relative to the reference date.
        return PhaseResult {
            cycle_day: Some(1),
            cycle_phase: CyclePhase::Menstrual,
        };
    }

    let length = average_cycle_length
        .filter(|&l| l > 0)
        .unwrap_or(settings.default_cycle_length);
    let bounds = PhaseBounds::new(settings, length);
    let phase = bounds.classify(day);
    debug!(day, length, ?phase, "computed cycle phase");

    PhaseResult {
        cycle_day: Some(u32::try_from(day).unwrap_or(u32::MAX)),
        cycle_phase: phase,
    }
}

/// Last day (inclusive) of each phase for a given cycle length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseBounds {
    pub menstrual_end: i64,
    pub follicular_end: i64,
    pub ovulation_day: i64,
    pub ovulation_end: i64,
}

impl PhaseBounds {
    pub fn new(settings: &Settings, cycle_length: u32) -> Self {
        let menstrual_end = i64::from(settings.menstrual_days);
        let ovulation_day = i64::from(cycle_length) - i64::from(settings.luteal_phase_days);
        // Very short cycles would otherwise produce an empty follicular window.
        let follicular_end = if ovulation_day > menstrual_end {
            ovulation_day - 3
        } else {
            menstrual_end
        };
        Self {
            menstrual_end,
            follicular_end,
            ovulation_day,
            ovulation_end: ovulation_day + 2,
        }
    }

    /// The menstrual check wins even when `follicular_end` is below it.
    pub fn classify(&self, day: i64) -> CyclePhase {
        if day <= self.menstrual_end {
            CyclePhase::Menstrual
        } else if day <= self.follicular_end {
            CyclePhase::Follicular
        } else if day <= self.ovulation_end {
            CyclePhase::Ovulation
        } else {
            CyclePhase::Luteal
        }
    }
}

/// Fraction of the cycle elapsed; `0.0` for a zero length. Not clamped, so
/// overdue cycles report values above one.
pub fn cycle_progress(cycle_day: u32, cycle_length: u32) -> f64 {
    if cycle_length == 0 {
        return 0.0;
    }
    f64::from(cycle_day) / f64::from(cycle_length)
}
