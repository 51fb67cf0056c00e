use chrono::NaiveDate;

use crate::dates::parse_date;
use crate::error::CycleError;
use crate::history::CycleHistory;
use crate::models::*;
use crate::phase;
use crate::prediction;
use crate::settings::Settings;

/// Cycle day and phase as of `reference`, using the history average for
/// phase boundaries when one is available.
pub fn current_phase(
    history: &CycleHistory,
    reference: NaiveDate,
    settings: &Settings,
) -> PhaseResult {
    let average = prediction::predict_with(settings, history.records()).average_cycle_length;
    phase::compute_phase_with(settings, history.latest(), reference, average)
}

/// Current phase with the ring progress and phase card text.
pub fn phase_report(
    history: &CycleHistory,
    reference: NaiveDate,
    settings: &Settings,
) -> PhaseReport {
    let cycle_length = prediction::predict_with(settings, history.records())
        .average_cycle_length
        .unwrap_or(settings.default_cycle_length);
    let result = current_phase(history, reference, settings);
    PhaseReport {
        progress: result
            .cycle_day
            .map(|day| phase::cycle_progress(day, cycle_length)),
        title: result.cycle_phase.title().map(str::to_string),
        description: result.cycle_phase.description().map(str::to_string),
        cycle_length,
        phase: result,
    }
}

pub fn predictions(
    history: &CycleHistory,
    reference: NaiveDate,
    settings: &Settings,
) -> PredictionReport {
    let prediction = prediction::predict_with(settings, history.records());
    PredictionReport {
        reference_date: reference,
        upcoming: prediction::upcoming(&prediction, reference),
        prediction,
    }
}

pub fn stats(history: &CycleHistory) -> CycleStats {
    prediction::cycle_stats(history.records())
}

/// The cycle block fed to coaching and nutrition prompts.
pub fn health_context(
    history: &CycleHistory,
    reference: NaiveDate,
    settings: &Settings,
) -> HealthContext {
    current_phase(history, reference, settings).into()
}

/// Record a period start given as a caller-supplied date string.
pub fn start_cycle(
    history: &mut CycleHistory,
    date: &str,
    notes: Option<String>,
) -> Result<CycleRecord, CycleError> {
    let start = parse_date("startDate", date)?;
    history.start_cycle(start, notes).cloned()
}
