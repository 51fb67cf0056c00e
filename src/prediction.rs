use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::dates::{add_days, days_between, round_half_up};
use crate::models::{
    CycleRecord, CycleStats, PredictionResult, UpcomingEvent, UpcomingPredictions,
};
use crate::settings::Settings;

/// Project the next period, ovulation and fertile window from history
/// ordered most-recent-first. Requires the current cycle plus at least one
/// older cycle with a recorded length.
pub fn predict(history: &[CycleRecord]) -> PredictionResult {
    predict_with(&Settings::default(), history)
}

pub fn predict_with(settings: &Settings, history: &[CycleRecord]) -> PredictionResult {
    let Some((current, older)) = history.split_first() else {
        return PredictionResult::default();
    };
    let Some(avg_cycle) = average_cycle_length(older) else {
        return PredictionResult::default();
    };

    // Ovulation sits a fixed luteal phase before the next expected period.
    let ovulation_offset = i64::from(avg_cycle) - i64::from(settings.luteal_phase_days);
    let last_start = current.start_date;

    let projected = add_days(last_start, i64::from(avg_cycle)).and_then(|next_period| {
        let ovulation = add_days(last_start, ovulation_offset)?;
        let fertile_start = add_days(ovulation, -i64::from(settings.fertile_window_days))?;
        Some((next_period, ovulation, fertile_start))
    });

    match projected {
        Some((next_period, ovulation, fertile_start)) => {
            debug!(avg_cycle, %next_period, %ovulation, "predicted next cycle");
            PredictionResult {
                average_cycle_length: Some(avg_cycle),
                next_period_start: Some(next_period),
                ovulation_date: Some(ovulation),
                fertile_window_start: Some(fertile_start),
            }
        }
        None => {
            warn!(avg_cycle, %last_start, "predicted dates out of range");
            PredictionResult::default()
        }
    }
}

/// Rounded mean of the recorded lengths. Cycles without a length, or with a
/// zero length, do not count as completed.
pub fn average_cycle_length(completed: &[CycleRecord]) -> Option<u32> {
    let lengths: Vec<u32> = recorded_lengths(completed).collect();
    rounded_mean(&lengths)
}

/// Express a prediction relative to `reference`. Past or missing dates are
/// flagged as not upcoming.
pub fn upcoming(prediction: &PredictionResult, reference: NaiveDate) -> UpcomingPredictions {
    UpcomingPredictions {
        next_period: upcoming_event(prediction.next_period_start, reference),
        next_ovulation: upcoming_event(prediction.ovulation_date, reference),
        fertile_window: upcoming_event(prediction.fertile_window_start, reference),
    }
}

fn upcoming_event(date: Option<NaiveDate>, reference: NaiveDate) -> UpcomingEvent {
    UpcomingEvent {
        date,
        days_away: date.map(|d| days_between(reference, d)),
        is_upcoming: date.is_some_and(|d| d > reference),
    }
}

/// Summary numbers for the history view. Unlike `predict`, every record with
/// a length counts here, the current one included.
pub fn cycle_stats(history: &[CycleRecord]) -> CycleStats {
    let lengths: Vec<u32> = recorded_lengths(history).collect();

    CycleStats {
        total_cycles: history.len(),
        completed_cycles: lengths.len(),
        avg_cycle_length: rounded_mean(&lengths),
        shortest_cycle: lengths.iter().copied().min(),
        longest_cycle: lengths.iter().copied().max(),
        last_period_start: history.first().map(|c| c.start_date),
    }
}

fn recorded_lengths(records: &[CycleRecord]) -> impl Iterator<Item = u32> + '_ {
    records.iter().filter_map(|c| c.length).filter(|&l| l > 0)
}

fn rounded_mean(values: &[u32]) -> Option<u32> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().copied().map(f64::from).sum();
    let avg = round_half_up(sum / values.len() as f64);
    avg.is_finite().then_some(avg as u32)
}
