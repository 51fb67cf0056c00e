use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logged menstrual cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CycleRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Days from this cycle's start to the next one's. Only set once completed.
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CycleRecord {
    /// A new open cycle starting on `start_date`.
    pub fn open(start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_date,
            end_date: None,
            length: None,
            notes: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
    Unknown,
}

impl CyclePhase {
    pub fn title(self) -> Option<&'static str> {
        match self {
            Self::Menstrual => Some("Menstrual Phase"),
            Self::Follicular => Some("Follicular Phase"),
            Self::Ovulation => Some("Ovulation Phase"),
            Self::Luteal => Some("Luteal Phase"),
            Self::Unknown => None,
        }
    }

    pub fn description(self) -> Option<&'static str> {
        match self {
            Self::Menstrual => Some(
                "Your body is shedding the uterine lining. Rest and gentle movement are key.",
            ),
            Self::Follicular => Some(
                "Energy rises as your body prepares for ovulation. A great time for new beginnings.",
            ),
            Self::Ovulation => {
                Some("Peak fertility. You might feel more social and energetic.")
            }
            Self::Luteal => Some(
                "Energy may decrease as your body prepares for your period. Focus on self-care.",
            ),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Menstrual => "Menstrual",
            Self::Follicular => "Follicular",
            Self::Ovulation => "Ovulation",
            Self::Luteal => "Luteal",
            Self::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhaseResult {
    pub cycle_day: Option<u32>,
    pub cycle_phase: CyclePhase,
}

impl PhaseResult {
    pub fn unknown() -> Self {
        Self {
            cycle_day: None,
            cycle_phase: CyclePhase::Unknown,
        }
    }
}

/// Phase plus what the cycle ring and phase card display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhaseReport {
    #[serde(flatten)]
    pub phase: PhaseResult,
    /// Cycle length the phase boundaries were drawn from.
    pub cycle_length: u32,
    pub progress: Option<f64>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Projected dates for the current cycle. All date fields are `None`
/// whenever `average_cycle_length` is.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub average_cycle_length: Option<u32>,
    pub next_period_start: Option<NaiveDate>,
    pub ovulation_date: Option<NaiveDate>,
    pub fertile_window_start: Option<NaiveDate>,
}

impl PredictionResult {
    pub fn is_empty(&self) -> bool {
        self.average_cycle_length.is_none()
    }
}

/// A predicted date relative to the caller's reference date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEvent {
    pub date: Option<NaiveDate>,
    pub days_away: Option<i64>,
    /// False when there is no date or it is not after the reference date.
    pub is_upcoming: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingPredictions {
    pub next_period: UpcomingEvent,
    pub next_ovulation: UpcomingEvent,
    pub fertile_window: UpcomingEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReport {
    pub reference_date: NaiveDate,
    pub prediction: PredictionResult,
    pub upcoming: UpcomingPredictions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CycleStats {
    pub total_cycles: usize,
    pub completed_cycles: usize,
    pub avg_cycle_length: Option<u32>,
    pub shortest_cycle: Option<u32>,
    pub longest_cycle: Option<u32>,
    pub last_period_start: Option<NaiveDate>,
}

/// Cycle block handed to prompt builders alongside symptoms and meals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthContext {
    pub day: Option<u32>,
    pub phase: CyclePhase,
}

impl From<PhaseResult> for HealthContext {
    fn from(result: PhaseResult) -> Self {
        Self {
            day: result.cycle_day,
            phase: result.cycle_phase,
        }
    }
}

impl fmt::Display for HealthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.day, self.phase) {
            (_, CyclePhase::Unknown) | (None, _) => f.write_str("Cycle phase unknown"),
            (Some(day), phase) => write!(f, "Cycle day {day} ({phase} phase)"),
        }
    }
}
