use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dates::{add_days, days_between};
use crate::error::CycleError;
use crate::models::CycleRecord;

/// A user's cycles, kept most-recent-first by start date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CycleRecord>", into = "Vec<CycleRecord>")]
pub struct CycleHistory {
    records: Vec<CycleRecord>,
}

impl From<Vec<CycleRecord>> for CycleHistory {
    fn from(records: Vec<CycleRecord>) -> Self {
        Self::new(records)
    }
}

impl From<CycleHistory> for Vec<CycleRecord> {
    fn from(history: CycleHistory) -> Self {
        history.records
    }
}

impl CycleHistory {
    pub fn new(mut records: Vec<CycleRecord>) -> Self {
        records.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Self { records }
    }

    pub fn records(&self) -> &[CycleRecord] {
        &self.records
    }

    /// The current cycle, if any has been logged.
    pub fn latest(&self) -> Option<&CycleRecord> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fill in missing lengths of older cycles from the gap to the next start.
    /// Recorded lengths are left untouched.
    pub fn with_derived_lengths(mut self) -> Self {
        for i in 1..self.records.len() {
            let newer_start = self.records[i - 1].start_date;
            let cycle = &mut self.records[i];
            if cycle.length.is_none() {
                cycle.length = u32::try_from(days_between(cycle.start_date, newer_start)).ok();
            }
        }
        self
    }

    /// Log a new period start. The previous open cycle is closed on the day
    /// before and given its length.
    pub fn start_cycle(
        &mut self,
        start_date: NaiveDate,
        notes: Option<String>,
    ) -> Result<&CycleRecord, CycleError> {
        if let Some(latest) = self.records.first_mut() {
            if start_date <= latest.start_date {
                return Err(CycleError::OutOfOrder {
                    start: start_date,
                    latest: latest.start_date,
                });
            }
            if latest.is_open() {
                let day_before =
                    add_days(start_date, -1).ok_or(CycleError::DateOutOfRange(start_date))?;
                latest.end_date = Some(day_before);
            }
            if latest.length.is_none() {
                latest.length = u32::try_from(days_between(latest.start_date, start_date)).ok();
            }
        }

        let mut record = CycleRecord::open(start_date);
        record.notes = notes;
        info!(id = %record.id, %start_date, "started new cycle");
        self.records.insert(0, record);
        Ok(&self.records[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn sorts_most_recent_first() {
        let history = CycleHistory::new(vec![
            CycleRecord::open(d(2026, 1, 1)),
            CycleRecord::open(d(2026, 2, 28)),
            CycleRecord::open(d(2026, 1, 29)),
        ]);
        let starts: Vec<_> = history.records().iter().map(|c| c.start_date).collect();
        assert_eq!(starts, vec![d(2026, 2, 28), d(2026, 1, 29), d(2026, 1, 1)]);
        assert_eq!(history.latest().unwrap().start_date, d(2026, 2, 28));
    }

    #[test]
    fn derives_missing_lengths() {
        let mut recorded = CycleRecord::open(d(2026, 1, 1));
        recorded.length = Some(27);
        let history = CycleHistory::new(vec![
            recorded,
            CycleRecord::open(d(2026, 1, 29)),
            CycleRecord::open(d(2026, 2, 28)),
        ])
        .with_derived_lengths();

        let lengths: Vec<_> = history.records().iter().map(|c| c.length).collect();
        assert_eq!(lengths, vec![None, Some(30), Some(27)]);
    }

    #[test]
    fn start_cycle_closes_previous() {
        let mut history = CycleHistory::new(vec![CycleRecord::open(d(2026, 1, 1))]);
        let new = history
            .start_cycle(d(2026, 1, 29), Some("cramps".into()))
            .unwrap();
        assert!(new.is_open());
        assert_eq!(new.notes.as_deref(), Some("cramps"));

        assert_eq!(history.len(), 2);
        let previous = &history.records()[1];
        assert_eq!(previous.end_date, Some(d(2026, 1, 28)));
        assert_eq!(previous.length, Some(28));
    }

    #[test]
    fn start_cycle_on_empty_history() {
        let mut history = CycleHistory::default();
        history.start_cycle(d(2026, 1, 1), None).unwrap();
        assert_eq!(history.len(), 1);
        assert!(history.latest().unwrap().is_open());
    }

    #[test]
    fn start_cycle_rejects_out_of_order() {
        let mut history = CycleHistory::new(vec![CycleRecord::open(d(2026, 2, 1))]);
        let err = history.start_cycle(d(2026, 2, 1), None).unwrap_err();
        assert!(matches!(err, CycleError::OutOfOrder { .. }));
        assert!(history.start_cycle(d(2026, 1, 15), None).is_err());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn serializes_as_array() {
        let history = CycleHistory::new(vec![CycleRecord::open(d(2026, 2, 1))]);
        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        let back: CycleHistory = serde_json::from_value(json).unwrap();
        assert_eq!(back, history);
    }
}
