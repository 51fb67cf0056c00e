use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates::parse_date;
use crate::error::CycleError;
use crate::history::CycleHistory;
use crate::models::CycleRecord;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("cycle #{index}: {source}")]
    InvalidRecord { index: usize, source: CycleError },
}

/// A cycle as handed over by callers, dates still unparsed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCycle {
    id: Option<Uuid>,
    start_date: String,
    end_date: Option<String>,
    length: Option<u32>,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Wrapped { cycles: Vec<RawCycle> },
    Bare(Vec<RawCycle>),
}

#[derive(Serialize)]
struct Document<'a> {
    cycles: &'a [CycleRecord],
}

impl RawCycle {
    fn into_record(self) -> Result<CycleRecord, CycleError> {
        let start_date = parse_date("startDate", &self.start_date)?;
        let end_date = self
            .end_date
            .as_deref()
            .map(|s| parse_date("endDate", s))
            .transpose()?;
        Ok(CycleRecord {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            start_date,
            end_date,
            length: self.length,
            notes: self.notes,
        })
    }
}

/// Parse a history document: `{"cycles": [...]}` or a bare array. Any
/// malformed date fails the whole document. Older cycles logged without a
/// length get one from the gap to the next start.
pub fn parse_history(bytes: &[u8]) -> Result<CycleHistory, StorageError> {
    let raw = match serde_json::from_slice::<RawDocument>(bytes)? {
        RawDocument::Wrapped { cycles } | RawDocument::Bare(cycles) => cycles,
    };
    let records = raw
        .into_iter()
        .enumerate()
        .map(|(index, cycle)| {
            cycle
                .into_record()
                .map_err(|source| StorageError::InvalidRecord { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CycleHistory::new(records).with_derived_lengths())
}

pub fn load_history(path: &Path) -> Result<CycleHistory, StorageError> {
    let bytes = fs::read(path)?;
    parse_history(&bytes)
}

pub fn history_to_json(history: &CycleHistory) -> Result<String, StorageError> {
    let doc = Document {
        cycles: history.records(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use chrono::NaiveDate;
    use std::io::Write;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_wrapped_document() {
        let json = br#"{"cycles": [
            {"startDate": "2026-01-01", "endDate": "2026-01-05", "length": 28},
            {"startDate": "2026-01-29T08:00:00Z", "notes": "heavy"}
        ]}"#;
        let history = parse_history(json).unwrap();
        assert_eq!(history.len(), 2);
        let latest = history.latest().unwrap();
        assert_eq!(latest.start_date, d(2026, 1, 29));
        assert!(latest.is_open());
        assert_eq!(latest.notes.as_deref(), Some("heavy"));
        assert_eq!(history.records()[1].end_date, Some(d(2026, 1, 5)));
    }

    #[test]
    fn parses_bare_array() {
        let history = parse_history(br#"[{"startDate": "2026-01-01"}]"#).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn bad_date_names_record_and_field() {
        let json = br#"[{"startDate": "2026-01-01"}, {"startDate": "2026-01-29", "endDate": "soon"}]"#;
        let err = parse_history(json).unwrap_err();
        match err {
            StorageError::InvalidRecord { index, source } => {
                assert_eq!(index, 1);
                assert!(matches!(source, CycleError::InvalidDate { field: "endDate", .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn loads_from_file_and_writes_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"cycles": [{{"startDate": "2026-02-01"}}]}}"#).unwrap();

        let history = load_history(file.path()).unwrap();
        let json = history_to_json(&history).unwrap();
        let reparsed = parse_history(json.as_bytes()).unwrap();
        assert_eq!(reparsed, history);
    }

    #[test]
    fn bare_start_dates_predict_next_period() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"startDate":"2026-01-01"}},{{"startDate":"2026-01-29"}},{{"startDate":"2026-02-26"}}]"#
        )
        .unwrap();

        let history = load_history(file.path()).unwrap();
        let lengths: Vec<_> = history.records().iter().map(|c| c.length).collect();
        assert_eq!(lengths, vec![None, Some(28), Some(28)]);

        let report = crate::commands::predictions(&history, d(2026, 3, 1), &Settings::default());
        assert_eq!(report.prediction.average_cycle_length, Some(28));
        assert_eq!(report.prediction.next_period_start, Some(d(2026, 3, 26)));
    }

    #[test]
    fn recorded_length_wins_over_gap() {
        let json = br#"[{"startDate": "2026-01-01", "length": 30}, {"startDate": "2026-01-29"}]"#;
        let history = parse_history(json).unwrap();
        assert_eq!(history.records()[1].length, Some(30));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_history(Path::new("/nonexistent/cycles.json")).unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
