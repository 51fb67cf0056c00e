use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("invalid date for {field}: {input:?}")]
    InvalidDate { field: &'static str, input: String },
    #[error("date out of range: {0}")]
    DateOutOfRange(NaiveDate),
    #[error("new cycle start {start} must be after the current cycle start {latest}")]
    OutOfOrder { start: NaiveDate, latest: NaiveDate },
}
