use thiserror::Error;

/// Errors surfaced by the analytical core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngagementError {
    /// A raw record's date did not parse as a `YYYY-MM-DD` calendar day.
    #[error("record {index} of type `{kind}` has malformed date `{value}`")]
    MalformedDate {
        kind: String,
        index: usize,
        value: String,
    },

    /// A date-range boundary did not parse as a `YYYY-MM-DD` calendar day.
    #[error("invalid {field} date `{value}`, expected YYYY-MM-DD")]
    InvalidRangeDate { field: &'static str, value: String },

    #[error("Start date must be before end date.")]
    StartAfterEnd,

    #[error("Start date must be in the past.")]
    StartInFuture,

    #[error("End date must be in the past.")]
    EndInFuture,
}

pub type Result<T> = std::result::Result<T, EngagementError>;
