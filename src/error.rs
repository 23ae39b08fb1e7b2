use thiserror::Error;

/// Fatal errors that end a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("percentile must be a number in (0, 100], got {value:?}")]
    InvalidPercentile { value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Reasons a contribution line is rejected by the validator.
///
/// None of these are fatal: the offending line is skipped and the stream
/// continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("OTHER_ID is set, not an individual contribution")]
    NotIndividual,

    #[error("CMTE_ID is empty")]
    MissingRecipient,

    #[error("NAME is empty")]
    MissingName,

    #[error("invalid zip code {0:?}")]
    InvalidZipCode(String),

    #[error("invalid transaction date {0:?}")]
    InvalidDate(String),

    #[error("invalid transaction amount {0:?}")]
    InvalidAmount(String),

    #[error("record is not valid UTF-8")]
    InvalidEncoding,
}
