use thiserror::Error;

use crate::processors::resolver::ResolveError;

pub type Result<T> = std::result::Result<T, StationError>;

#[derive(Error, Debug)]
pub enum StationError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid table format at line {line}: {message}")]
    TableFormat { line: u64, message: String },

    #[error("Lookup failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Form session error: {0}")]
    Session(#[from] SessionError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl StationError {
    pub fn table_format(line: u64, message: impl Into<String>) -> Self {
        StationError::TableFormat {
            line,
            message: message.into(),
        }
    }
}

/// Misuse of an editing session: writes the form would never allow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Field '{0}' is calculated and cannot be edited")]
    DerivedField(String),

    #[error("Squall measurements must be confirmed before '{0}' can be set")]
    SquallNotConfirmed(String),

    #[error("Squall direction must be a whole number of degrees between 0 and 360, got '{0}'")]
    InvalidSquallDirection(String),

    #[error("Segment {index} is out of range for '{field}' ({len} boxes)")]
    SegmentOutOfRange {
        field: &'static str,
        index: usize,
        len: usize,
    },

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("No submission is in progress")]
    NoSubmissionInFlight,

    #[error("Submit is only available from the last tab")]
    NotOnFinalTab,
}
