use std::path::PathBuf;
use thiserror::Error;

use crate::month::Month;

/// All errors produced by the event study.
#[derive(Error, Debug)]
pub enum StudyError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be parsed.
    #[error("Failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from a CSV header row.
    #[error("Column \"{column}\" not found in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// A matched row carried an index value that is not a number.
    #[error("Invalid index value \"{value}\" for \"{label}\" in {path}")]
    InvalidValue {
        path: PathBuf,
        label: String,
        value: String,
    },

    /// The item-index directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// Two item-index files map to the same month.
    #[error("Duplicate data file for month {0}")]
    DuplicateMonth(Month),

    /// The CPI table does not cover every discovered month.
    #[error("Missing CPI: found {found} of {expected} months (missing {})", join_months(.missing))]
    CpiLengthMismatch {
        expected: usize,
        found: usize,
        missing: Vec<Month>,
    },

    /// The normalisation month is not among the discovered months.
    #[error("Reference month {0} not found in data files")]
    ReferenceMonthNotFound(Month),

    /// A tracked category has no observation for some months.
    #[error("Category \"{category}\" missing for {}", join_months(.months))]
    MissingObservations { category: String, months: Vec<Month> },

    /// A series is too short to contain the reference month.
    #[error("Series \"{series}\" has {len} values, need at least {required}")]
    SeriesTooShort {
        series: String,
        len: usize,
        required: usize,
    },

    /// The normalisation divisor is zero.
    #[error("Series \"{series}\" is zero at reference month {month}")]
    ZeroBaseline { series: String, month: Month },

    /// A prior or subsequent window has no values to average.
    #[error("No {side} values for \"{series}\"")]
    EmptyWindow { series: String, side: &'static str },

    /// A statistical distribution could not be constructed.
    #[error("Statistics error: {0}")]
    Statistics(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The JSON report could not be serialised.
    #[error("Failed to serialise report: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the study crates.
pub type Result<T> = std::result::Result<T, StudyError>;

fn join_months(months: &[Month]) -> String {
    months
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
