//! Shared types for the CPI event study.
//!
//! Months, series, the error type, command-line settings, the statistics used
//! to compare prices before and after the reference month, and display
//! formatting helpers.

pub mod error;
pub mod formatting;
pub mod models;
pub mod month;
pub mod settings;
pub mod stats;

pub use error::{Result, StudyError};
pub use month::Month;
