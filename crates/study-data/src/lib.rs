//! Loading and analysing the ONS price index files.
//!
//! [`reader`] finds and parses the CSV inputs, [`extractor`] lines the CPI
//! and tracked categories up against the discovered months, [`analysis`]
//! normalises and compares them, and [`export`] renders the results.

pub mod analysis;
pub mod export;
pub mod extractor;
pub mod reader;

pub use analysis::run_study;
pub use export::StudyReport;
