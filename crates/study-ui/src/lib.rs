//! Terminal UI for the CPI event study.
//!
//! Provides themes, the change and price charts, the header and logo
//! components, and the application event loop built on top of
//! [`ratatui`].

pub mod app;
pub mod change_chart;
pub mod chart_data;
pub mod components;
pub mod price_chart;
pub mod themes;

pub use study_core as core;
