//! Console report lines and the JSON report.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use study_core::formatting::{export_label, format_p_value};
use study_core::models::{CategoryChange, Series, StudyResult};
use study_core::settings::StudyConfig;
use study_core::stats::Alternative;
use study_core::{Result, StudyError};
use tracing::info;

// ── Console lines ─────────────────────────────────────────────────────────────

/// `CPI data: [..]` with the values as read.
pub fn cpi_summary_line(result: &StudyResult) -> String {
    format!("CPI data: {:?}", result.raw_cpi)
}

/// Spreadsheet-friendly block: a `Date, dd/mm/yyyy, ..` header row, then one
/// row per series (CPI first) with its normalised values.
pub fn export_block(result: &StudyResult) -> Vec<String> {
    let dates: Vec<String> = result.months.iter().map(|m| m.export_label()).collect();
    let mut lines = vec![format!("Date, {}", dates.join(", "))];
    lines.extend(result.all_series().map(export_row));
    lines
}

fn export_row(series: &Series) -> String {
    let values: Vec<String> = series.values.iter().map(|v| format!("{:?}", v)).collect();
    format!("{}, {}", export_label(&series.label), values.join(", "))
}

/// One line per category describing its significance test.
pub fn t_test_lines(result: &StudyResult, config: &StudyConfig) -> Vec<String> {
    result
        .changes
        .iter()
        .map(|change| t_test_line(change, config.test_window))
        .collect()
}

fn t_test_line(change: &CategoryChange, window: usize) -> String {
    let prefix = format!("{} month t-test for {}", window, change.label);
    match change.test {
        Some(test) => {
            let flag = if test.direction_matches() {
                ""
            } else {
                " [observed change contradicts hypothesis]"
            };
            format!(
                "{}: statistic={:.4}, df={:.2}, pvalue={} (alternative: {}){}",
                prefix,
                test.statistic,
                test.degrees_of_freedom,
                format_p_value(test.p_value),
                test.alternative,
                flag
            )
        }
        None => format!("{}: not computable", prefix),
    }
}

// ── JSON report ───────────────────────────────────────────────────────────────

/// Machine-readable summary of a study run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyReport {
    pub generated_at: DateTime<Utc>,
    pub title: String,
    pub target: String,
    /// `YYYY-MM`.
    pub reference_month: String,
    pub bar_window: usize,
    pub test_window: usize,
    pub alternative: Alternative,
    /// `YYYY-MM`, ascending.
    pub months: Vec<String>,
    pub raw_cpi: Vec<f64>,
    /// Normalised series, CPI first.
    pub series: Vec<Series>,
    pub changes: Vec<CategoryChange>,
    pub dropped: Vec<String>,
}

impl StudyReport {
    pub fn new(result: &StudyResult, config: &StudyConfig) -> Self {
        Self {
            generated_at: Utc::now(),
            title: config.title.clone(),
            target: config.target.clone(),
            reference_month: result.reference_month().to_string(),
            bar_window: config.bar_window,
            test_window: config.test_window,
            alternative: config.alternative,
            months: result.months.iter().map(|m| m.to_string()).collect(),
            raw_cpi: result.raw_cpi.clone(),
            series: result.all_series().cloned().collect(),
            changes: result.changes.clone(),
            dropped: result.dropped.clone(),
        }
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(StudyError::Io)?;
        info!("Report written to {}", path.display());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
