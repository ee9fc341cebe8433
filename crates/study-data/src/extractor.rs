//! Pull the CPI and the tracked categories out of the loaded tables.

use std::path::Path;

use study_core::models::Series;
use study_core::settings::{SourceLayout, StudyConfig};
use study_core::{Month, Result, StudyError};
use tracing::{debug, info, warn};

use crate::reader::{parse_value, read_index_table, IndexRow, MonthFile};

// ── CPI ───────────────────────────────────────────────────────────────────────

/// Load the CPI value for every month in `months`, in the same order.
pub fn load_cpi(layout: &SourceLayout, months: &[Month]) -> Result<Vec<f64>> {
    info!("Reading CPI data from {}", layout.cpi_file.display());
    let rows = read_index_table(
        &layout.cpi_file,
        &layout.cpi_label_column,
        &layout.cpi_value_column,
    )?;
    align_cpi(&layout.cpi_file, &rows, months)
}

/// Match CPI rows to months by their `"YYYY MON"` label.
///
/// The first row with a matching label wins.  Every month must be present;
/// otherwise the run stops with [`StudyError::CpiLengthMismatch`] listing
/// the months that were not found.
pub fn align_cpi(path: &Path, rows: &[IndexRow], months: &[Month]) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(months.len());
    let mut missing = Vec::new();

    for &month in months {
        let label = month.cpi_label();
        match rows.iter().find(|row| row.label == label) {
            Some(row) => values.push(parse_value(path, row)?),
            None => missing.push(month),
        }
    }

    if !missing.is_empty() {
        return Err(StudyError::CpiLengthMismatch {
            expected: months.len(),
            found: values.len(),
            missing,
        });
    }

    info!("CPI data: {:?}", values);
    Ok(values)
}

// ── Categories ────────────────────────────────────────────────────────────────

/// Per-category observations, possibly with gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    pub months: Vec<Month>,
    pub categories: Vec<String>,
    /// `cells[category][month]`.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl CategoryTable {
    /// Months for which `category_index` has no observation.
    pub fn gaps(&self, category_index: usize) -> Vec<Month> {
        self.cells[category_index]
            .iter()
            .zip(&self.months)
            .filter(|(cell, _)| cell.is_none())
            .map(|(_, &month)| month)
            .collect()
    }
}

/// Find each category's value in one month's rows.
///
/// Single pass over the rows; the first row matching a category wins and
/// later duplicates are ignored.  Only matched rows have their values parsed.
pub fn extract_month(path: &Path, rows: &[IndexRow], categories: &[String]) -> Result<Vec<Option<f64>>> {
    let mut found: Vec<Option<f64>> = vec![None; categories.len()];

    for row in rows {
        let Some(idx) = categories.iter().position(|c| *c == row.label) else {
            continue;
        };
        if found[idx].is_some() {
            debug!(
                "{}:{}: ignoring repeated row for \"{}\"",
                path.display(),
                row.line,
                row.label
            );
            continue;
        }
        found[idx] = Some(parse_value(path, row)?);
    }

    Ok(found)
}

/// Read every month file and extract the tracked categories.
pub fn extract_categories(
    layout: &SourceLayout,
    files: &[MonthFile],
    categories: &[String],
) -> Result<CategoryTable> {
    let mut cells: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(files.len()); categories.len()];

    for file in files {
        info!("Reading ONS data for {}...", file.month.progress_label());
        let rows = read_index_table(&file.path, &layout.item_column, &layout.value_column)?;
        let found = extract_month(&file.path, &rows, categories)?;

        let summary: Vec<String> = categories
            .iter()
            .zip(&found)
            .filter_map(|(label, value)| value.map(|v| format!("{}: {}", label, v)))
            .collect();
        debug!("{}: {{{}}}", file.month.progress_label(), summary.join(", "));

        for (column, value) in cells.iter_mut().zip(found) {
            column.push(value);
        }
    }

    Ok(CategoryTable {
        months: files.iter().map(|f| f.month).collect(),
        categories: categories.to_vec(),
        cells,
    })
}

/// Turn the table into complete series, checking every month is covered.
///
/// The target category must be complete.  An incomplete comparable fails the
/// run unless `config.drop_incomplete` is set, in which case it is dropped
/// with a warning and its label returned in the second element.
pub fn complete_series(table: &CategoryTable, config: &StudyConfig) -> Result<(Vec<Series>, Vec<String>)> {
    let mut series = Vec::with_capacity(table.categories.len());
    let mut dropped = Vec::new();

    for (idx, label) in table.categories.iter().enumerate() {
        let gaps = table.gaps(idx);
        if gaps.is_empty() {
            let values = table.cells[idx].iter().flatten().copied().collect();
            series.push(Series::new(label.clone(), values));
            continue;
        }

        let is_target = *label == config.target;
        if is_target || !config.drop_incomplete {
            return Err(StudyError::MissingObservations {
                category: label.clone(),
                months: gaps,
            });
        }

        warn!(
            "Dropping \"{}\": missing {} of {} months",
            label,
            gaps.len(),
            table.months.len()
        );
        dropped.push(label.clone());
    }

    Ok((series, dropped))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
