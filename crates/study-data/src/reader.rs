//! Item-index file discovery and CSV loading.
//!
//! Monthly item-index files are found by name (`<prefix><YYYY><MM>.<ext>`)
//! in a single directory.  Both those files and the CPI table are read as
//! plain `(label, value)` rows; values stay as text until a row is actually
//! matched, so unrelated malformed rows never stop a run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use study_core::settings::SourceLayout;
use study_core::{Month, Result, StudyError};
use tracing::{debug, warn};

// ── Public types ──────────────────────────────────────────────────────────────

/// An item-index file and the month it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthFile {
    pub month: Month,
    pub path: PathBuf,
}

/// One data row of an index table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    /// 1-based line number in the source file.
    pub line: usize,
    /// Item description or month label.
    pub label: String,
    /// Raw index value text.
    pub value: String,
}

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Find every item-index file in `layout.data_dir`, sorted by month.
///
/// Only the top level of the directory is scanned.  Files whose names do not
/// match the pattern (or carry an impossible month number) are skipped.  The
/// extension is matched case-insensitively, so two files for the same month
/// are reported as [`StudyError::DuplicateMonth`].
pub fn discover_month_files(layout: &SourceLayout) -> Result<Vec<MonthFile>> {
    let dir = &layout.data_dir;
    if !dir.is_dir() {
        return Err(StudyError::DataPathNotFound(dir.clone()));
    }

    let pattern = month_file_pattern(&layout.file_prefix, &layout.file_extension)?;

    let mut files: Vec<MonthFile> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?;
            match parse_month_file_name(&pattern, name) {
                Some(month) => Some(MonthFile {
                    month,
                    path: entry.into_path(),
                }),
                None => {
                    debug!("Ignoring {}", entry.path().display());
                    None
                }
            }
        })
        .collect();

    files.sort_by(|a, b| a.month.cmp(&b.month).then_with(|| a.path.cmp(&b.path)));

    if let Some(pair) = files.windows(2).find(|w| w[0].month == w[1].month) {
        return Err(StudyError::DuplicateMonth(pair[0].month));
    }

    if files.is_empty() {
        warn!("No item-index files found in {}", dir.display());
    } else {
        debug!("Discovered {} item-index files in {}", files.len(), dir.display());
    }

    Ok(files)
}

/// Build the file-name regex for `<prefix><YYYY><MM>.<ext>`.
fn month_file_pattern(prefix: &str, extension: &str) -> Result<Regex> {
    let source = format!(
        r"^{}(\d{{4}})(\d{{2}})\.(?i:{})$",
        regex::escape(prefix),
        regex::escape(extension)
    );
    Regex::new(&source).map_err(|e| StudyError::Config(format!("invalid file pattern: {}", e)))
}

fn parse_month_file_name(pattern: &Regex, name: &str) -> Option<Month> {
    let caps = pattern.captures(name)?;
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    Month::new(year, month)
}

// ── Table loading ─────────────────────────────────────────────────────────────

/// Read the `(label_column, value_column)` pairs of every data row in a CSV.
///
/// Header names are compared after trimming and stripping a UTF-8 BOM.
/// Cells are decoded lossily since some published files are not valid UTF-8.
pub fn read_index_table(
    path: &Path,
    label_column: &str,
    value_column: &str,
) -> Result<Vec<IndexRow>> {
    let file = std::fs::File::open(path).map_err(|source| StudyError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let csv_error = |source: csv::Error| StudyError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.byte_headers().map_err(csv_error)?.clone();
    let header_map = build_header_map(&headers);

    let column = |name: &str| {
        header_map
            .get(name)
            .copied()
            .ok_or_else(|| StudyError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };
    let label_idx = column(label_column)?;
    let value_idx = column(value_column)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.byte_records().enumerate() {
        let record = result.map_err(csv_error)?;
        let cell = |i: usize| {
            record
                .get(i)
                .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
                .unwrap_or_default()
        };
        rows.push(IndexRow {
            // +2: records start after the header, lines are 1-based.
            line: idx + 2,
            label: cell(label_idx),
            value: cell(value_idx),
        });
    }

    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse the value of a matched row.
pub fn parse_value(path: &Path, row: &IndexRow) -> Result<f64> {
    row.value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| StudyError::InvalidValue {
            path: path.to_path_buf(),
            label: row.label.clone(),
            value: row.value.clone(),
        })
}

fn build_header_map(headers: &csv::ByteRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let name = String::from_utf8_lossy(name);
            (name.trim().trim_start_matches('\u{feff}').to_string(), idx)
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
