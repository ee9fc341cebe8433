//! Normalisation, pre/post comparison and the full study pipeline.

use study_core::models::{CategoryChange, Series, StudyResult, CPI_LABEL};
use study_core::settings::{SourceLayout, StudyConfig};
use study_core::stats::{leading, mean, trailing, welch_t_test};
use study_core::{Month, Result, StudyError};
use tracing::{debug, info, warn};

use crate::extractor::{complete_series, extract_categories, load_cpi};
use crate::reader::discover_month_files;

// ── Normalisation ─────────────────────────────────────────────────────────────

/// Position of `month` within the discovered months.
pub fn reference_index(months: &[Month], month: Month) -> Result<usize> {
    months
        .binary_search(&month)
        .map_err(|_| StudyError::ReferenceMonthNotFound(month))
}

/// Rescale `series` so its value at `reference_index` is 1.0.
pub fn normalize(series: &Series, reference_index: usize, reference_month: Month) -> Result<Series> {
    let Some(&baseline) = series.values.get(reference_index) else {
        return Err(StudyError::SeriesTooShort {
            series: series.label.clone(),
            len: series.len(),
            required: reference_index + 1,
        });
    };
    if baseline == 0.0 {
        return Err(StudyError::ZeroBaseline {
            series: series.label.clone(),
            month: reference_month,
        });
    }
    Ok(Series::new(
        series.label.clone(),
        series.values.iter().map(|v| v / baseline).collect(),
    ))
}

// ── Comparison ────────────────────────────────────────────────────────────────

/// Compare the months up to and including the reference month with the
/// months after it.
///
/// Averages use the last/first `bar_window` values either side; the
/// significance test uses the last/first `test_window` values.  Windows
/// longer than the available data use everything available.
pub fn compare_category(series: &Series, reference_index: usize, config: &StudyConfig) -> Result<CategoryChange> {
    let split = (reference_index + 1).min(series.len());
    let (prior, subsequent) = series.values.split_at(split);

    let empty = |side| StudyError::EmptyWindow {
        series: series.label.clone(),
        side,
    };
    let prior_average = mean(trailing(prior, config.bar_window)).ok_or_else(|| empty("prior"))?;
    let subsequent_average = mean(leading(subsequent, config.bar_window)).ok_or_else(|| empty("subsequent"))?;

    let test = welch_t_test(
        trailing(prior, config.test_window),
        leading(subsequent, config.test_window),
        config.alternative,
    )?;
    if test.is_none() {
        debug!("t-test not computable for \"{}\"", series.label);
    }

    Ok(CategoryChange {
        label: series.label.clone(),
        prior_average,
        subsequent_average,
        change: subsequent_average - prior_average,
        test,
    })
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Run the whole study: discover, load, extract, normalise, compare.
pub fn run_study(layout: &SourceLayout, config: &StudyConfig) -> Result<StudyResult> {
    config.validate()?;

    let files = discover_month_files(layout)?;
    let months: Vec<Month> = files.iter().map(|f| f.month).collect();
    info!("Found {} months of item indices", months.len());

    let raw_cpi = load_cpi(layout, &months)?;
    let reference_index = reference_index(&months, config.reference_month)?;

    let categories = config.categories();
    info!("Extracting {} categories", categories.len());
    let table = extract_categories(layout, &files, &categories)?;
    let (raw_series, dropped) = complete_series(&table, config)?;

    info!("Normalising to {}", config.reference_month.long_label());
    let cpi = normalize(
        &Series::new(CPI_LABEL, raw_cpi.clone()),
        reference_index,
        config.reference_month,
    )?;
    let categories = raw_series
        .iter()
        .map(|s| normalize(s, reference_index, config.reference_month))
        .collect::<Result<Vec<_>>>()?;

    let changes = categories
        .iter()
        .map(|s| compare_category(s, reference_index, config))
        .collect::<Result<Vec<_>>>()?;

    for change in changes.iter().filter(|c| c.contradicts_hypothesis()) {
        warn!(
            "\"{}\" moved against the {} hypothesis (change {:+.4})",
            change.label, config.alternative, change.change
        );
    }

    info!("Study complete");
    Ok(StudyResult {
        months,
        reference_index,
        raw_cpi,
        cpi,
        categories,
        changes,
        dropped,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use study_core::stats::Alternative;
    use tempfile::TempDir;

    fn m(year: i32, month: u32) -> Month {
        Month::new(year, month).unwrap()
    }

    fn small_config(target: &str, comparables: &[&str]) -> StudyConfig {
        StudyConfig {
            target: target.to_string(),
            comparables: comparables.iter().map(|s| s.to_string()).collect(),
            reference_month: m(2020, 4),
            bar_window: 10,
            test_window: 2,
            ..StudyConfig::default()
        }
    }

    // ── normalize ─────────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_scenario() {
        let series = Series::new("EBOOKS", vec![80.0, 100.0, 120.0]);
        let normalized = normalize(&series, 1, m(2020, 4)).unwrap();
        let expected = [0.8, 1.0, 1.2];
        for (got, want) in normalized.values.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
    }

    #[test]
    fn test_normalize_reference_value_is_one() {
        let series = Series::new("CPI", vec![108.6, 108.3, 108.5, 108.6, 108.8]);
        for idx in 0..series.len() {
            let normalized = normalize(&series, idx, m(2020, 4)).unwrap();
            assert!((normalized.values[idx] - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_normalize_too_short() {
        let series = Series::new("EBOOKS", vec![1.0, 2.0]);
        let err = normalize(&series, 2, m(2020, 4)).unwrap_err();
        assert!(matches!(err, StudyError::SeriesTooShort { required: 3, len: 2, .. }));
    }

    #[test]
    fn test_normalize_zero_baseline() {
        let series = Series::new("EBOOKS", vec![1.0, 0.0, 2.0]);
        let err = normalize(&series, 1, m(2020, 4)).unwrap_err();
        assert!(matches!(err, StudyError::ZeroBaseline { .. }));
    }

    #[test]
    fn test_reference_index() {
        let months = vec![m(2020, 3), m(2020, 4), m(2020, 5)];
        assert_eq!(reference_index(&months, m(2020, 4)).unwrap(), 1);
        let err = reference_index(&months, m(2021, 4)).unwrap_err();
        assert!(matches!(err, StudyError::ReferenceMonthNotFound(_)));
    }

    // ── compare_category ──────────────────────────────────────────────────────

    #[test]
    fn test_compare_category_scenario() {
        let series = Series::new("EBOOKS", vec![0.8, 1.0, 1.2, 1.3]);
        let change = compare_category(&series, 1, &small_config("EBOOKS", &[])).unwrap();
        assert!((change.prior_average - 0.9).abs() < 1e-9);
        assert!((change.subsequent_average - 1.25).abs() < 1e-9);
        assert!((change.change - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_compare_category_windows_truncate() {
        // Only the last two prior and first two subsequent values count.
        let series = Series::new("EBOOKS", vec![100.0, 1.0, 1.0, 2.0, 2.0, 100.0]);
        let config = StudyConfig {
            bar_window: 2,
            ..small_config("EBOOKS", &[])
        };
        let change = compare_category(&series, 2, &config).unwrap();
        assert!((change.prior_average - 1.0).abs() < 1e-9);
        assert!((change.subsequent_average - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_compare_category_reference_is_last_month() {
        let series = Series::new("EBOOKS", vec![0.9, 1.0]);
        let err = compare_category(&series, 1, &small_config("EBOOKS", &[])).unwrap_err();
        assert!(matches!(err, StudyError::EmptyWindow { side: "subsequent", .. }));
    }

    #[test]
    fn test_compare_category_runs_test_on_short_window() {
        let series = Series::new("EBOOKS", vec![1.05, 1.02, 0.99, 1.0, 0.9, 0.88, 0.91]);
        let config = StudyConfig {
            test_window: 3,
            alternative: Alternative::Greater,
            ..small_config("EBOOKS", &[])
        };
        let change = compare_category(&series, 3, &config).unwrap();
        let test = change.test.expect("test should be computable");
        assert!(test.statistic > 0.0);
        assert!(test.p_value < 0.05);
        assert!(!change.contradicts_hypothesis());
    }

    #[test]
    fn test_compare_category_constant_series_not_computable() {
        let series = Series::new("EBOOKS", vec![1.0; 6]);
        let change = compare_category(&series, 2, &small_config("EBOOKS", &[])).unwrap();
        assert!(change.test.is_none());
        assert!(change.change.abs() < 1e-12);
    }

    // ── run_study ─────────────────────────────────────────────────────────────

    fn write_fixture(dir: &Path, months: &[(&str, &str)], cpi: &str) {
        for (stamp, body) in months {
            let name = format!("upload-itemindices{}.csv", stamp);
            std::fs::write(
                dir.join(name),
                format!("INDEX_DATE,ITEM_ID,ITEM_DESC,ALL_GM_INDEX\n{}", body),
            )
            .unwrap();
        }
        std::fs::write(dir.join("CPI.csv"), cpi).unwrap();
    }

    fn standard_fixture(dir: &Path) {
        write_fixture(
            dir,
            &[
                (
                    "202003",
                    "202003,1,EBOOKS,80\n202003,2,MUSIC DOWNLOADS,50\n202003,3,COMPUTER SOFTWARE,90\n",
                ),
                (
                    "202004",
                    "202004,2,MUSIC DOWNLOADS,50\n202004,1,EBOOKS,100\n202004,3,COMPUTER SOFTWARE,100\n",
                ),
                (
                    "202005",
                    "202005,1,EBOOKS,120\n202005,2,MUSIC DOWNLOADS,55\n202005,3,COMPUTER SOFTWARE,100\n",
                ),
                (
                    "202006",
                    "202006,1,EBOOKS,130\n202006,2,MUSIC DOWNLOADS,50\n202006,3,COMPUTER SOFTWARE,110\n",
                ),
            ],
            "Month,Index\n2020 MAR,108.6\n2020 APR,108.5\n2020 MAY,108.5\n2020 JUN,108.6\n",
        );
    }

    #[test]
    fn test_run_study_end_to_end() {
        let dir = TempDir::new().unwrap();
        standard_fixture(dir.path());
        let config = small_config("EBOOKS", &["MUSIC DOWNLOADS", "COMPUTER SOFTWARE"]);

        let result = run_study(&SourceLayout::in_dir(dir.path()), &config).unwrap();

        assert_eq!(result.months.len(), 4);
        assert_eq!(result.reference_index, 1);
        assert_eq!(result.raw_cpi, vec![108.6, 108.5, 108.5, 108.6]);
        assert!((result.cpi.values[1] - 1.0).abs() < 1e-9);

        let labels: Vec<&str> = result.categories.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["EBOOKS", "COMPUTER SOFTWARE", "MUSIC DOWNLOADS"]);

        let ebooks = &result.changes[0];
        assert_eq!(ebooks.label, "EBOOKS");
        assert!((ebooks.prior_average - 0.9).abs() < 1e-9);
        assert!((ebooks.subsequent_average - 1.25).abs() < 1e-9);
        assert!((ebooks.change - 0.35).abs() < 1e-9);
        assert!(result.dropped.is_empty());
    }

    #[test]
    fn test_run_study_is_deterministic() {
        let dir = TempDir::new().unwrap();
        standard_fixture(dir.path());
        let config = small_config("EBOOKS", &["MUSIC DOWNLOADS", "COMPUTER SOFTWARE"]);
        let layout = SourceLayout::in_dir(dir.path());

        let first = run_study(&layout, &config).unwrap();
        let second = run_study(&layout, &config).unwrap();
        assert_eq!(first.changes, second.changes);
        assert_eq!(first.categories, second.categories);
    }

    #[test]
    fn test_run_study_missing_category_month() {
        let dir = TempDir::new().unwrap();
        write_fixture(
            dir.path(),
            &[
                ("202003", "202003,1,EBOOKS,80\n202003,2,MUSIC DOWNLOADS,50\n"),
                ("202004", "202004,1,EBOOKS,100\n"),
                ("202005", "202005,1,EBOOKS,120\n202005,2,MUSIC DOWNLOADS,55\n"),
            ],
            "Month,Index\n2020 MAR,108.6\n2020 APR,108.5\n2020 MAY,108.5\n",
        );
        let layout = SourceLayout::in_dir(dir.path());
        let config = small_config("EBOOKS", &["MUSIC DOWNLOADS"]);

        let err = run_study(&layout, &config).unwrap_err();
        match err {
            StudyError::MissingObservations { category, months } => {
                assert_eq!(category, "MUSIC DOWNLOADS");
                assert_eq!(months, vec![m(2020, 4)]);
            }
            other => panic!("unexpected error: {other}"),
        }

        let config = StudyConfig {
            drop_incomplete: true,
            ..config
        };
        let result = run_study(&layout, &config).unwrap();
        assert_eq!(result.dropped, vec!["MUSIC DOWNLOADS".to_string()]);
        assert_eq!(result.categories.len(), 1);
        assert_eq!(result.changes.len(), 1);
    }

    #[test]
    fn test_run_study_cpi_gap_aborts() {
        let dir = TempDir::new().unwrap();
        write_fixture(
            dir.path(),
            &[
                ("202003", "202003,1,EBOOKS,80\n"),
                ("202004", "202004,1,EBOOKS,100\n"),
                ("202005", "202005,1,EBOOKS,120\n"),
            ],
            "Month,Index\n2020 MAR,108.6\n2020 MAY,108.5\n",
        );
        let err = run_study(&SourceLayout::in_dir(dir.path()), &small_config("EBOOKS", &[])).unwrap_err();
        assert!(matches!(err, StudyError::CpiLengthMismatch { found: 2, expected: 3, .. }));
    }

    #[test]
    fn test_run_study_reference_month_absent() {
        let dir = TempDir::new().unwrap();
        write_fixture(
            dir.path(),
            &[("202005", "202005,1,EBOOKS,120\n")],
            "Month,Index\n2020 MAY,108.5\n",
        );
        let err = run_study(&SourceLayout::in_dir(dir.path()), &small_config("EBOOKS", &[])).unwrap_err();
        assert!(matches!(err, StudyError::ReferenceMonthNotFound(_)));
    }

    #[test]
    fn test_run_study_empty_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("CPI.csv"), "Month,Index\n").unwrap();
        let err = run_study(&SourceLayout::in_dir(dir.path()), &small_config("EBOOKS", &[])).unwrap_err();
        assert!(matches!(err, StudyError::ReferenceMonthNotFound(_)));
    }
}
