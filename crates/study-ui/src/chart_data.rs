//! Display-ready data for the two chart screens.

use study_core::formatting::capitalize;
use study_core::models::StudyResult;
use study_core::settings::StudyConfig;
use study_core::Month;

/// One line of the price chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceLine {
    pub label: String,
    pub values: Vec<f64>,
    pub dashed: bool,
    pub initially_visible: bool,
}

/// One bar of the change chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeBar {
    /// Capitalised category name.
    pub label: String,
    pub change: f64,
    pub is_target: bool,
}

/// Everything the UI draws, derived once from the study result.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Annotation text on the reference-month marker.
    pub annotation: String,
    pub reference_month: Month,
    pub reference_index: usize,
    pub months: Vec<Month>,
    /// CPI first, then the categories in study order.
    pub lines: Vec<PriceLine>,
    /// Ascending by change, ties by category name.
    pub bars: Vec<ChangeBar>,
    pub change_title: String,
    pub price_title: String,
}

impl ChartData {
    pub fn from_result(result: &StudyResult, config: &StudyConfig) -> Self {
        let reference_month = result.reference_month();

        let lines = result
            .all_series()
            .enumerate()
            .map(|(idx, series)| {
                // CPI and the target are the two highlighted lines.
                let highlighted = idx == 0 || series.label == config.target;
                PriceLine {
                    label: series.label.clone(),
                    values: series.values.clone(),
                    dashed: highlighted,
                    initially_visible: highlighted,
                }
            })
            .collect();

        let bars = result
            .ranked_changes()
            .into_iter()
            .map(|change| ChangeBar {
                label: capitalize(&change.label),
                change: change.change,
                is_target: change.label == config.target,
            })
            .collect();

        Self {
            annotation: config.title.clone(),
            reference_month,
            reference_index: result.reference_index,
            months: result.months.clone(),
            lines,
            bars,
            change_title: change_title(&config.title, reference_month, config.bar_window),
            price_title: price_title(&config.title, reference_month),
        }
    }

    /// Initial visibility of each line.
    pub fn initial_visibility(&self) -> Vec<bool> {
        self.lines.iter().map(|l| l.initially_visible).collect()
    }
}

/// Title of the change chart, naming the span the averages cover.
pub fn change_title(title: &str, reference: Month, window: usize) -> String {
    // Keeps Month arithmetic in range for absurd window sizes.
    let window = window.min(100_000) as i32;
    format!(
        "The {} - overall change in price of products from {} to {}",
        title,
        reference.offset(-window).long_label(),
        reference.offset(window).long_label()
    )
}

/// Title of the price chart.
pub fn price_title(title: &str, reference: Month) -> String {
    format!(
        "{} - ONS index changes for related consumer goods, normalised to {}",
        title,
        reference.long_label()
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
