use serde::{Deserialize, Serialize};

use crate::month::Month;
use crate::stats::WelchTest;

/// Label of the reference (all-items CPI) series.
pub const CPI_LABEL: &str = "CPI";

/// A named index series with one value per discovered month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Category description as it appears in the source files, or
    /// [`CPI_LABEL`] for the reference series.
    pub label: String,
    /// Values in chronological order.
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Pre/post comparison for one tracked category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryChange {
    pub label: String,
    /// Mean of the averaging window ending at the reference month.
    pub prior_average: f64,
    /// Mean of the averaging window starting the month after.
    pub subsequent_average: f64,
    /// `subsequent_average - prior_average`.
    pub change: f64,
    /// Significance test over the shorter window; `None` when the samples
    /// are too small or constant.
    pub test: Option<WelchTest>,
}

impl CategoryChange {
    /// `true` when a one-sided test was run against the observed direction,
    /// e.g. hypothesising a price fall for a category whose price rose.
    pub fn contradicts_hypothesis(&self) -> bool {
        self.test.map(|t| !t.direction_matches()).unwrap_or(false)
    }
}

/// Everything the pipeline produces, immutable once built.
#[derive(Debug, Clone)]
pub struct StudyResult {
    /// Discovered months, strictly ascending.
    pub months: Vec<Month>,
    /// Position of the reference month within `months`.
    pub reference_index: usize,
    /// CPI values as read, before normalisation.
    pub raw_cpi: Vec<f64>,
    /// Normalised CPI.
    pub cpi: Series,
    /// Normalised category series, target first.
    pub categories: Vec<Series>,
    /// Per-category comparison, same order as `categories`.
    pub changes: Vec<CategoryChange>,
    /// Comparable categories dropped for incomplete data.
    pub dropped: Vec<String>,
}

impl StudyResult {
    pub fn reference_month(&self) -> Month {
        self.months[self.reference_index]
    }

    /// CPI followed by every category series.
    pub fn all_series(&self) -> impl Iterator<Item = &Series> {
        std::iter::once(&self.cpi).chain(self.categories.iter())
    }

    /// Category changes sorted ascending by change, ties broken by label.
    pub fn ranked_changes(&self) -> Vec<&CategoryChange> {
        let mut ranked: Vec<&CategoryChange> = self.changes.iter().collect();
        ranked.sort_by(|a, b| {
            a.change
                .partial_cmp(&b.change)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        });
        ranked
    }
}
