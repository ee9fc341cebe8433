use clap::Parser;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::{Result, StudyError};
use crate::month::Month;
use crate::stats::Alternative;

// ── Reference study constants ─────────────────────────────────────────────────

/// Category whose price change the study is about.
pub const DEFAULT_TARGET: &str = "EBOOKS";

/// Comparable categories from the ONS item list.
pub const DEFAULT_COMPARABLES: [&str; 8] = [
    "BOOK FICTION P/BACK TOP 10",
    "BOOK-NON-FICTION-PAPER-BACK",
    "MUSIC STREAMING SUBSCRIPTIONS",
    "GAMES CONSOLES ONLINE SUB SERV",
    "MOBILE PHONE APPLICATIONS",
    "COMPUTER GAME DOWNLOADS",
    "MUSIC DOWNLOADS",
    "COMPUTER SOFTWARE",
];

/// The month before the VAT cut took effect.
pub const DEFAULT_REFERENCE_MONTH: &str = "2020-04";
const DEFAULT_REFERENCE: Month = Month::from_parts(2020, 4);

pub const DEFAULT_BAR_WINDOW: usize = 23;
pub const DEFAULT_TEST_WINDOW: usize = 6;
pub const DEFAULT_TITLE: &str = "20% ebook VAT cut";

fn default_comparables() -> Vec<String> {
    DEFAULT_COMPARABLES.iter().map(|s| s.to_string()).collect()
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Compare consumer price index categories around a policy change date
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cpi-event-study",
    about = "Compare consumer price index categories around a policy change date",
    version
)]
pub struct Settings {
    /// Directory holding the monthly item-index files
    #[arg(long, default_value = "ONS_data")]
    pub data_dir: PathBuf,

    /// CPI file (defaults to CPI.csv inside the data directory)
    #[arg(long)]
    pub cpi_file: Option<PathBuf>,

    /// File name prefix of the monthly item-index files
    #[arg(long, default_value = "upload-itemindices")]
    pub file_prefix: String,

    /// File extension of the monthly item-index files
    #[arg(long, default_value = "csv")]
    pub file_extension: String,

    /// Item description column in the item-index files
    #[arg(long, default_value = "ITEM_DESC")]
    pub item_column: String,

    /// Index value column in the item-index files
    #[arg(long, default_value = "ALL_GM_INDEX")]
    pub value_column: String,

    /// Month label column in the CPI file
    #[arg(long, default_value = "Month")]
    pub cpi_label_column: String,

    /// Index value column in the CPI file
    #[arg(long, default_value = "Index")]
    pub cpi_value_column: String,

    /// Category to analyse
    #[arg(long, default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Comparable category (repeat for several)
    #[arg(long = "comparable", value_name = "ITEM", default_values_t = default_comparables())]
    pub comparables: Vec<String>,

    /// Normalisation month (YYYY-MM), the last month before the change
    #[arg(long, default_value = DEFAULT_REFERENCE_MONTH)]
    pub reference_month: Month,

    /// Months averaged either side of the reference month
    #[arg(long, default_value_t = DEFAULT_BAR_WINDOW)]
    pub bar_window: usize,

    /// Months compared by the significance test (at least 2)
    #[arg(long, default_value_t = DEFAULT_TEST_WINDOW)]
    pub test_window: usize,

    /// Alternative hypothesis, stated as prior mean vs subsequent mean
    #[arg(long, value_enum, default_value_t = Alternative::Greater)]
    pub alternative: Alternative,

    /// Chart title and reference-date annotation
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Logo drawn in the corner of both charts
    #[arg(long, default_value = "logo_full_white_on_blue.jpg")]
    pub logo: PathBuf,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Print the console report only, without the chart UI
    #[arg(long)]
    pub no_ui: bool,

    /// Write a JSON report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Drop comparables with missing months instead of failing
    #[arg(long)]
    pub drop_incomplete: bool,
}

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Parse an explicit argument list and apply `--debug`.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Where the input files live and how their columns are named.
    pub fn source_layout(&self) -> SourceLayout {
        SourceLayout {
            cpi_file: self
                .cpi_file
                .clone()
                .unwrap_or_else(|| self.data_dir.join("CPI.csv")),
            data_dir: self.data_dir.clone(),
            file_prefix: self.file_prefix.clone(),
            file_extension: self.file_extension.clone(),
            item_column: self.item_column.clone(),
            value_column: self.value_column.clone(),
            cpi_label_column: self.cpi_label_column.clone(),
            cpi_value_column: self.cpi_value_column.clone(),
        }
    }

    /// Build and validate the analysis parameters.
    pub fn study_config(&self) -> Result<StudyConfig> {
        let config = StudyConfig {
            target: self.target.trim().to_string(),
            comparables: self.comparables.iter().map(|c| c.trim().to_string()).collect(),
            reference_month: self.reference_month,
            bar_window: self.bar_window,
            test_window: self.test_window,
            alternative: self.alternative,
            title: self.title.clone(),
            drop_incomplete: self.drop_incomplete,
        };
        config.validate()?;
        Ok(config)
    }
}

// ── SourceLayout ──────────────────────────────────────────────────────────────

/// File locations and column names of the input data.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLayout {
    pub data_dir: PathBuf,
    pub cpi_file: PathBuf,
    pub file_prefix: String,
    pub file_extension: String,
    pub item_column: String,
    pub value_column: String,
    pub cpi_label_column: String,
    pub cpi_value_column: String,
}

impl SourceLayout {
    /// Default layout rooted at `data_dir`.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            cpi_file: data_dir.join("CPI.csv"),
            data_dir,
            file_prefix: "upload-itemindices".to_string(),
            file_extension: "csv".to_string(),
            item_column: "ITEM_DESC".to_string(),
            value_column: "ALL_GM_INDEX".to_string(),
            cpi_label_column: "Month".to_string(),
            cpi_value_column: "Index".to_string(),
        }
    }
}

// ── StudyConfig ───────────────────────────────────────────────────────────────

/// Analysis parameters, fixed for the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyConfig {
    /// Highlighted category; drives the headline bar.
    pub target: String,
    /// Comparable categories, in any order.
    pub comparables: Vec<String>,
    /// Normalisation anchor and pre/post split.
    pub reference_month: Month,
    /// Averaging window for the bar chart metric.
    pub bar_window: usize,
    /// Significance test window.
    pub test_window: usize,
    pub alternative: Alternative,
    pub title: String,
    /// Drop incomplete comparables instead of failing.
    pub drop_incomplete: bool,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            comparables: default_comparables(),
            reference_month: DEFAULT_REFERENCE,
            bar_window: DEFAULT_BAR_WINDOW,
            test_window: DEFAULT_TEST_WINDOW,
            alternative: Alternative::Greater,
            title: DEFAULT_TITLE.to_string(),
            drop_incomplete: false,
        }
    }
}

impl StudyConfig {
    /// Tracked categories in presentation order: the target first, then the
    /// comparables alphabetically.
    pub fn categories(&self) -> Vec<String> {
        let mut comparables = self.comparables.clone();
        comparables.sort();
        let mut categories = Vec::with_capacity(comparables.len() + 1);
        categories.push(self.target.clone());
        categories.extend(comparables);
        categories
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.target.is_empty() {
            return Err(StudyError::Config("target category is empty".to_string()));
        }
        if self.bar_window == 0 {
            return Err(StudyError::Config("bar window must be at least 1".to_string()));
        }
        if self.test_window < 2 {
            return Err(StudyError::Config("test window must be at least 2".to_string()));
        }
        let mut seen = HashSet::new();
        for category in self.categories() {
            if category.is_empty() {
                return Err(StudyError::Config("empty comparable category".to_string()));
            }
            if !seen.insert(category.clone()) {
                return Err(StudyError::Config(format!(
                    "category \"{}\" listed more than once",
                    category
                )));
            }
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
