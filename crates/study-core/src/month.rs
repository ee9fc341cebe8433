//! Calendar-month sampling points.
//!
//! Every price index in the study is sampled once per month, so a [`Month`]
//! is just a `(year, month)` pair with the day fixed to 1.  All the textual
//! renderings the pipeline needs (CPI table labels, axis ticks, titles, the
//! spreadsheet export) live here.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::StudyError;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// A calendar month.  Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Build a month, returning `None` when `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Const constructor for known-valid months.
    pub(crate) const fn from_parts(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1-based.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        // Month is validated on construction, so day 1 always exists.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Shift by a signed number of months.
    pub fn offset(&self, months: i32) -> Self {
        let zero_based = self.year * 12 + self.month as i32 - 1 + months;
        Self {
            year: zero_based.div_euclid(12),
            month: zero_based.rem_euclid(12) as u32 + 1,
        }
    }

    /// Label used by the CPI table, e.g. `"2020 APR"`.
    pub fn cpi_label(&self) -> String {
        format!(
            "{} {}",
            self.year,
            MONTH_ABBREVIATIONS[(self.month - 1) as usize]
        )
    }

    /// Short label for chart axes, e.g. `"Apr 2020"`.
    pub fn short_label(&self) -> String {
        self.first_day().format("%b %Y").to_string()
    }

    /// Long label for titles, e.g. `"April 2020"`.
    pub fn long_label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    /// Day-first date used in the spreadsheet export, e.g. `"01/04/2020"`.
    pub fn export_label(&self) -> String {
        self.first_day().format("%d/%m/%Y").to_string()
    }

    /// `"<year>/<month>"` without padding, used in progress messages.
    pub fn progress_label(&self) -> String {
        format!("{}/{}", self.month, self.year)
    }
}

impl From<NaiveDate> for Month {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// ISO-style `YYYY-MM`.
impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Parses `YYYY-MM` (as accepted on the command line and written in reports).
impl FromStr for Month {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StudyError::Config(format!("invalid month \"{}\", expected YYYY-MM", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Month::new(year, month).ok_or_else(invalid)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
