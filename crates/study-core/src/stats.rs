use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{Result, StudyError};

// ── Window helpers ────────────────────────────────────────────────────────────

/// The last `n` elements of `values`, or all of them when shorter.
pub fn trailing(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

/// The first `n` elements of `values`, or all of them when shorter.
pub fn leading(values: &[f64], n: usize) -> &[f64] {
    &values[..n.min(values.len())]
}

// ── Moments ───────────────────────────────────────────────────────────────────

/// Arithmetic mean.  Returns `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Unbiased sample variance (`n - 1` denominator).  Returns `None` for fewer
/// than two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    Some(sum_sq / (values.len() as f64 - 1.0))
}

// ── Welch's t-test ────────────────────────────────────────────────────────────

/// Alternative hypothesis for the two-sample test, stated about
/// `mean(first) - mean(second)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
    /// The first sample's mean is greater.
    Greater,
    /// The first sample's mean is less.
    Less,
    /// The means differ.
    TwoSided,
}

impl std::fmt::Display for Alternative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Alternative::Greater => "greater",
            Alternative::Less => "less",
            Alternative::TwoSided => "two-sided",
        };
        f.write_str(s)
    }
}

/// Outcome of a Welch (unequal variance) two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WelchTest {
    pub statistic: f64,
    /// Welch–Satterthwaite degrees of freedom.
    pub degrees_of_freedom: f64,
    pub p_value: f64,
    pub alternative: Alternative,
}

impl WelchTest {
    /// Whether the sign of the statistic is consistent with a one-sided
    /// hypothesis.  Always `true` for two-sided tests.
    pub fn direction_matches(&self) -> bool {
        match self.alternative {
            Alternative::Greater => self.statistic >= 0.0,
            Alternative::Less => self.statistic <= 0.0,
            Alternative::TwoSided => true,
        }
    }
}

/// Run Welch's t-test on two samples.
///
/// Returns `Ok(None)` when the test is not computable: either sample has
/// fewer than two values, or both samples have zero variance.
pub fn welch_t_test(
    first: &[f64],
    second: &[f64],
    alternative: Alternative,
) -> Result<Option<WelchTest>> {
    let (Some(var1), Some(var2)) = (sample_variance(first), sample_variance(second)) else {
        return Ok(None);
    };
    let (Some(mean1), Some(mean2)) = (mean(first), mean(second)) else {
        return Ok(None);
    };
    let n1 = first.len() as f64;
    let n2 = second.len() as f64;

    let se1 = var1 / n1;
    let se2 = var2 / n2;
    let standard_error = (se1 + se2).sqrt();
    if standard_error == 0.0 {
        return Ok(None);
    }

    let statistic = (mean1 - mean2) / standard_error;
    let degrees_of_freedom =
        (se1 + se2).powi(2) / (se1.powi(2) / (n1 - 1.0) + se2.powi(2) / (n2 - 1.0));

    let t_dist = StudentsT::new(0.0, 1.0, degrees_of_freedom)
        .map_err(|e| StudyError::Statistics(format!("Failed to create t-distribution: {}", e)))?;

    let p_value = match alternative {
        Alternative::Greater => t_dist.sf(statistic),
        Alternative::Less => t_dist.cdf(statistic),
        Alternative::TwoSided => (2.0 * t_dist.sf(statistic.abs())).min(1.0),
    };

    Ok(Some(WelchTest {
        statistic,
        degrees_of_freedom,
        p_value,
        alternative,
    }))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── windows ──────────────────────────────────────────────────────────────

    #[test]
    fn test_trailing_and_leading_short_slices_use_everything() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(trailing(&values, 10), &[1.0, 2.0, 3.0]);
        assert_eq!(leading(&values, 10), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_trailing_and_leading_truncate() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(trailing(&values, 2), &[4.0, 5.0]);
        assert_eq!(leading(&values, 2), &[1.0, 2.0]);
        assert!(trailing(&values, 0).is_empty());
        assert!(leading(&[], 3).is_empty());
    }

    // ── moments ──────────────────────────────────────────────────────────────

    #[test]
    fn test_mean() {
        assert!(mean(&[]).is_none());
        assert!((mean(&[0.8, 1.0]).unwrap() - 0.9).abs() < 1e-12);
        assert!((mean(&[1.2, 1.3]).unwrap() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_sample_variance() {
        assert!(sample_variance(&[1.0]).is_none());
        // mean 5, squared deviations 9+1+1+9 = 20, / 3
        let v = sample_variance(&[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert!((v - 20.0 / 3.0).abs() < 1e-12, "v = {v}");
    }

    // ── welch_t_test ─────────────────────────────────────────────────────────

    #[test]
    fn test_welch_known_values() {
        // first: mean 2.5, var 1.6667; second: mean 6.5, var 1.6667
        // se = sqrt(1.6667/4 * 2) = 0.9129, t = -4.3818, df = 6
        let first = [1.0, 2.0, 3.0, 4.0];
        let second = [5.0, 6.0, 7.0, 8.0];
        let test = welch_t_test(&first, &second, Alternative::TwoSided)
            .unwrap()
            .unwrap();
        assert!((test.statistic - (-4.381780460041329)).abs() < 1e-9, "t = {}", test.statistic);
        assert!((test.degrees_of_freedom - 6.0).abs() < 1e-9);
        // Two-sided p for t = -4.38 with 6 df is about 0.00466.
        assert!((test.p_value - 0.004659).abs() < 1e-4, "p = {}", test.p_value);
    }

    #[test]
    fn test_welch_one_sided_tails_sum_to_one() {
        let first = [1.10, 1.05, 1.00, 1.02, 1.08, 1.04];
        let second = [0.92, 0.95, 0.90, 0.93, 0.97, 0.91];
        let greater = welch_t_test(&first, &second, Alternative::Greater)
            .unwrap()
            .unwrap();
        let less = welch_t_test(&first, &second, Alternative::Less)
            .unwrap()
            .unwrap();
        assert!(greater.statistic > 0.0);
        assert!(greater.p_value < 0.001);
        assert!((greater.p_value + less.p_value - 1.0).abs() < 1e-9);
        assert!(greater.direction_matches());
        assert!(!less.direction_matches());
    }

    #[test]
    fn test_welch_unequal_sizes_df_between_bounds() {
        let first = [1.0, 1.4, 0.9, 1.2, 1.1];
        let second = [2.0, 3.5, 1.0];
        let test = welch_t_test(&first, &second, Alternative::Greater)
            .unwrap()
            .unwrap();
        // Welch df lies between min(n1, n2) - 1 and n1 + n2 - 2.
        assert!(test.degrees_of_freedom >= 2.0 && test.degrees_of_freedom <= 6.0);
        assert!(test.statistic < 0.0);
        assert!(test.p_value > 0.5);
    }

    #[test]
    fn test_welch_not_computable_for_tiny_samples() {
        assert!(welch_t_test(&[1.0], &[2.0, 3.0], Alternative::Greater)
            .unwrap()
            .is_none());
        assert!(welch_t_test(&[1.0, 2.0], &[], Alternative::Greater)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_welch_not_computable_for_constant_samples() {
        assert!(welch_t_test(&[1.0, 1.0], &[1.0, 1.0], Alternative::Greater)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_alternative_display() {
        assert_eq!(Alternative::Greater.to_string(), "greater");
        assert_eq!(Alternative::TwoSided.to_string(), "two-sided");
    }
}
