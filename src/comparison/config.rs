// Configuration for assumption-checked two-sample comparisons
//
// A single significance level drives every decision in the procedure:
// normality rejection, variance-homogeneity rejection and the final verdict.

use crate::error::{CompareError, CompareResult};
use serde::{Deserialize, Serialize};

/// Center used for the absolute deviations in Levene's test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeveneCenter {
    /// Brown-Forsythe variant, robust to skewed data
    #[default]
    Median,
    /// Levene's original formulation
    Mean,
}

impl std::fmt::Display for LeveneCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeveneCenter::Median => write!(f, "median"),
            LeveneCenter::Mean => write!(f, "mean"),
        }
    }
}

/// Configuration for a two-sample comparison
///
/// # Example
/// ```
/// use splitcheck::comparison::ComparisonConfig;
///
/// let config = ComparisonConfig::default();
/// assert_eq!(config.significance_level, 0.05); // 95% confidence
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Significance level (alpha) applied to every test in the procedure
    ///
    /// - 0.05 (default): 95% confidence
    /// - 0.01: stricter, fewer false positives
    /// - 0.10: looser, fewer false negatives
    pub significance_level: f64,

    /// Minimum observations per group
    ///
    /// Shapiro-Wilk is undefined below 3 observations, so this cannot be
    /// lowered past 3.
    pub min_sample_size: usize,

    /// Center for Levene's absolute deviations (default: median)
    pub levene_center: LeveneCenter,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            min_sample_size: MIN_OBSERVATIONS,
            levene_center: LeveneCenter::Median,
        }
    }
}

/// Smallest sample the normality check accepts
pub const MIN_OBSERVATIONS: usize = 3;

impl ComparisonConfig {
    /// Configuration with the given alpha and default everything else
    pub fn with_alpha(alpha: f64) -> Self {
        Self {
            significance_level: alpha,
            ..Self::default()
        }
    }

    /// 99% confidence
    pub fn strict() -> Self {
        Self::with_alpha(0.01)
    }

    /// 90% confidence
    pub fn permissive() -> Self {
        Self::with_alpha(0.10)
    }

    /// Validate configuration
    pub fn validate(&self) -> CompareResult<()> {
        let alpha = self.significance_level;
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(CompareError::invalid(format!(
                "significance_level must be in (0, 1), got {}",
                alpha
            )));
        }

        if self.min_sample_size < MIN_OBSERVATIONS {
            return Err(CompareError::invalid(format!(
                "min_sample_size must be >= {} for the normality check, got {}",
                MIN_OBSERVATIONS, self.min_sample_size
            )));
        }

        Ok(())
    }
}
