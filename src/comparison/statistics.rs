// Shared numeric helpers for the assumption checks and hypothesis tests
//
// Distribution functions come from statrs; everything here works in f64 so
// the decision thresholds are not perturbed by rounding.

use crate::error::{CompareError, CompareResult};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, FisherSnedecor, Normal, StudentsT};
use std::cmp::Ordering;

/// Statistic and two-sided p-value produced by a single test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestStatistic {
    pub statistic: f64,
    pub p_value: f64,
}

impl TestStatistic {
    /// Reject NaN/infinite output from a numerical routine
    pub(crate) fn checked(self, test: &str) -> CompareResult<Self> {
        if !self.statistic.is_finite() || !self.p_value.is_finite() {
            return Err(CompareError::computation(format!(
                "{} produced a non-finite result (statistic={}, p={})",
                test, self.statistic, self.p_value
            )));
        }
        Ok(Self {
            statistic: self.statistic,
            p_value: self.p_value.clamp(0.0, 1.0),
        })
    }
}

pub(crate) fn standard_normal() -> CompareResult<Normal> {
    Normal::new(0.0, 1.0).map_err(CompareError::computation)
}

/// Upper-tail probability of the F distribution
pub(crate) fn f_survival(f: f64, df1: f64, df2: f64) -> CompareResult<f64> {
    let dist = FisherSnedecor::new(df1, df2).map_err(CompareError::computation)?;
    Ok(dist.sf(f))
}

/// Two-sided p-value of a t statistic with `df` degrees of freedom
pub(crate) fn t_two_sided(t: f64, df: f64) -> CompareResult<f64> {
    let dist = StudentsT::new(0.0, 1.0, df).map_err(CompareError::computation)?;
    Ok(2.0 * dist.sf(t.abs()))
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unbiased variance (n - 1 denominator); needs at least 2 values
pub(crate) fn sample_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0)
}

pub(crate) fn sorted(values: &[f64]) -> Vec<f64> {
    let mut x = values.to_vec();
    x.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    x
}

pub(crate) fn median(values: &[f64]) -> f64 {
    let x = sorted(values);
    let n = x.len();
    if n % 2 == 1 {
        x[n / 2]
    } else {
        (x[n / 2 - 1] + x[n / 2]) / 2.0
    }
}

/// Average ranks (1-based) of `values` in their original order, plus the
/// tie term Σ(t³ - t) over groups of tied values
pub(crate) fn average_ranks(values: &[f64]) -> (Vec<f64>, f64) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        let t = (j - i + 1) as f64;
        tie_term += t * t * t - t;
        i = j + 1;
    }

    (ranks, tie_term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_length() {
        assert_eq!(median(&[9.0, 1.0, 5.0, 3.0, 7.0]), 5.0);
    }

    #[test]
    fn test_median_even_length() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_average_ranks_without_ties() {
        let (ranks, ties) = average_ranks(&[30.0, 10.0, 20.0]);
        assert_eq!(ranks, vec![3.0, 1.0, 2.0]);
        assert_eq!(ties, 0.0);
    }

    #[test]
    fn test_average_ranks_with_ties() {
        let (ranks, ties) = average_ranks(&[1.0, 2.0, 2.0, 3.0]);
        assert_eq!(ranks, vec![1.0, 2.5, 2.5, 4.0]);
        assert_eq!(ties, 6.0); // 2^3 - 2
    }

    #[test]
    fn test_f_survival_at_zero_is_one() {
        assert!((f_survival(0.0, 1.0, 10.0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_t_two_sided_small_df() {
        // t(10): a normal approximation would give 0.00596
        let p = t_two_sided(2.7501883411145154, 10.0).unwrap();
        assert!((p - 0.020471627860972095).abs() < 1e-9, "p={}", p);
    }

    #[test]
    fn test_t_two_sided_large_df_is_symmetric() {
        let p = t_two_sided(-0.9169084471919547, 38.0).unwrap();
        assert!((p - 0.3649734740403947).abs() < 1e-9, "p={}", p);
        assert_eq!(p, t_two_sided(0.9169084471919547, 38.0).unwrap());
    }

    #[test]
    fn test_sample_variance() {
        let v = sample_variance(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((v - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_checked_rejects_nan() {
        let stat = TestStatistic {
            statistic: f64::NAN,
            p_value: 0.5,
        };
        assert!(matches!(
            stat.checked("t-test"),
            Err(CompareError::Computation(_))
        ));
    }
}
