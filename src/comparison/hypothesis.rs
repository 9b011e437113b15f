// Two-sample location tests
//
// - Student's t: pooled variance, for normal groups with homogeneous variance
// - Welch's t: unequal-variance correction, for normal groups otherwise
// - Mann-Whitney U: rank-based, for groups that fail the normality check
//
// All tests are two-sided and computed in f64.
//
// Reference:
// [3] Mann, H. B. & Whitney, D. R. (1947). On a test of whether one of two
//     random variables is stochastically larger than the other. Annals of
//     Mathematical Statistics, 18(1), 50-60.

use crate::comparison::statistics::{
    average_ranks, mean, sample_variance, standard_normal, t_two_sided, TestStatistic,
};
use crate::error::{CompareError, CompareResult};
use statrs::distribution::ContinuousCDF;

/// Largest group size for which Mann-Whitney uses the exact U distribution
pub const MANN_WHITNEY_EXACT_LIMIT: usize = 8;

/// Independent two-sample t-test assuming equal variances
///
/// The statistic is positive when the control mean is larger.
///
/// # Example
/// ```
/// use splitcheck::comparison::student_t;
///
/// let result = student_t(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[4.0, 5.0, 6.0, 7.0, 8.0, 9.5]).unwrap();
/// assert!(result.statistic < 0.0);
/// assert!((result.p_value - 0.0205).abs() < 1e-3);
/// ```
pub fn student_t(control: &[f64], test: &[f64]) -> CompareResult<TestStatistic> {
    ttest_ind(control, test, true)
}

/// Independent two-sample t-test with Welch's unequal-variance correction
pub fn welch_t(control: &[f64], test: &[f64]) -> CompareResult<TestStatistic> {
    ttest_ind(control, test, false)
}

// t = (mean_control - mean_test) / se, p from the t distribution with
// pooled (n1 + n2 - 2) or Welch-Satterthwaite degrees of freedom
fn ttest_ind(control: &[f64], test: &[f64], equal_var: bool) -> CompareResult<TestStatistic> {
    if control.len() < 2 || test.len() < 2 {
        return Err(CompareError::invalid(
            "Need at least 2 observations per group for t-test",
        ));
    }

    let name = if equal_var { "Student's t-test" } else { "Welch's t-test" };
    let n1 = control.len() as f64;
    let n2 = test.len() as f64;
    let var1 = sample_variance(control);
    let var2 = sample_variance(test);

    let (se, df) = if equal_var {
        let df = n1 + n2 - 2.0;
        let pooled = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / df;
        ((pooled * (1.0 / n1 + 1.0 / n2)).sqrt(), df)
    } else {
        let q1 = var1 / n1;
        let q2 = var2 / n2;
        let df = (q1 + q2).powi(2) / (q1 * q1 / (n1 - 1.0) + q2 * q2 / (n2 - 1.0));
        ((q1 + q2).sqrt(), df)
    };

    if se == 0.0 {
        return Err(CompareError::computation(format!(
            "{} undefined: both groups have zero variance",
            name
        )));
    }

    let t = (mean(control) - mean(test)) / se;
    let p_value = t_two_sided(t, df)?;

    tracing::debug!(equal_var, t, df, p = p_value, "ttest_ind");

    TestStatistic {
        statistic: t,
        p_value,
    }
    .checked(name)
}

/// Two-sided Mann-Whitney U test
///
/// The reported statistic is U for the `control` sample. The p-value uses the
/// exact null distribution when both groups have at most 8 observations and
/// no ties, otherwise the normal approximation with tie and continuity
/// corrections.
///
/// # Example
/// ```
/// use splitcheck::comparison::mann_whitney_u;
///
/// let a = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let b = [6.0, 7.0, 8.0, 9.0, 10.0];
/// let result = mann_whitney_u(&a, &b).unwrap();
/// assert_eq!(result.statistic, 0.0);
/// assert!(result.p_value < 0.01);
/// ```
pub fn mann_whitney_u(control: &[f64], test: &[f64]) -> CompareResult<TestStatistic> {
    let n1 = control.len();
    let n2 = test.len();
    if n1 == 0 || n2 == 0 {
        return Err(CompareError::invalid(
            "Cannot run Mann-Whitney U on an empty sample",
        ));
    }

    let combined: Vec<f64> = control.iter().chain(test).copied().collect();
    let (ranks, tie_term) = average_ranks(&combined);

    let n1f = n1 as f64;
    let n2f = n2 as f64;
    let rank_sum: f64 = ranks[..n1].iter().sum();
    let u1 = rank_sum - n1f * (n1f + 1.0) / 2.0;
    let u_max = u1.max(n1f * n2f - u1);

    let p_value = if n1 <= MANN_WHITNEY_EXACT_LIMIT
        && n2 <= MANN_WHITNEY_EXACT_LIMIT
        && tie_term == 0.0
    {
        2.0 * exact_u_survival(u_max.round() as usize, n1, n2)
    } else {
        let n = n1f + n2f;
        let mu = n1f * n2f / 2.0;
        let variance = n1f * n2f / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
        if variance <= 0.0 {
            1.0
        } else {
            let z = (u_max - mu - 0.5) / variance.sqrt();
            2.0 * standard_normal()?.sf(z)
        }
    };

    TestStatistic {
        statistic: u1,
        p_value: p_value.min(1.0),
    }
    .checked("Mann-Whitney U")
}

// P(U >= u) under H0 for group sizes n1, n2, without ties
fn exact_u_survival(u: usize, n1: usize, n2: usize) -> f64 {
    let max_u = n1 * n2;
    if u > max_u {
        return 0.0;
    }

    // counts[m][n][k]: arrangements of m + n items with U = k
    let mut counts = vec![vec![vec![0u64; max_u + 1]; n2 + 1]; n1 + 1];
    for m in 0..=n1 {
        for n in 0..=n2 {
            if m == 0 || n == 0 {
                counts[m][n][0] = 1;
                continue;
            }
            for k in 0..=m * n {
                let with_last_from_first = if k >= n { counts[m - 1][n][k - n] } else { 0 };
                counts[m][n][k] = with_last_from_first + counts[m][n - 1][k];
            }
        }
    }

    let dist = &counts[n1][n2];
    let total: u64 = dist.iter().sum();
    let upper: u64 = dist[u..].iter().sum();
    upper as f64 / total as f64
}
