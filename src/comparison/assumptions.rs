// Assumption checks that gate the choice of two-sample test
//
// - Normality: Shapiro-Wilk W test (Royston's AS R94 approximation)
// - Variance homogeneity: Levene's test, median-centered by default
//   (Brown-Forsythe)
//
// References:
// [1] Royston, P. (1995). Remark AS R94: A remark on Algorithm AS 181.
//     Applied Statistics, 44(4), 547-551.
// [2] Brown, M. B. & Forsythe, A. B. (1974). Robust tests for the equality
//     of variances. JASA, 69(346), 364-367.

use crate::comparison::config::LeveneCenter;
use crate::comparison::statistics::{
    f_survival, mean, median, sorted, standard_normal, TestStatistic,
};
use crate::error::{CompareError, CompareResult};
use crate::sample::Sample;
use serde::Serialize;
use statrs::distribution::ContinuousCDF;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Outcome of one assumption check at a fixed significance level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AssumptionResult {
    pub statistic: f64,
    pub p_value: f64,
    /// `p_value < alpha`: the assumption does not hold
    pub rejected: bool,
}

impl AssumptionResult {
    pub fn evaluate(test: TestStatistic, alpha: f64) -> Self {
        Self {
            statistic: test.statistic,
            p_value: test.p_value,
            rejected: test.p_value < alpha,
        }
    }
}

/// Largest sample the Royston approximation is calibrated for; larger
/// samples are still tested, with a warning
pub const SHAPIRO_MAX_OBSERVATIONS: usize = 5000;

/// Shapiro-Wilk normality check for one group
pub fn check_normality(sample: &Sample, alpha: f64) -> CompareResult<AssumptionResult> {
    let test = shapiro_wilk(sample.values())?;
    tracing::debug!(
        group = sample.label(),
        w = test.statistic,
        p = test.p_value,
        "shapiro-wilk"
    );
    Ok(AssumptionResult::evaluate(test, alpha))
}

/// Levene variance-homogeneity check across both groups
pub fn check_variance_homogeneity(
    control: &Sample,
    test: &Sample,
    center: LeveneCenter,
    alpha: f64,
) -> CompareResult<AssumptionResult> {
    let result = levene(&[control.values(), test.values()], center)?;
    tracing::debug!(
        %center,
        w = result.statistic,
        p = result.p_value,
        "levene"
    );
    Ok(AssumptionResult::evaluate(result, alpha))
}

// Royston polynomial coefficients
const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

// c[0] + c[1]*x + c[2]*x^2 + ...
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &coef| acc * x + coef)
}

/// Shapiro-Wilk W test: H0 = the data are drawn from a normal population
///
/// Needs at least 3 observations. Above 5000 the p-value is extrapolated
/// and a warning is logged. A constant sample yields W = 1, p = 1.
///
/// # Example
/// ```
/// use splitcheck::comparison::shapiro_wilk;
///
/// let data = [148.0, 154.0, 158.0, 160.0, 161.0, 162.0, 166.0, 170.0, 182.0, 195.0, 236.0];
/// let result = shapiro_wilk(&data).unwrap();
/// assert!((result.statistic - 0.7888).abs() < 1e-3);
/// assert!(result.p_value < 0.01);
/// ```
pub fn shapiro_wilk(values: &[f64]) -> CompareResult<TestStatistic> {
    let n = values.len();
    if n < 3 {
        return Err(CompareError::invalid(format!(
            "Shapiro-Wilk needs at least 3 observations, got {}",
            n
        )));
    }
    if n > SHAPIRO_MAX_OBSERVATIONS {
        tracing::warn!(
            n,
            limit = SHAPIRO_MAX_OBSERVATIONS,
            "Shapiro-Wilk p-value may be inaccurate above the calibrated sample size"
        );
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(CompareError::invalid(
            "Shapiro-Wilk input contains non-finite values",
        ));
    }

    let x = sorted(values);
    let mu = mean(&x);
    let ss: f64 = x.iter().map(|v| (v - mu).powi(2)).sum();
    if x[n - 1] - x[0] == 0.0 || ss == 0.0 {
        return Ok(TestStatistic {
            statistic: 1.0,
            p_value: 1.0,
        });
    }

    if n == 3 {
        let w = ((FRAC_1_SQRT_2 * (x[2] - x[0])).powi(2) / ss).clamp(0.75, 1.0);
        let p = 6.0 / PI * (w.sqrt().asin() - PI / 3.0);
        return TestStatistic {
            statistic: w,
            p_value: p.max(0.0),
        }
        .checked("Shapiro-Wilk");
    }

    let a = shapiro_coefficients(n)?;
    let numerator: f64 = a
        .iter()
        .enumerate()
        .map(|(i, ai)| ai * (x[n - 1 - i] - x[i]))
        .sum();
    let w = (numerator * numerator / ss).min(1.0);

    TestStatistic {
        statistic: w,
        p_value: shapiro_p_value(w, n),
    }
    .checked("Shapiro-Wilk")
}

// Half-vector of W coefficients from Blom-approximated normal order
// statistics, with Royston's polynomial correction of the extreme terms
fn shapiro_coefficients(n: usize) -> CompareResult<Vec<f64>> {
    let normal = standard_normal()?;
    let nf = n as f64;
    let half = n / 2;

    let m: Vec<f64> = (0..half)
        .map(|i| normal.inverse_cdf((i as f64 + 1.0 - 0.375) / (nf + 0.25)))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / nf.sqrt();

    let a1 = poly(&C1, rsn) - m[0] / ssumm2;
    let mut a = vec![0.0; half];
    a[0] = a1;

    let (fac_sq, one_minus, first_plain) = if n > 5 {
        let a2 = poly(&C2, rsn) - m[1] / ssumm2;
        a[1] = a2;
        (
            summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1],
            1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2,
            2,
        )
    } else {
        (summ2 - 2.0 * m[0] * m[0], 1.0 - 2.0 * a1 * a1, 1)
    };

    if fac_sq <= 0.0 || one_minus <= 0.0 {
        return Err(CompareError::computation(format!(
            "Shapiro-Wilk coefficients are degenerate for n={}",
            n
        )));
    }
    let fac = (fac_sq / one_minus).sqrt();
    for i in first_plain..half {
        a[i] = -m[i] / fac;
    }

    Ok(a)
}

fn shapiro_p_value(w: f64, n: usize) -> f64 {
    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }
    let y = w1.ln();
    let nf = n as f64;

    let (z_input, m, s) = if n <= 11 {
        let gamma = poly(&G, nf);
        if y >= gamma {
            return 0.0;
        }
        (-(gamma - y).ln(), poly(&C3, nf), poly(&C4, nf).exp())
    } else {
        let ln_n = nf.ln();
        (y, poly(&C5, ln_n), poly(&C6, ln_n).exp())
    };

    match standard_normal() {
        Ok(normal) => normal.sf((z_input - m) / s),
        Err(_) => f64::NAN,
    }
}

/// Levene's test: H0 = all groups have equal population variance
///
/// One-way ANOVA on |x - center(group)|, with F on (k-1, N-k) degrees of
/// freedom. Identical deviations everywhere give W = 0, p = 1.
///
/// # Example
/// ```
/// use splitcheck::comparison::{levene, LeveneCenter};
///
/// let tight = [4.9, 5.0, 5.0, 5.1, 5.0];
/// let wide = [0.0, 3.0, 5.0, 7.0, 10.0];
/// let result = levene(&[&tight, &wide], LeveneCenter::Median).unwrap();
/// assert!(result.p_value < 0.05);
/// ```
pub fn levene(groups: &[&[f64]], center: LeveneCenter) -> CompareResult<TestStatistic> {
    let k = groups.len();
    if k < 2 {
        return Err(CompareError::invalid(format!(
            "Levene's test needs at least 2 groups, got {}",
            k
        )));
    }
    if let Some(g) = groups.iter().find(|g| g.len() < 2) {
        return Err(CompareError::invalid(format!(
            "Levene's test needs at least 2 observations per group, got {}",
            g.len()
        )));
    }

    let deviations: Vec<Vec<f64>> = groups
        .iter()
        .map(|g| {
            let c = match center {
                LeveneCenter::Median => median(g),
                LeveneCenter::Mean => mean(g),
            };
            g.iter().map(|x| (x - c).abs()).collect()
        })
        .collect();

    let total: usize = deviations.iter().map(Vec::len).sum();
    let group_means: Vec<f64> = deviations.iter().map(|z| mean(z)).collect();
    let grand_mean = deviations.iter().flatten().sum::<f64>() / total as f64;

    let between: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(z, zm)| z.len() as f64 * (zm - grand_mean).powi(2))
        .sum();
    let within: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(z, zm)| z.iter().map(|v| (v - zm).powi(2)).sum::<f64>())
        .sum();

    let df1 = (k - 1) as f64;
    let df2 = (total - k) as f64;

    if within == 0.0 {
        if between == 0.0 {
            return Ok(TestStatistic {
                statistic: 0.0,
                p_value: 1.0,
            });
        }
        return Err(CompareError::computation(
            "Levene's test has zero within-group variance of deviations",
        ));
    }

    let w = (df2 * between) / (df1 * within);
    TestStatistic {
        statistic: w,
        p_value: f_survival(w, df1, df2)?,
    }
    .checked("Levene")
}
