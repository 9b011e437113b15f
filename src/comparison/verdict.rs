// Assumption-driven test selection and the final comparison verdict
//
// Decision tree:
//   1. Shapiro-Wilk on each group
//   2. Either group non-normal          -> Mann-Whitney U (Levene skipped)
//   3. Both normal, Levene rejected     -> Welch's t
//      Both normal, Levene not rejected -> Student's t
//   4. reject_null = p < alpha
//
// Every intermediate result is kept on the report so the branch taken can be
// audited after the fact.

use crate::comparison::assumptions::{
    check_normality, check_variance_homogeneity, AssumptionResult,
};
use crate::comparison::config::ComparisonConfig;
use crate::comparison::hypothesis::{mann_whitney_u, student_t, welch_t};
use crate::describe::GroupSummary;
use crate::error::CompareResult;
use crate::sample::Sample;
use serde::Serialize;

/// The hypothesis test chosen by the decision tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TestKind {
    #[serde(rename = "Welch-t")]
    WelchT,
    #[serde(rename = "Student-t")]
    StudentT,
    #[serde(rename = "Mann-Whitney-U")]
    MannWhitneyU,
}

impl TestKind {
    pub fn name(&self) -> &'static str {
        match self {
            TestKind::WelchT => "Welch-t",
            TestKind::StudentT => "Student-t",
            TestKind::MannWhitneyU => "Mann-Whitney-U",
        }
    }

    /// Why the decision tree lands on this test
    pub fn rationale(&self) -> &'static str {
        match self {
            TestKind::WelchT => "both groups normal, variances not homogeneous",
            TestKind::StudentT => "both groups normal, variances homogeneous",
            TestKind::MannWhitneyU => "normality rejected for at least one group",
        }
    }
}

impl std::fmt::Display for TestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of the selected hypothesis test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestVerdict {
    pub test_name: TestKind,
    pub statistic: f64,
    pub p_value: f64,
    /// `p_value < alpha`
    pub reject_null: bool,
}

/// Full record of one comparison, including the decision path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub control_label: String,
    pub test_label: String,
    pub alpha: f64,
    pub control_summary: GroupSummary,
    pub test_summary: GroupSummary,
    pub control_normality: AssumptionResult,
    pub test_normality: AssumptionResult,
    /// `None` when normality was rejected and Levene was never run
    pub variance_homogeneity: Option<AssumptionResult>,
    pub verdict: TestVerdict,
}

/// Map assumption outcomes to a test
///
/// `variance_rejected` is ignored whenever normality is rejected.
///
/// # Example
/// ```
/// use splitcheck::comparison::{select_test, TestKind};
///
/// assert_eq!(select_test(true, false), TestKind::MannWhitneyU);
/// assert_eq!(select_test(false, true), TestKind::WelchT);
/// assert_eq!(select_test(false, false), TestKind::StudentT);
/// ```
pub fn select_test(normality_rejected: bool, variance_rejected: bool) -> TestKind {
    match (normality_rejected, variance_rejected) {
        (true, _) => TestKind::MannWhitneyU,
        (false, true) => TestKind::WelchT,
        (false, false) => TestKind::StudentT,
    }
}

/// Compare two groups with the default configuration and the given alpha
pub fn compare_with_alpha(
    control: &Sample,
    test: &Sample,
    alpha: f64,
) -> CompareResult<ComparisonReport> {
    compare(control, test, &ComparisonConfig::with_alpha(alpha))
}

/// Run the assumption checks, select a test, and produce the verdict
///
/// Both samples are validated before any test runs; an invalid input
/// yields `CompareError::InvalidInput` and no partial result.
///
/// # Example
/// ```
/// use splitcheck::comparison::{compare, ComparisonConfig, TestKind};
/// use splitcheck::sample::Sample;
///
/// let control = Sample::new("Control", vec![100.0, 102.0, 98.0, 101.0, 99.0, 103.0, 97.0, 100.0, 101.0, 99.0]);
/// let test = Sample::new("Test", vec![101.0, 99.0, 100.0, 102.0, 98.0, 100.0, 103.0, 97.0, 101.0, 100.0]);
///
/// let report = compare(&control, &test, &ComparisonConfig::default()).unwrap();
/// assert_eq!(report.verdict.test_name, TestKind::StudentT);
/// assert!(!report.verdict.reject_null);
/// ```
pub fn compare(
    control: &Sample,
    test: &Sample,
    config: &ComparisonConfig,
) -> CompareResult<ComparisonReport> {
    config.validate()?;
    control.validate(config.min_sample_size)?;
    test.validate(config.min_sample_size)?;

    let alpha = config.significance_level;

    // Step 1: normality per group
    let control_normality = check_normality(control, alpha)?;
    let test_normality = check_normality(test, alpha)?;
    let normality_rejected = control_normality.rejected || test_normality.rejected;

    // Step 2: variance homogeneity only matters for the parametric branch
    let variance_homogeneity = if normality_rejected {
        None
    } else {
        Some(check_variance_homogeneity(
            control,
            test,
            config.levene_center,
            alpha,
        )?)
    };
    let variance_rejected = variance_homogeneity.is_some_and(|h| h.rejected);

    // Step 3: exactly one test branch
    let test_name = select_test(normality_rejected, variance_rejected);
    tracing::debug!(
        control = control.label(),
        test = test.label(),
        selected = %test_name,
        "selected test: {}",
        test_name.rationale()
    );

    let outcome = match test_name {
        TestKind::MannWhitneyU => mann_whitney_u(control.values(), test.values())?,
        TestKind::WelchT => welch_t(control.values(), test.values())?,
        TestKind::StudentT => student_t(control.values(), test.values())?,
    };

    // Step 4: verdict
    let verdict = TestVerdict {
        test_name,
        statistic: outcome.statistic,
        p_value: outcome.p_value,
        reject_null: outcome.p_value < alpha,
    };

    Ok(ComparisonReport {
        control_label: control.label().to_string(),
        test_label: test.label().to_string(),
        alpha,
        control_summary: GroupSummary::from_sample(control)?,
        test_summary: GroupSummary::from_sample(test)?,
        control_normality,
        test_normality,
        variance_homogeneity,
        verdict,
    })
}

fn stat_line(result: &AssumptionResult) -> String {
    format!(
        "Test Stat = {:.4}, p-value = {:.4}",
        result.statistic, result.p_value
    )
}

fn assumption_outcome(rejected: bool, holds: &str, fails: &str) -> String {
    if rejected {
        format!("H0 rejected: {}", fails)
    } else {
        format!("H0 not rejected: {}", holds)
    }
}

impl ComparisonReport {
    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        // Hypotheses
        report.push_str("Hypotheses:\n");
        report.push_str(&format!(
            "  H0: M1 = M2 (no significant difference between {} and {} means)\n",
            self.control_label, self.test_label
        ));
        report.push_str(&format!(
            "  H1: M1 != M2 (significant difference between {} and {} means)\n",
            self.control_label, self.test_label
        ));
        report.push_str(&format!(
            "Significance level: {} ({}% confidence)\n\n",
            self.alpha,
            (1.0 - self.alpha) * 100.0
        ));

        // Group means
        report.push_str("Group summary:\n");
        for (label, summary) in [
            (&self.control_label, &self.control_summary),
            (&self.test_label, &self.test_summary),
        ] {
            report.push_str(&format!("  {}: {}\n", label, summary));
        }

        // Assumption checks
        report.push_str("\nNormality (Shapiro-Wilk):\n");
        for (label, result) in [
            (&self.control_label, &self.control_normality),
            (&self.test_label, &self.test_normality),
        ] {
            report.push_str(&format!(
                "  {}: {} ({})\n",
                label,
                stat_line(result),
                assumption_outcome(result.rejected, "normal", "not normal")
            ));
        }

        report.push_str("\nVariance homogeneity (Levene):\n");
        match &self.variance_homogeneity {
            Some(result) => report.push_str(&format!(
                "  {} ({})\n",
                stat_line(result),
                assumption_outcome(result.rejected, "homogeneous", "not homogeneous")
            )),
            None => report.push_str("  skipped (normality rejected)\n"),
        }

        // Verdict
        let verdict = &self.verdict;
        report.push_str(&format!(
            "\nSelected test: {} ({})\n",
            verdict.test_name,
            verdict.test_name.rationale()
        ));
        report.push_str(&format!(
            "  Test Stat = {:.4}, p-value = {:.4}\n\n",
            verdict.statistic, verdict.p_value
        ));

        if verdict.reject_null {
            report.push_str(&format!(
                "REJECT H0: {} and {} differ significantly (p < {})\n",
                self.control_label, self.test_label, self.alpha
            ));
        } else {
            report.push_str(&format!(
                "FAIL TO REJECT H0: no significant difference between {} and {} (p >= {})\n",
                self.control_label, self.test_label, self.alpha
            ));
        }

        report
    }
}
