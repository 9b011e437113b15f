// Two-sample comparison with automatic assumption checking
//
// Chooses between Student's t, Welch's t and Mann-Whitney U from the
// outcome of a Shapiro-Wilk normality check on each group and a Levene
// variance-homogeneity check across groups. The choice is a pure function
// of those outcomes, and every intermediate statistic is reported.
//
// Scientific Foundation:
// [1] Royston, P. (1995). Remark AS R94. Applied Statistics, 44(4).
// [2] Brown, M. B. & Forsythe, A. B. (1974). JASA, 69(346).
// [3] Mann, H. B. & Whitney, D. R. (1947). Ann. Math. Statist., 18(1).
// [4] Welch, B. L. (1947). The generalization of "Student's" problem when
//     several different population variances are involved. Biometrika, 34.
//
// Implementation:
// - Uses statrs (crates.io) for the normal, Student's t and F distributions
// - All statistics are computed in f64

mod assumptions;
mod config;
mod hypothesis;
pub(crate) mod statistics;
mod verdict;

pub use assumptions::{
    check_normality, check_variance_homogeneity, levene, shapiro_wilk, AssumptionResult,
    SHAPIRO_MAX_OBSERVATIONS,
};
pub use config::{ComparisonConfig, LeveneCenter, MIN_OBSERVATIONS};
pub use hypothesis::{mann_whitney_u, student_t, welch_t, MANN_WHITNEY_EXACT_LIMIT};
pub use statistics::TestStatistic;
pub use verdict::{
    compare, compare_with_alpha, select_test, ComparisonReport, TestKind, TestVerdict,
};
