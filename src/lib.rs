//! splitcheck - Two-sample A/B hypothesis testing with assumption checks
//!
//! Compares a control and a test group on a numeric outcome. Shapiro-Wilk
//! decides normality per group; when both groups are normal, Levene's test
//! decides between Student's and Welch's t-test, otherwise the Mann-Whitney
//! U test is used. The report records every intermediate result.

pub mod cli;
pub mod comparison;
pub mod config;
pub mod dataset;
pub mod describe;
pub mod error;
pub mod json_output;
pub mod sample;
