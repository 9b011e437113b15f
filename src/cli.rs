//! CLI argument parsing for splitcheck

use crate::comparison::LeveneCenter;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for comparison results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

/// Center for Levene's test
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CenterArg {
    /// Brown-Forsythe (robust to skew)
    Median,
    /// Levene's original formulation
    Mean,
}

impl From<CenterArg> for LeveneCenter {
    fn from(arg: CenterArg) -> Self {
        match arg {
            CenterArg::Median => LeveneCenter::Median,
            CenterArg::Mean => LeveneCenter::Mean,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "splitcheck")]
#[command(version)]
#[command(
    about = "A/B test two groups with automatic normality and variance checks",
    long_about = None
)]
pub struct Cli {
    /// Single CSV holding both groups, labeled by the group column
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["control", "test"])]
    pub data: Option<PathBuf>,

    /// CSV holding only control-group rows (requires --test)
    #[arg(long, value_name = "FILE", requires = "test")]
    pub control: Option<PathBuf>,

    /// CSV holding only test-group rows (requires --control)
    #[arg(long, value_name = "FILE", requires = "control")]
    pub test: Option<PathBuf>,

    /// TOML configuration file ([analysis] and [comparison] tables)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Numeric outcome column (default: Purchase)
    #[arg(short, long, value_name = "COLUMN")]
    pub metric: Option<String>,

    /// Column holding group labels (default: Group)
    #[arg(long = "group-column", value_name = "COLUMN")]
    pub group_column: Option<String>,

    /// Label of the control group (default: Control)
    #[arg(long = "control-label", value_name = "LABEL")]
    pub control_label: Option<String>,

    /// Label of the test group (default: Test)
    #[arg(long = "test-label", value_name = "LABEL")]
    pub test_label: Option<String>,

    /// Significance level for every test (default: 0.05)
    #[arg(short, long, value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Center for Levene's variance-homogeneity test
    #[arg(long = "levene-center", value_enum, value_name = "CENTER")]
    pub levene_center: Option<CenterArg>,

    /// Print shape, missing values and summary statistics before testing
    #[arg(long)]
    pub profile: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing on stderr
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_single_file() {
        let cli = Cli::parse_from(["splitcheck", "--data", "ab.csv"]);
        assert_eq!(cli.data, Some(PathBuf::from("ab.csv")));
        assert!(cli.control.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_parses_split_files() {
        let cli = Cli::parse_from(["splitcheck", "--control", "c.csv", "--test", "t.csv"]);
        assert_eq!(cli.control, Some(PathBuf::from("c.csv")));
        assert_eq!(cli.test, Some(PathBuf::from("t.csv")));
    }

    #[test]
    fn test_cli_control_requires_test() {
        assert!(Cli::try_parse_from(["splitcheck", "--control", "c.csv"]).is_err());
    }

    #[test]
    fn test_cli_data_conflicts_with_split_files() {
        assert!(Cli::try_parse_from([
            "splitcheck",
            "--data",
            "ab.csv",
            "--control",
            "c.csv",
            "--test",
            "t.csv"
        ])
        .is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "splitcheck",
            "-d",
            "ab.csv",
            "--metric",
            "Earning",
            "--alpha",
            "0.01",
            "--levene-center",
            "mean",
            "--format",
            "json",
            "--profile",
        ]);
        assert_eq!(cli.metric.as_deref(), Some("Earning"));
        assert_eq!(cli.alpha, Some(0.01));
        assert_eq!(cli.levene_center, Some(CenterArg::Mean));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.profile);
    }

    #[test]
    fn test_cli_debug_default_false() {
        let cli = Cli::parse_from(["splitcheck", "-d", "ab.csv"]);
        assert!(!cli.debug);
        assert!(!cli.profile);
    }

    #[test]
    fn test_center_arg_conversion() {
        assert_eq!(LeveneCenter::from(CenterArg::Median), LeveneCenter::Median);
        assert_eq!(LeveneCenter::from(CenterArg::Mean), LeveneCenter::Mean);
    }
}
