//! Analysis configuration loaded from TOML
//!
//! Names the outcome metric, the group column and labels, and carries the
//! comparison settings. Every field has a default, so a file only needs the
//! values it changes.
//!
//! # Example splitcheck.toml
//!
//! ```toml
//! [analysis]
//! metric = "Purchase"
//! group_column = "Group"
//! control_label = "Control"
//! test_label = "Test"
//!
//! [comparison]
//! significance_level = 0.05
//! levene_center = "median"
//! ```

use crate::comparison::ComparisonConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which column and groups to compare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Numeric outcome column
    pub metric: String,
    /// Column holding the group label
    pub group_column: String,
    pub control_label: String,
    pub test_label: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            metric: "Purchase".to_string(),
            group_column: "Group".to_string(),
            control_label: "Control".to_string(),
            test_label: "Test".to_string(),
        }
    }
}

/// Root configuration for splitcheck.toml
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub analysis: AnalysisSettings,
    pub comparison: ComparisonConfig,
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    ///
    /// # Example
    ///
    /// ```no_run
    /// use splitcheck::config::AnalysisConfig;
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = AnalysisConfig::from_file("splitcheck.toml")?;
    /// println!("metric: {}", config.analysis.metric);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.comparison.validate()?;
        Ok(config)
    }
}
