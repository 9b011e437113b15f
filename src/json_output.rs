//! JSON output format for comparison results
//!
//! --format json: the full decision path plus an optional dataset profile.

use crate::comparison::ComparisonReport;
use crate::describe::DatasetProfile;
use serde::Serialize;

/// Top-level JSON document
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    pub version: String,
    pub format: String,
    /// Outcome column the groups were compared on
    pub metric: String,
    pub comparison: ComparisonReport,
    /// Dataset profile (if --profile enabled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<DatasetProfile>,
}

impl JsonOutput {
    /// Create a new JSON output structure
    pub fn new(metric: impl Into<String>, comparison: ComparisonReport) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "splitcheck-json-v1".to_string(),
            metric: metric.into(),
            comparison,
            profile: None,
        }
    }

    /// Attach the dataset profile
    pub fn set_profile(&mut self, profile: DatasetProfile) {
        self.profile = Some(profile);
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::{compare, ComparisonConfig};
    use crate::sample::Sample;

    fn report(test_values: Vec<f64>) -> ComparisonReport {
        let control = Sample::new(
            "Control",
            vec![100.0, 102.0, 98.0, 101.0, 99.0, 103.0, 97.0, 100.0, 101.0, 99.0],
        );
        let test = Sample::new("Test", test_values);
        compare(&control, &test, &ComparisonConfig::default()).unwrap()
    }

    #[test]
    fn test_json_serialization() {
        let output = JsonOutput::new(
            "Purchase",
            report(vec![
                101.0, 99.0, 100.0, 102.0, 98.0, 100.0, 103.0, 97.0, 101.0, 100.0,
            ]),
        );

        let json = output.to_json().unwrap();
        assert!(json.contains("\"format\": \"splitcheck-json-v1\""));
        assert!(json.contains("\"metric\": \"Purchase\""));
        assert!(json.contains("\"test_name\": \"Student-t\""));
        assert!(json.contains("\"reject_null\": false"));
        assert!(!json.contains("\"profile\""));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["comparison"]["variance_homogeneity"]["p_value"].is_number());
        assert_eq!(value["comparison"]["control_summary"]["count"], 10);
    }

    #[test]
    fn test_mann_whitney_branch_has_null_homogeneity() {
        let output = JsonOutput::new(
            "Purchase",
            report(vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 50.0]),
        );

        let value: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();
        assert!(value["comparison"]["variance_homogeneity"].is_null());
        assert_eq!(value["comparison"]["verdict"]["test_name"], "Mann-Whitney-U");
    }
}
