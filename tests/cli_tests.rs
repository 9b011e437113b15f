// End-to-end CLI tests: CSV input, text and JSON output, config files

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn splitcheck() -> Command {
    Command::cargo_bin("splitcheck").unwrap()
}

// ============================================================================
// Text output
// ============================================================================

#[test]
fn test_split_files_student_branch() {
    // Control and test exported as separate sheets, tagged and stacked
    splitcheck()
        .arg("--control")
        .arg(fixture("control_group.csv"))
        .arg("--test")
        .arg(fixture("test_group.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Metric: Purchase"))
        .stdout(predicate::str::contains("H0: M1 = M2"))
        .stdout(predicate::str::contains("Selected test: Student-t"))
        .stdout(predicate::str::contains("FAIL TO REJECT H0"));
}

#[test]
fn test_combined_file_matches_split_files() {
    splitcheck()
        .arg("--data")
        .arg(fixture("ab_combined.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected test: Student-t"))
        .stdout(predicate::str::contains("Control: mean = 573.9540"))
        .stdout(predicate::str::contains("Test: mean = 608.2290"));
}

#[test]
fn test_skewed_group_uses_mann_whitney() {
    splitcheck()
        .arg("--data")
        .arg(fixture("ab_skewed.csv"))
        .arg("--metric")
        .arg("Conversions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected test: Mann-Whitney-U"))
        .stdout(predicate::str::contains("skipped (normality rejected)"))
        .stdout(predicate::str::contains("REJECT H0"));
}

#[test]
fn test_profile_output() {
    splitcheck()
        .arg("--control")
        .arg(fixture("control_group.csv"))
        .arg("--test")
        .arg(fixture("test_group.csv"))
        .arg("--profile")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== SHAPE ==="))
        .stdout(predicate::str::contains("(40, 5)"))
        .stdout(predicate::str::contains("=== SUMMARY STATISTICS ==="))
        .stdout(predicate::str::contains("Impression"));
}

// ============================================================================
// JSON output
// ============================================================================

#[test]
fn test_json_output() {
    let output = splitcheck()
        .arg("--data")
        .arg(fixture("ab_combined.csv"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["format"], "splitcheck-json-v1");
    assert_eq!(value["metric"], "Purchase");
    assert_eq!(value["comparison"]["verdict"]["test_name"], "Student-t");
    assert_eq!(value["comparison"]["verdict"]["reject_null"], false);
    assert_eq!(value["comparison"]["control_summary"]["count"], 20);
    assert!(value.get("profile").is_none());
}

#[test]
fn test_json_output_with_profile() {
    let output = splitcheck()
        .arg("--data")
        .arg(fixture("ab_skewed.csv"))
        .arg("--metric")
        .arg("Conversions")
        .arg("--format")
        .arg("json")
        .arg("--profile")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["comparison"]["variance_homogeneity"].is_null());
    assert_eq!(value["profile"]["rows"], 25);
    assert_eq!(value["profile"]["categorical"][0], "Group");
    // the NA row is dropped from the test sample
    assert_eq!(value["comparison"]["test_summary"]["count"], 12);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_file_and_override() {
    let tmp_dir = TempDir::new().unwrap();
    let config_path = tmp_dir.path().join("splitcheck.toml");
    fs::write(
        &config_path,
        r#"
[analysis]
metric = "Conversions"

[comparison]
significance_level = 0.01
"#,
    )
    .unwrap();

    splitcheck()
        .arg("--data")
        .arg(fixture("ab_skewed.csv"))
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Metric: Conversions"))
        .stdout(predicate::str::contains("Significance level: 0.01"));

    // Command-line alpha wins over the file
    splitcheck()
        .arg("--data")
        .arg(fixture("ab_skewed.csv"))
        .arg("--config")
        .arg(&config_path)
        .arg("--alpha")
        .arg("0.1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Significance level: 0.1"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unknown_column_lists_available() {
    splitcheck()
        .arg("--data")
        .arg(fixture("ab_combined.csv"))
        .arg("--group-column")
        .arg("group")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown column 'group'"))
        .stderr(predicate::str::contains("Group"));
}

#[test]
fn test_unknown_label_is_invalid_input() {
    splitcheck()
        .arg("--data")
        .arg(fixture("ab_combined.csv"))
        .arg("--test-label")
        .arg("Variant")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_missing_input_fails() {
    splitcheck()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--data FILE"));
}

#[test]
fn test_invalid_alpha_fails() {
    splitcheck()
        .arg("--data")
        .arg(fixture("ab_combined.csv"))
        .arg("--alpha")
        .arg("1.5")
        .assert()
        .failure()
        .stderr(predicate::str::contains("significance_level"));
}

#[test]
fn test_too_few_observations() {
    let tmp_dir = TempDir::new().unwrap();
    let data = tmp_dir.path().join("tiny.csv");
    fs::write(&data, "Group,Purchase\nControl,1\nControl,2\nTest,3\nTest,4\nTest,5\n").unwrap();

    splitcheck()
        .arg("--data")
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("'Control' has 2 observations"));
}
