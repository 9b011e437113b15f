//! Descriptive statistics for reporting
//!
//! Group summaries (mean, count, std) and a per-column dataset profile with
//! shape, missing counts and quartiles. Not part of the hypothesis-testing
//! decision; these values are only displayed.
//!
//! Means and standard deviations are computed in f64 so large-magnitude
//! metrics keep their digits. Quartiles go through trueno::Vector and
//! aprender's DescriptiveStats (R-7 method), which work in f32.

use crate::comparison::statistics::{mean, sample_variance};
use crate::dataset::Dataset;
use crate::error::{CompareError, CompareResult};
use crate::sample::Sample;
use aprender::stats::DescriptiveStats;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use trueno::Vector;

/// Mean, count and sample standard deviation for one group
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupSummary {
    pub mean: f64,
    pub count: usize,
    /// Sample standard deviation (n - 1 denominator); `None` below 2
    /// observations
    pub std: Option<f64>,
}

impl GroupSummary {
    pub fn from_sample(sample: &Sample) -> CompareResult<Self> {
        Self::from_values(sample.values())
    }

    fn from_values(values: &[f64]) -> CompareResult<Self> {
        if values.is_empty() {
            return Err(CompareError::invalid("cannot summarize an empty sample"));
        }

        let count = values.len();
        let std = (count > 1).then(|| sample_variance(values).sqrt());

        Ok(Self {
            mean: mean(values),
            count,
            std,
        })
    }
}

impl fmt::Display for GroupSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mean = {:.4}, count = {}", self.mean, self.count)?;
        match self.std {
            Some(std) => write!(f, ", std = {:.4}", std),
            None => write!(f, ", std = n/a"),
        }
    }
}

/// Per-group mean, count and std, keyed by group label
///
/// # Example
/// ```
/// use splitcheck::describe::summarize;
/// use splitcheck::sample::Sample;
/// use std::collections::BTreeMap;
///
/// let mut groups = BTreeMap::new();
/// groups.insert("Control".to_string(), Sample::new("Control", vec![1.0, 2.0, 3.0]));
/// groups.insert("Test".to_string(), Sample::new("Test", vec![2.0, 4.0]));
///
/// let summaries = summarize(&groups).unwrap();
/// assert_eq!(summaries["Control"].count, 3);
/// assert!((summaries["Test"].mean - 3.0).abs() < 1e-6);
/// ```
pub fn summarize(
    samples_by_group: &BTreeMap<String, Sample>,
) -> CompareResult<BTreeMap<String, GroupSummary>> {
    samples_by_group
        .iter()
        .map(|(group, sample)| Ok((group.clone(), GroupSummary::from_sample(sample)?)))
        .collect()
}

/// Summary of one numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub count: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

/// Shape, column types, missing counts and numeric summaries of a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: usize,
    /// (column name, missing cells) for every column
    pub missing: Vec<(String, usize)>,
    /// Non-numeric columns by name
    pub categorical: Vec<String>,
    pub numeric: Vec<ColumnProfile>,
}

fn quantile<E: fmt::Display>(result: Result<f32, E>) -> CompareResult<Option<f64>> {
    result
        .map(|q| Some(f64::from(q)))
        .map_err(|e| CompareError::computation(format!("Failed to compute quantile: {}", e)))
}

fn profile_column(name: &str, cells: &[Option<f64>]) -> CompareResult<ColumnProfile> {
    let present: Vec<f64> = cells.iter().flatten().copied().collect();
    let missing = cells.len() - present.len();

    if present.is_empty() {
        return Ok(ColumnProfile {
            name: name.to_string(),
            count: 0,
            missing,
            mean: None,
            std: None,
            min: None,
            q1: None,
            median: None,
            q3: None,
            max: None,
        });
    }

    let summary = GroupSummary::from_values(&present)?;
    let narrowed: Vec<f32> = present.iter().map(|&v| v as f32).collect();
    let vector = Vector::from_slice(&narrowed);
    let stats = DescriptiveStats::new(&vector);

    Ok(ColumnProfile {
        name: name.to_string(),
        count: present.len(),
        missing,
        mean: Some(summary.mean),
        std: summary.std,
        min: quantile(stats.quantile(0.0))?,
        q1: quantile(stats.quantile(0.25))?,
        median: quantile(stats.quantile(0.5))?,
        q3: quantile(stats.quantile(0.75))?,
        max: quantile(stats.quantile(1.0))?,
    })
}

/// Profile every column of a dataset
pub fn profile(dataset: &Dataset) -> CompareResult<DatasetProfile> {
    let mut missing = Vec::with_capacity(dataset.n_columns());
    let mut categorical = Vec::new();
    let mut numeric = Vec::new();

    for name in dataset.headers() {
        missing.push((name.clone(), dataset.missing_count(name)?));
        match dataset.numeric_column(name) {
            Ok(cells) => numeric.push(profile_column(name, &cells)?),
            Err(_) => categorical.push(name.clone()),
        }
    }

    Ok(DatasetProfile {
        rows: dataset.n_rows(),
        columns: dataset.n_columns(),
        missing,
        categorical,
        numeric,
    })
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.5}", v))
}

impl DatasetProfile {
    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        report.push_str("=== SHAPE ===\n");
        report.push_str(&format!("({}, {})\n", self.rows, self.columns));

        report.push_str("\n=== TYPES ===\n");
        for (name, _) in &self.missing {
            let kind = if self.categorical.contains(name) {
                "text"
            } else {
                "numeric"
            };
            report.push_str(&format!("{:<16} {}\n", name, kind));
        }

        report.push_str("\n=== MISSING ===\n");
        for (name, count) in &self.missing {
            report.push_str(&format!("{:<16} {}\n", name, count));
        }

        if !self.numeric.is_empty() {
            report.push_str("\n=== SUMMARY STATISTICS ===\n");
            report.push_str(&format!(
                "{:<16} {:>6} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
                "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
            ));
            for col in &self.numeric {
                report.push_str(&format!(
                    "{:<16} {:>6} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
                    col.name,
                    col.count,
                    cell(col.mean),
                    cell(col.std),
                    cell(col.min),
                    cell(col.q1),
                    cell(col.median),
                    cell(col.q3),
                    cell(col.max)
                ));
            }
        }

        report
    }
}
