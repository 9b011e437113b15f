//! Tabular input: load CSV tables, tag groups, extract samples
//!
//! A dataset is a header row plus string cells. Numeric columns are parsed
//! on demand; empty cells and `NA`/`NaN`/`null` markers count as missing.
//!
//! Column names are matched exactly. `Group` and `group` are different
//! columns, and an unknown name is reported together with the available ones.

use crate::error::{CompareError, CompareResult};
use crate::sample::Sample;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Tokens treated as missing values (compared case-insensitively)
const MISSING_MARKERS: [&str; 4] = ["na", "nan", "null", "none"];

fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty()
        || MISSING_MARKERS
            .iter()
            .any(|m| trimmed.eq_ignore_ascii_case(m))
}

/// In-memory table with a header row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Build a dataset from headers and rows; short rows are padded with
    /// missing cells
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Load a CSV file with a header row
    ///
    /// # Example
    /// ```no_run
    /// use splitcheck::dataset::Dataset;
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let control = Dataset::from_csv_path("control_group.csv")?;
    /// println!("{} rows", control.n_rows());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("Failed to parse CSV {}", path.display()))
    }

    /// Parse CSV from any reader
    pub fn from_reader<R: Read>(input: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let headers: Vec<String> = reader
            .headers()
            .context("Failed to read CSV header row")?
            .iter()
            .map(String::from)
            .collect();

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read CSV record {}", line + 1))?;
            rows.push(record.iter().map(String::from).collect());
        }

        tracing::debug!(rows = rows.len(), columns = headers.len(), "loaded CSV");
        Ok(Self::new(headers, rows))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.headers.len()
    }

    /// Index of a column by exact name
    pub fn column_index(&self, name: &str) -> CompareResult<usize> {
        self.headers.iter().position(|h| h == name).ok_or_else(|| {
            CompareError::invalid(format!(
                "unknown column '{}' (available: {})",
                name,
                self.headers.join(", ")
            ))
        })
    }

    /// Cell value, or `None` when missing
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .filter(|c| !is_missing(c))
    }

    pub fn missing_count(&self, column: &str) -> CompareResult<usize> {
        let idx = self.column_index(column)?;
        Ok((0..self.n_rows())
            .filter(|&row| self.cell(row, idx).is_none())
            .count())
    }

    /// Parse a column as numbers; fails if any present cell is not numeric
    pub fn numeric_column(&self, column: &str) -> CompareResult<Vec<Option<f64>>> {
        let idx = self.column_index(column)?;
        (0..self.n_rows())
            .map(|row| match self.cell(row, idx) {
                None => Ok(None),
                Some(raw) => raw.parse::<f64>().map(Some).map_err(|_| {
                    CompareError::invalid(format!(
                        "column '{}' row {} is not numeric: '{}'",
                        column,
                        row + 1,
                        raw
                    ))
                }),
            })
            .collect()
    }

    /// Distinct values of a column in first-seen order
    pub fn group_labels(&self, group_column: &str) -> CompareResult<Vec<String>> {
        let idx = self.column_index(group_column)?;
        let mut labels: Vec<String> = Vec::new();
        for row in 0..self.n_rows() {
            if let Some(label) = self.cell(row, idx) {
                if !labels.iter().any(|l| l == label) {
                    labels.push(label.to_string());
                }
            }
        }
        Ok(labels)
    }

    /// Copy of this table with `column` set to `label` on every row
    ///
    /// Overwrites the column if it already exists, otherwise appends it.
    pub fn with_label_column(&self, column: &str, label: &str) -> Self {
        let mut tagged = self.clone();
        match tagged.headers.iter().position(|h| h == column) {
            Some(idx) => {
                for row in &mut tagged.rows {
                    row[idx] = label.to_string();
                }
            }
            None => {
                tagged.headers.push(column.to_string());
                for row in &mut tagged.rows {
                    row.push(label.to_string());
                }
            }
        }
        tagged
    }

    /// Stack rows of `other` under this table, aligning columns by name
    ///
    /// Columns present in only one table are missing in the other's rows.
    pub fn concat(&self, other: &Dataset) -> Self {
        let mut headers = self.headers.clone();
        for h in &other.headers {
            if !headers.contains(h) {
                headers.push(h.clone());
            }
        }

        let align = |table: &Dataset| -> Vec<Vec<String>> {
            let mapping: Vec<Option<usize>> = headers
                .iter()
                .map(|h| table.headers.iter().position(|t| t == h))
                .collect();
            table
                .rows
                .iter()
                .map(|row| {
                    mapping
                        .iter()
                        .map(|idx| idx.map(|i| row[i].clone()).unwrap_or_default())
                        .collect()
                })
                .collect()
        };

        let mut rows = align(self);
        rows.extend(align(other));
        Self { headers, rows }
    }

    /// Tag a control and a test table with their group labels and stack them
    ///
    /// # Example
    /// ```
    /// use splitcheck::dataset::Dataset;
    ///
    /// let control = Dataset::from_reader("Purchase\n10\n12\n".as_bytes()).unwrap();
    /// let test = Dataset::from_reader("Purchase\n11\n".as_bytes()).unwrap();
    ///
    /// let combined = Dataset::concat_groups(&control, &test, "Group", "Control", "Test");
    /// assert_eq!(combined.n_rows(), 3);
    /// assert_eq!(combined.group_labels("Group").unwrap(), vec!["Control", "Test"]);
    /// ```
    pub fn concat_groups(
        control: &Dataset,
        test: &Dataset,
        group_column: &str,
        control_label: &str,
        test_label: &str,
    ) -> Self {
        let control = control.with_label_column(group_column, control_label);
        let test = test.with_label_column(group_column, test_label);
        control.concat(&test)
    }

    /// Non-missing `metric` values for rows whose `group_column` equals
    /// `label`
    pub fn sample(&self, group_column: &str, label: &str, metric: &str) -> CompareResult<Sample> {
        let group_idx = self.column_index(group_column)?;
        let values = self.numeric_column(metric)?;

        let mut dropped = 0usize;
        let mut observations = Vec::new();
        for (row, value) in values.into_iter().enumerate() {
            if self.cell(row, group_idx) != Some(label) {
                continue;
            }
            match value {
                Some(v) => observations.push(v),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            tracing::warn!(
                group = label,
                metric,
                dropped,
                "dropped rows with missing metric values"
            );
        }

        Ok(Sample::new(label, observations))
    }
}
