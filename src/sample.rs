//! Numeric observations for one experimental group

use crate::error::{CompareError, CompareResult};
use serde::Serialize;

/// Ordered sequence of real-valued observations for one group
///
/// # Example
/// ```
/// use splitcheck::sample::Sample;
///
/// let control = Sample::new("Control", vec![100.0, 102.0, 98.0]);
/// assert_eq!(control.len(), 3);
/// assert_eq!(control.label(), "Control");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    label: String,
    values: Vec<f64>,
}

impl Sample {
    /// Create a labeled sample
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reject samples with fewer than `min_len` observations or any
    /// non-finite value
    pub fn validate(&self, min_len: usize) -> CompareResult<()> {
        if self.values.len() < min_len {
            return Err(CompareError::invalid(format!(
                "sample '{}' has {} observations, need at least {}",
                self.label,
                self.values.len(),
                min_len
            )));
        }

        if let Some(pos) = self.values.iter().position(|v| !v.is_finite()) {
            return Err(CompareError::invalid(format!(
                "sample '{}' contains non-finite value {} at index {}",
                self.label, self.values[pos], pos
            )));
        }

        Ok(())
    }
}
