//! Error types for two-sample comparisons
//!
//! Invalid inputs are rejected before any statistical test runs, so a
//! comparison either completes fully or fails without partial results.

use thiserror::Error;

/// Errors raised by the comparison core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompareError {
    /// Sample too small, non-finite observations, unknown column, or an
    /// out-of-range configuration value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Numerical failure inside a statistical routine
    #[error("Statistical computation failed: {0}")]
    Computation(String),
}

/// Result alias used throughout the comparison core
pub type CompareResult<T> = std::result::Result<T, CompareError>;

impl CompareError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub(crate) fn computation(message: impl std::fmt::Display) -> Self {
        Self::Computation(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = CompareError::invalid("sample 'control' has 2 observations");
        assert_eq!(
            err.to_string(),
            "Invalid input: sample 'control' has 2 observations"
        );
    }

    #[test]
    fn test_computation_message() {
        let err = CompareError::computation("variance is zero");
        assert!(matches!(err, CompareError::Computation(_)));
        assert!(err.to_string().contains("variance is zero"));
    }
}
