// ⚠️ Core Errors - local validation failures
// None of these are fatal and none are retryable: every core operation is a
// pure function of its inputs.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Predictor needs a minimum number of records to compute a trend
    #[error("insufficient history: need at least {required} records, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    /// Quantity is non-numeric, negative, or non-finite
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Category is outside the fixed enumeration
    #[error("invalid category: {0:?} (expected transport, energy, food or waste)")]
    InvalidCategory(String),

    #[error("description must not be blank")]
    EmptyDescription,

    /// Month of year outside 1..=12
    #[error("invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    /// A monthly record that cannot take part in a computation
    #[error("invalid record {period:?}: {reason}")]
    InvalidRecord { period: String, reason: String },
}

impl CoreError {
    /// True for errors caused by the caller's input rather than missing data
    pub fn is_validation(&self) -> bool {
        !matches!(self, CoreError::InsufficientHistory { .. })
    }
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientHistory { required: 3, actual: 1 };
        assert_eq!(
            err.to_string(),
            "insufficient history: need at least 3 records, got 1"
        );
        assert_eq!(CoreError::InvalidMonth(13).to_string(), "invalid month: 13 (expected 1-12)");
    }

    #[test]
    fn test_validation_classification() {
        assert!(!CoreError::InsufficientHistory { required: 3, actual: 0 }.is_validation());
        assert!(CoreError::EmptyDescription.is_validation());
        assert!(CoreError::InvalidCategory("travel".to_string()).is_validation());
    }
}
