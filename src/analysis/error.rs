//! Indicator math error types.

use thiserror::Error;

/// Errors raised by the indicator math functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    /// Bad parameters: zero period, empty input, mismatched array lengths.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Fewer values than the window needs.
    #[error("insufficient data: need {required} values, got {actual}")]
    InsufficientData {
        /// Required number of values.
        required: usize,
        /// Actual number of values provided.
        actual: usize,
    },
}

impl IndicatorError {
    /// Creates an `InvalidInput` error with a message.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        IndicatorError::InvalidInput(msg.into())
    }
}

/// Shared guard: period must be positive, input non-empty and at least `required` long.
pub(crate) fn check_window(
    values: &[f64],
    period: usize,
    required: usize,
) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::invalid_input("period must be greater than 0"));
    }
    if values.is_empty() {
        return Err(IndicatorError::invalid_input("input series is empty"));
    }
    if values.len() < required {
        return Err(IndicatorError::InsufficientData {
            required,
            actual: values.len(),
        });
    }
    Ok(())
}
