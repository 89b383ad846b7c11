//! Error types for the structural-breaks library.

use thiserror::Error;

/// Result type alias for break detection operations.
pub type Result<T> = std::result::Result<T, BreakError>;

/// Errors that can occur while preparing or analysing a series.
///
/// Degenerate statistics (too few degrees of freedom, zero residuals) are not
/// errors; they are encoded as `None` or infinite values in the results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BreakError {
    /// No value column was given and none could be inferred.
    #[error("no usable numeric column found to use as value column")]
    NoNumericColumn,

    /// The requested value column does not exist.
    #[error("value column '{0}' not found")]
    ColumnNotFound(String),

    /// The requested value column exists but holds non-numeric data.
    #[error("value column '{0}' is not numeric")]
    ColumnNotNumeric(String),

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between the date column and a data column.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Date parsing or ordering error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Non-finite values detected in the analysed column.
    #[error("missing values detected in column '{0}'")]
    MissingValues(String),

    /// Computation error (e.g., singular design matrix).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl BreakError {
    /// Whether this error stems from value column resolution.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BreakError::NoNumericColumn
                | BreakError::ColumnNotFound(_)
                | BreakError::ColumnNotNumeric(_)
        )
    }
}
