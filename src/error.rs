//! Error types for the tsbatch library.

use thiserror::Error;

/// Result type alias for tsbatch operations.
pub type Result<T> = std::result::Result<T, TsError>;

/// Errors that can occur during time series analytics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TsError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A metric was configured without one of its required parameters.
    #[error("metric `{metric}` requires parameter `{parameter}`")]
    MissingParameter {
        metric: &'static str,
        parameter: &'static str,
    },

    /// No metric is registered under the given name.
    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    /// Number of clusters is zero or exceeds the number of series.
    #[error("invalid number of clusters: k = {k} with {n} series")]
    InvalidClusterCount { k: usize, n: usize },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A bulk allocation would exceed the context's memory budget.
    #[error("memory budget exceeded: requested {requested} bytes, budget {budget} bytes")]
    ResourceExhausted { requested: usize, budget: usize },

    /// Computation error (e.g., eigensolver failure).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl TsError {
    /// Whether this error reports invalid input or configuration, detected
    /// before any computation ran. Such errors are never worth retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            TsError::EmptyData
                | TsError::InsufficientData { .. }
                | TsError::InvalidParameter(_)
                | TsError::MissingParameter { .. }
                | TsError::UnknownMetric(_)
                | TsError::InvalidClusterCount { .. }
                | TsError::DimensionMismatch { .. }
        )
    }
}
