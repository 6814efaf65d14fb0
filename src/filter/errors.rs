//! Filter evaluation errors
//!
//! Error codes:
//! - QQQ_FILTER_INVALID_ARGUMENT: malformed criterion (missing or null values)
//! - QQQ_FILTER_TYPE_MISMATCH: operator applied to values of the wrong type
//! - QQQ_FILTER_UNSUPPORTED_COMPARISON: ordering between incompatible types
//!
//! All of these are construction bugs in the filter or metadata. They abort
//! the whole match attempt and are never retried.

use thiserror::Error;

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;

/// Filter evaluation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Missing, extra or null criterion values
    #[error("Invalid filter argument: {0}")]
    InvalidArgument(String),

    /// String operators used on non-string values
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Ordering requested between types that have no defined ordering
    #[error("Greater/Less Than comparisons are not implemented for the supplied types [{left}][{right}]")]
    UnsupportedComparison {
        /// Record value type name
        left: &'static str,
        /// Criterion value type name
        right: &'static str,
    },
}

impl FilterError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        FilterError::InvalidArgument(reason.into())
    }

    pub fn type_mismatch(reason: impl Into<String>) -> Self {
        FilterError::TypeMismatch(reason.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            FilterError::InvalidArgument(_) => "QQQ_FILTER_INVALID_ARGUMENT",
            FilterError::TypeMismatch(_) => "QQQ_FILTER_TYPE_MISMATCH",
            FilterError::UnsupportedComparison { .. } => "QQQ_FILTER_UNSUPPORTED_COMPARISON",
        }
    }
}
