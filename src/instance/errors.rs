//! Instance metadata errors
//!
//! Error codes:
//! - QQQ_INSTANCE_MALFORMED_METADATA: metadata file unreadable or invalid
//! - QQQ_INSTANCE_DUPLICATE_TABLE: two tables share a name
//! - QQQ_INSTANCE_UNKNOWN_TABLE: table name not registered
//! - security codes pass through for lock validation failures

use thiserror::Error;

use crate::security::SecurityError;

/// Result type for instance operations
pub type InstanceResult<T> = Result<T, InstanceError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    #[error("Malformed metadata at {path}: {reason}")]
    MalformedMetadata { path: String, reason: String },

    #[error("Duplicate table: {0}")]
    DuplicateTable(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error(transparent)]
    Security(#[from] SecurityError),
}

impl InstanceError {
    pub fn malformed_metadata(path: impl Into<String>, reason: impl Into<String>) -> Self {
        InstanceError::MalformedMetadata {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            InstanceError::MalformedMetadata { .. } => "QQQ_INSTANCE_MALFORMED_METADATA",
            InstanceError::DuplicateTable(_) => "QQQ_INSTANCE_DUPLICATE_TABLE",
            InstanceError::UnknownTable(_) => "QQQ_INSTANCE_UNKNOWN_TABLE",
            InstanceError::Security(err) => err.code(),
        }
    }
}
