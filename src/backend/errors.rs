//! Backend errors
//!
//! Error codes:
//! - QQQ_BACKEND_STORE_POISONED: a writer panicked while holding the store
//! - QQQ_BACKEND_RECORD_NOT_FOUND: update of a primary key that does not exist
//! - QQQ_BACKEND_DUPLICATE_RECORD: insert of a primary key that exists
//! - QQQ_BACKEND_INVALID_RECORD: record unusable for the operation
//! - QQQ_BACKEND_INVALID_CONFIG: configuration rejected
//! - filter, security and instance codes pass through

use thiserror::Error;

use crate::filter::FilterError;
use crate::instance::InstanceError;
use crate::security::SecurityError;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error(transparent)]
    Instance(#[from] InstanceError),

    #[error("Record store poisoned: {0}")]
    StorePoisoned(String),

    #[error("No record in table {table_name} with primary key {primary_key}")]
    RecordNotFound { table_name: String, primary_key: String },

    #[error("Table {table_name} already has a record with primary key {primary_key}")]
    DuplicateRecord { table_name: String, primary_key: String },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid backend configuration: {0}")]
    InvalidConfig(String),
}

impl BackendError {
    pub fn code(&self) -> &'static str {
        match self {
            BackendError::Filter(err) => err.code(),
            BackendError::Security(err) => err.code(),
            BackendError::Instance(err) => err.code(),
            BackendError::StorePoisoned(_) => "QQQ_BACKEND_STORE_POISONED",
            BackendError::RecordNotFound { .. } => "QQQ_BACKEND_RECORD_NOT_FOUND",
            BackendError::DuplicateRecord { .. } => "QQQ_BACKEND_DUPLICATE_RECORD",
            BackendError::InvalidRecord(_) => "QQQ_BACKEND_INVALID_RECORD",
            BackendError::InvalidConfig(_) => "QQQ_BACKEND_INVALID_CONFIG",
        }
    }
}
