//! Record security errors
//!
//! Error codes:
//! - QQQ_SECURITY_UNKNOWN_KEY_TYPE: lock names a key type that is not registered
//! - QQQ_SECURITY_INVALID_LOCK: lock definition is unusable (e.g. empty field name)
//! - QQQ_SECURITY_ACCESS_DENIED: record rejected by the lock tree

use thiserror::Error;

use super::lock::AccessMode;

/// Result type for security operations
pub type SecurityResult<T> = Result<T, SecurityError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    #[error("Unknown security key type: {0}")]
    UnknownSecurityKeyType(String),

    #[error("Invalid security lock: {0}")]
    InvalidLock(String),

    #[error("Session may not {} record in table {table_name}", .mode.as_str())]
    AccessDenied {
        table_name: String,
        mode: AccessMode,
    },
}

impl SecurityError {
    pub fn code(&self) -> &'static str {
        match self {
            SecurityError::UnknownSecurityKeyType(_) => "QQQ_SECURITY_UNKNOWN_KEY_TYPE",
            SecurityError::InvalidLock(_) => "QQQ_SECURITY_INVALID_LOCK",
            SecurityError::AccessDenied { .. } => "QQQ_SECURITY_ACCESS_DENIED",
        }
    }
}
