//! CLI errors
//!
//! Error codes:
//! - QQQ_CLI_CONFIG_ERROR: configuration file missing or invalid
//! - QQQ_CLI_IO_ERROR: stdin/stdout failure or unparseable JSON
//! - QQQ_CLI_INVALID_REQUEST: request well-formed JSON but unusable
//! - backend and instance codes pass through

use std::io;
use thiserror::Error;

use crate::backend::BackendError;
use crate::instance::InstanceError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Instance(#[from] InstanceError),
}

impl CliError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        CliError::Config(msg.into())
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        CliError::Io(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        CliError::InvalidRequest(msg.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "QQQ_CLI_CONFIG_ERROR",
            CliError::Io(_) => "QQQ_CLI_IO_ERROR",
            CliError::InvalidRequest(_) => "QQQ_CLI_INVALID_REQUEST",
            CliError::Backend(err) => err.code(),
            CliError::Instance(err) => err.code(),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}
