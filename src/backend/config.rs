//! Backend configuration
//!
//! Loaded from the `backend` object of the CLI config file, or built in
//! code. Every field is optional in JSON.

use serde::{Deserialize, Serialize};

use super::errors::{BackendError, BackendResult};
use crate::observability::Severity;

fn default_log_queries() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Upper bound on records returned by one query; None means unbounded
    #[serde(default)]
    pub max_query_limit: Option<i64>,

    /// Log one event per query and count
    #[serde(default = "default_log_queries")]
    pub log_queries: bool,

    /// Lines below this severity are dropped
    #[serde(default)]
    pub min_log_severity: Severity,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            max_query_limit: None,
            log_queries: default_log_queries(),
            min_log_severity: Severity::default(),
        }
    }
}

impl BackendConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_query_limit(mut self, limit: i64) -> Self {
        self.max_query_limit = Some(limit);
        self
    }

    pub fn with_log_queries(mut self, log_queries: bool) -> Self {
        self.log_queries = log_queries;
        self
    }

    pub fn with_min_log_severity(mut self, severity: Severity) -> Self {
        self.min_log_severity = severity;
        self
    }

    pub fn validate(&self) -> BackendResult<()> {
        match self.max_query_limit {
            Some(limit) if limit < 0 => Err(BackendError::InvalidConfig(format!(
                "max_query_limit must not be negative, got {}",
                limit
            ))),
            _ => Ok(()),
        }
    }

    /// The limit to apply for a requested one.
    ///
    /// A missing or negative request means "no limit" and becomes the
    /// configured maximum.
    pub fn effective_limit(&self, requested: Option<i64>) -> Option<i64> {
        let requested = requested.filter(|limit| *limit >= 0);
        match (requested, self.max_query_limit) {
            (Some(requested), Some(max)) => Some(requested.min(max)),
            (Some(requested), None) => Some(requested),
            (None, max) => max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config: BackendConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, BackendConfig::default());
        assert!(config.log_queries);
        assert_eq!(config.min_log_severity, Severity::Info);
    }

    #[test]
    fn test_deserialize() {
        let config: BackendConfig = serde_json::from_value(json!({
            "max_query_limit": 100,
            "log_queries": false,
            "min_log_severity": "WARN"
        }))
        .unwrap();

        assert_eq!(config.max_query_limit, Some(100));
        assert!(!config.log_queries);
        assert_eq!(config.min_log_severity, Severity::Warn);
    }

    #[test]
    fn test_effective_limit() {
        let unbounded = BackendConfig::new();
        assert_eq!(unbounded.effective_limit(None), None);
        assert_eq!(unbounded.effective_limit(Some(5)), Some(5));

        let bounded = BackendConfig::new().with_max_query_limit(10);
        assert_eq!(bounded.effective_limit(None), Some(10));
        assert_eq!(bounded.effective_limit(Some(-1)), Some(10));
        assert_eq!(bounded.effective_limit(Some(5)), Some(5));
        assert_eq!(bounded.effective_limit(Some(50)), Some(10));
    }

    #[test]
    fn test_negative_max_rejected() {
        let config = BackendConfig::new().with_max_query_limit(-1);
        assert_eq!(config.validate().unwrap_err().code(), "QQQ_BACKEND_INVALID_CONFIG");
    }
}
