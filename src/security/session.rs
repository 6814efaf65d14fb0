//! Per-request security context
//!
//! A session carries the security key values presented by the caller. It is
//! passed explicitly to every security check; there is no ambient "current
//! session".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::key_type::SecurityKeyType;
use crate::filter::values_equal;
use crate::record::Value;

/// Security context of one caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Authenticated user, if any
    #[serde(default)]
    pub user_id: Option<String>,

    /// Key values per key type, in presentation order
    #[serde(default)]
    security_key_values: BTreeMap<String, Vec<Value>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create an anonymous session with no key values
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: None,
            security_key_values: BTreeMap::new(),
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Appends a key value, keeping presentation order
    pub fn with_security_key_value(mut self, key_name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_security_key_value(key_name, value);
        self
    }

    pub fn add_security_key_value(&mut self, key_name: impl Into<String>, value: impl Into<Value>) {
        self.security_key_values
            .entry(key_name.into())
            .or_default()
            .push(value.into());
    }

    /// Values for a key, in presentation order; empty when absent
    pub fn security_key_values(&self, key_name: &str) -> &[Value] {
        self.security_key_values
            .get(key_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether any value for the key equals `value` (number/string coercion applies)
    pub fn has_security_key_value(&self, key_name: &str, value: &Value) -> bool {
        self.security_key_values(key_name)
            .iter()
            .any(|presented| values_equal(value, presented))
    }

    /// Whether the session holds a truthy all-access value for the key type
    pub fn has_all_access(&self, key_type: &SecurityKeyType) -> bool {
        let Some(all_access_key_name) = &key_type.all_access_key_name else {
            return false;
        };

        self.security_key_values(all_access_key_name)
            .iter()
            .any(|value| match value {
                Value::Boolean(b) => *b,
                Value::String(s) => s.eq_ignore_ascii_case("true"),
                _ => false,
            })
    }
}
