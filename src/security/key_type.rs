//! Security key types
//!
//! A key type names a kind of security key (e.g. `clientId`). It may also
//! name two companion session keys:
//! - an all-access key: a truthy value bypasses every lock of this type
//! - a null-value-behavior key: overrides how locks of this type treat
//!   records whose locked field is null

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A registered security key type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityKeyType {
    pub name: String,
    #[serde(default)]
    pub all_access_key_name: Option<String>,
    #[serde(default)]
    pub null_value_behavior_key_name: Option<String>,
}

impl SecurityKeyType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            all_access_key_name: None,
            null_value_behavior_key_name: None,
        }
    }

    pub fn with_all_access_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.all_access_key_name = Some(key_name.into());
        self
    }

    pub fn with_null_value_behavior_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.null_value_behavior_key_name = Some(key_name.into());
        self
    }
}

/// Lookup of key types by name
pub trait SecurityKeyTypeLookup {
    fn security_key_type(&self, name: &str) -> Option<&SecurityKeyType>;
}

impl SecurityKeyTypeLookup for BTreeMap<String, SecurityKeyType> {
    fn security_key_type(&self, name: &str) -> Option<&SecurityKeyType> {
        self.get(name)
    }
}

impl SecurityKeyTypeLookup for [SecurityKeyType] {
    fn security_key_type(&self, name: &str) -> Option<&SecurityKeyType> {
        self.iter().find(|key_type| key_type.name == name)
    }
}

impl SecurityKeyTypeLookup for Vec<SecurityKeyType> {
    fn security_key_type(&self, name: &str) -> Option<&SecurityKeyType> {
        self.as_slice().security_key_type(name)
    }
}
