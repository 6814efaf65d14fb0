//! Field-level security
//!
//! A field lock decides, per session, whether one field of a record may be
//! seen. The session's values for the lock's key type are consulted in the
//! order they were presented; the first value with an explicit mapping
//! decides. Without a mapping the lock's default applies.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::session::Session;
use crate::record::{Record, Value};

/// Visibility of a locked field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldSecurityBehavior {
    Allow,
    #[default]
    Deny,
}

/// Lock on one field, keyed by a security key type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSecurityLock {
    pub security_key_type: String,
    #[serde(default)]
    pub default_behavior: FieldSecurityBehavior,
    /// Key value (string form) to behavior
    #[serde(default)]
    pub key_value_behaviors: IndexMap<String, FieldSecurityBehavior>,
}

impl FieldSecurityLock {
    pub fn new(security_key_type: impl Into<String>, default_behavior: FieldSecurityBehavior) -> Self {
        Self {
            security_key_type: security_key_type.into(),
            default_behavior,
            key_value_behaviors: IndexMap::new(),
        }
    }

    pub fn with_key_value_behavior(
        mut self,
        key_value: impl Into<String>,
        behavior: FieldSecurityBehavior,
    ) -> Self {
        self.key_value_behaviors.insert(key_value.into(), behavior);
        self
    }

    /// Resolves the behavior for a session
    pub fn behavior_for_session(&self, session: &Session) -> FieldSecurityBehavior {
        session
            .security_key_values(&self.security_key_type)
            .iter()
            .find_map(|value| self.key_value_behaviors.get(&value.to_string()).copied())
            .unwrap_or(self.default_behavior)
    }
}

/// Clears every field of `record` whose lock denies the session.
///
/// Returns the names of the cleared fields, in field-name order.
pub fn apply_field_locks(
    field_locks: &BTreeMap<String, FieldSecurityLock>,
    record: &mut Record,
    session: &Session,
) -> Vec<String> {
    let mut redacted = Vec::new();

    for (field_name, lock) in field_locks {
        if lock.behavior_for_session(session) == FieldSecurityBehavior::Deny {
            record.set_value(field_name.clone(), Value::Null);
            redacted.push(field_name.clone());
        }
    }

    redacted
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_lock() -> FieldSecurityLock {
        FieldSecurityLock::new("storeId", FieldSecurityBehavior::Deny)
            .with_key_value_behavior("bar", FieldSecurityBehavior::Allow)
            .with_key_value_behavior("boo", FieldSecurityBehavior::Deny)
    }

    #[test]
    fn test_no_key_uses_default() {
        assert_eq!(
            store_lock().behavior_for_session(&Session::new()),
            FieldSecurityBehavior::Deny
        );
    }

    #[test]
    fn test_mapped_value_wins() {
        let session = Session::new().with_security_key_value("storeId", "bar");
        assert_eq!(store_lock().behavior_for_session(&session), FieldSecurityBehavior::Allow);
    }

    #[test]
    fn test_first_presented_value_wins() {
        let session = Session::new()
            .with_security_key_value("storeId", "bar")
            .with_security_key_value("storeId", "boo");
        assert_eq!(store_lock().behavior_for_session(&session), FieldSecurityBehavior::Allow);

        let session = Session::new()
            .with_security_key_value("storeId", "boo")
            .with_security_key_value("storeId", "bar");
        assert_eq!(store_lock().behavior_for_session(&session), FieldSecurityBehavior::Deny);
    }

    #[test]
    fn test_unmapped_values_skipped() {
        let session = Session::new()
            .with_security_key_value("storeId", "zzz")
            .with_security_key_value("storeId", "bar");
        assert_eq!(store_lock().behavior_for_session(&session), FieldSecurityBehavior::Allow);
    }

    #[test]
    fn test_numeric_values_match_string_form() {
        let lock = FieldSecurityLock::new("clientId", FieldSecurityBehavior::Deny)
            .with_key_value_behavior("47", FieldSecurityBehavior::Allow);
        let session = Session::new().with_security_key_value("clientId", 47);
        assert_eq!(lock.behavior_for_session(&session), FieldSecurityBehavior::Allow);
    }

    #[test]
    fn test_apply_field_locks() {
        let mut locks = BTreeMap::new();
        locks.insert("salary".to_string(), store_lock());
        locks.insert(
            "nickname".to_string(),
            FieldSecurityLock::new("storeId", FieldSecurityBehavior::Allow),
        );

        let mut record = Record::new("person")
            .with_value("salary", 100)
            .with_value("nickname", "Bo");

        let redacted = apply_field_locks(&locks, &mut record, &Session::new());
        assert_eq!(redacted, vec!["salary".to_string()]);
        assert!(record.value("salary").is_null());
        assert_eq!(record.value("nickname"), &Value::from("Bo"));
    }

    #[test]
    fn test_deserialize_keeps_map_order() {
        let lock: FieldSecurityLock = serde_json::from_value(json!({
            "securityKeyType": "storeId",
            "defaultBehavior": "ALLOW",
            "keyValueBehaviors": {"zeta": "DENY", "alpha": "ALLOW"}
        }))
        .unwrap();

        assert_eq!(lock.default_behavior, FieldSecurityBehavior::Allow);
        let keys: Vec<&str> = lock.key_value_behaviors.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
