//! Effective null-value behavior of a lock for a session

use super::key_type::SecurityKeyType;
use super::lock::{NullValueBehavior, RecordSecurityLock};
use super::session::Session;
use crate::observability::{log_event_with_fields, Event};

/// Resolves null-value behavior overrides
pub struct NullValueBehaviorResolver;

impl NullValueBehaviorResolver {
    /// Returns the null-value behavior to apply for `lock` in `session`.
    ///
    /// When the lock's key type names a null-value-behavior key and the
    /// session's first value for that key is a recognized behavior name, the
    /// session value wins over the lock's own setting. Otherwise the lock's
    /// configured behavior applies.
    pub fn effective_null_value_behavior(
        lock: &RecordSecurityLock,
        key_type: Option<&SecurityKeyType>,
        session: &Session,
    ) -> NullValueBehavior {
        let Some(key_name) = key_type.and_then(|kt| kt.null_value_behavior_key_name.as_deref()) else {
            return lock.null_value_behavior;
        };

        let Some(setting) = session.security_key_values(key_name).first() else {
            return lock.null_value_behavior;
        };

        let setting = setting.to_string();
        match NullValueBehavior::parse(&setting) {
            Some(behavior) => behavior,
            None => {
                log_event_with_fields(
                    Event::NullBehaviorOverrideIgnored,
                    &[
                        ("key_name", key_name),
                        ("lock_field", lock.field_name.as_str()),
                        ("value", setting.as_str()),
                    ],
                );
                lock.null_value_behavior
            }
        }
    }
}
