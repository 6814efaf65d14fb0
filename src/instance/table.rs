//! Table metadata

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::security::{
    FieldSecurityLock, Lock, MultiRecordSecurityLock, RecordSecurityLockFilters,
};

fn default_primary_key_field() -> String {
    "id".to_string()
}

/// One table: its key field and its security
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetaData {
    pub name: String,

    #[serde(default = "default_primary_key_field")]
    pub primary_key_field: String,

    /// Top-level locks; all must pass
    #[serde(default)]
    pub record_security_locks: Vec<Lock>,

    /// Field name to lock
    #[serde(default)]
    pub field_security_locks: BTreeMap<String, FieldSecurityLock>,
}

impl TableMetaData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key_field: default_primary_key_field(),
            record_security_locks: Vec::new(),
            field_security_locks: BTreeMap::new(),
        }
    }

    pub fn with_primary_key_field(mut self, field_name: impl Into<String>) -> Self {
        self.primary_key_field = field_name.into();
        self
    }

    pub fn with_record_security_lock(mut self, lock: impl Into<Lock>) -> Self {
        self.record_security_locks.push(lock.into());
        self
    }

    pub fn with_field_security_lock(mut self, field_name: impl Into<String>, lock: FieldSecurityLock) -> Self {
        self.field_security_locks.insert(field_name.into(), lock);
        self
    }

    /// Locks that constrain reads
    pub fn read_lock_tree(&self) -> MultiRecordSecurityLock {
        RecordSecurityLockFilters::filter_for_read_lock_tree(Some(self.record_security_locks.as_slice()))
            .unwrap_or_default()
    }

    /// Locks that constrain writes
    pub fn write_lock_tree(&self) -> MultiRecordSecurityLock {
        RecordSecurityLockFilters::filter_for_write_lock_tree(Some(self.record_security_locks.as_slice()))
            .unwrap_or_default()
    }
}
