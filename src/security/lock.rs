//! Record security lock trees
//!
//! A lock tree is a boolean tree: leaves are `RecordSecurityLock`s keyed by a
//! security key type and a record field, inner nodes are
//! `MultiRecordSecurityLock`s joining their children with AND or OR. Trees
//! are owned values, so they are acyclic and finite by construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::filter::BooleanOperator;

/// Operations a lock applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockScope {
    Read,
    Write,
    #[default]
    ReadAndWrite,
}

impl LockScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockScope::Read => "READ",
            LockScope::Write => "WRITE",
            LockScope::ReadAndWrite => "READ_AND_WRITE",
        }
    }

    /// True for READ and READ_AND_WRITE
    pub fn applies_to_read(&self) -> bool {
        matches!(self, LockScope::Read | LockScope::ReadAndWrite)
    }

    /// True for WRITE and READ_AND_WRITE
    pub fn applies_to_write(&self) -> bool {
        matches!(self, LockScope::Write | LockScope::ReadAndWrite)
    }

    /// True when the lock constrains the given access mode
    pub fn applies_to(&self, mode: AccessMode) -> bool {
        match mode {
            AccessMode::Read => self.applies_to_read(),
            AccessMode::Write => self.applies_to_write(),
        }
    }
}

/// The kind of access being checked against a lock tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    Read,
    Write,
}

impl AccessMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMode::Read => "read",
            AccessMode::Write => "write",
        }
    }
}

/// What a lock does for a record whose locked field is null
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NullValueBehavior {
    /// Null-keyed records are visible and writable
    Allow,
    /// Null-keyed records may be written but not read
    AllowWriteOnly,
    /// Null-keyed records are neither visible nor writable
    #[default]
    Deny,
}

impl NullValueBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            NullValueBehavior::Allow => "ALLOW",
            NullValueBehavior::AllowWriteOnly => "ALLOW_WRITE_ONLY",
            NullValueBehavior::Deny => "DENY",
        }
    }

    /// Parses an exact enum name. Anything else is unrecognized.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "ALLOW" => Some(NullValueBehavior::Allow),
            "ALLOW_WRITE_ONLY" => Some(NullValueBehavior::AllowWriteOnly),
            "DENY" => Some(NullValueBehavior::Deny),
            _ => None,
        }
    }

    /// Whether a null-keyed record passes for the access mode
    pub fn allows(&self, mode: AccessMode) -> bool {
        match self {
            NullValueBehavior::Allow => true,
            NullValueBehavior::AllowWriteOnly => mode == AccessMode::Write,
            NullValueBehavior::Deny => false,
        }
    }
}

impl fmt::Display for NullValueBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Leaf lock: the record's `field_name` must hold one of the session's values
/// for `security_key_type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSecurityLock {
    pub security_key_type: String,
    pub field_name: String,
    #[serde(default)]
    pub lock_scope: LockScope,
    #[serde(default)]
    pub null_value_behavior: NullValueBehavior,
}

impl RecordSecurityLock {
    /// Create a READ_AND_WRITE, null-denying lock
    pub fn new(security_key_type: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            security_key_type: security_key_type.into(),
            field_name: field_name.into(),
            lock_scope: LockScope::default(),
            null_value_behavior: NullValueBehavior::default(),
        }
    }

    pub fn with_lock_scope(mut self, lock_scope: LockScope) -> Self {
        self.lock_scope = lock_scope;
        self
    }

    pub fn with_null_value_behavior(mut self, null_value_behavior: NullValueBehavior) -> Self {
        self.null_value_behavior = null_value_behavior;
        self
    }
}

/// Inner node joining child locks with one boolean operator
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiRecordSecurityLock {
    #[serde(default)]
    pub operator: BooleanOperator,
    pub locks: Vec<Lock>,
}

impl MultiRecordSecurityLock {
    pub fn new(operator: BooleanOperator) -> Self {
        Self {
            operator,
            locks: Vec::new(),
        }
    }

    pub fn and() -> Self {
        Self::new(BooleanOperator::And)
    }

    pub fn or() -> Self {
        Self::new(BooleanOperator::Or)
    }

    pub fn with_lock(mut self, lock: impl Into<Lock>) -> Self {
        self.locks.push(lock.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// All leaves of the tree, depth-first in declaration order
    pub fn leaves(&self) -> Vec<&RecordSecurityLock> {
        let mut leaves = Vec::new();
        for lock in &self.locks {
            lock.collect_leaves(&mut leaves);
        }
        leaves
    }

    /// True when at least one leaf exists somewhere below this node
    pub fn has_constraints(&self) -> bool {
        self.locks.iter().any(Lock::has_constraints)
    }
}

/// A node of a lock tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lock {
    Leaf(RecordSecurityLock),
    Multi(MultiRecordSecurityLock),
}

impl Lock {
    /// Leaves always constrain; inner nodes only if some leaf lies below
    pub fn has_constraints(&self) -> bool {
        match self {
            Lock::Leaf(_) => true,
            Lock::Multi(multi) => multi.has_constraints(),
        }
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a RecordSecurityLock>) {
        match self {
            Lock::Leaf(leaf) => leaves.push(leaf),
            Lock::Multi(multi) => {
                for lock in &multi.locks {
                    lock.collect_leaves(leaves);
                }
            }
        }
    }
}

impl From<RecordSecurityLock> for Lock {
    fn from(lock: RecordSecurityLock) -> Self {
        Lock::Leaf(lock)
    }
}

impl From<MultiRecordSecurityLock> for Lock {
    fn from(lock: MultiRecordSecurityLock) -> Self {
        Lock::Multi(lock)
    }
}
