//! Scope projections of lock trees
//!
//! A table's lock list may mix READ, WRITE and READ_AND_WRITE locks. Query
//! construction only wants the locks relevant to reads; write validation only
//! wants the ones relevant to writes. Projection rules:
//! - leaves failing the scope test are dropped outright
//! - nested branches are always kept in place, even when every child was
//!   dropped, so tree shape is preserved for downstream consumers
//! - the root is AND: every top-level lock is an independent constraint
//! - the input is never mutated

use super::lock::{AccessMode, Lock, MultiRecordSecurityLock, RecordSecurityLock};
use crate::filter::BooleanOperator;

/// Projects lock trees onto read or write scope
pub struct RecordSecurityLockFilters;

impl RecordSecurityLockFilters {
    /// The subset of a lock list that applies to reads.
    ///
    /// `None` in, `None` out; an empty list gives an empty AND node.
    pub fn filter_for_read_lock_tree(locks: Option<&[Lock]>) -> Option<MultiRecordSecurityLock> {
        locks.map(|locks| Self::project(locks, BooleanOperator::And, AccessMode::Read))
    }

    /// The subset of a lock list that applies to writes
    pub fn filter_for_write_lock_tree(locks: Option<&[Lock]>) -> Option<MultiRecordSecurityLock> {
        locks.map(|locks| Self::project(locks, BooleanOperator::And, AccessMode::Write))
    }

    /// Projection for an explicit access mode
    pub fn filter_for_mode(locks: &[Lock], mode: AccessMode) -> MultiRecordSecurityLock {
        Self::project(locks, BooleanOperator::And, mode)
    }

    /// Flat variant over leaf locks only: keeps READ and READ_AND_WRITE
    pub fn filter_for_read_locks(locks: &[RecordSecurityLock]) -> Vec<RecordSecurityLock> {
        locks
            .iter()
            .filter(|lock| lock.lock_scope.applies_to_read())
            .cloned()
            .collect()
    }

    /// Flat variant over leaf locks only: keeps WRITE and READ_AND_WRITE
    pub fn filter_for_write_locks(locks: &[RecordSecurityLock]) -> Vec<RecordSecurityLock> {
        locks
            .iter()
            .filter(|lock| lock.lock_scope.applies_to_write())
            .cloned()
            .collect()
    }

    fn project(locks: &[Lock], operator: BooleanOperator, mode: AccessMode) -> MultiRecordSecurityLock {
        let mut projected = MultiRecordSecurityLock::new(operator);

        for lock in locks {
            match lock {
                Lock::Multi(multi) => {
                    let child = Self::project(&multi.locks, multi.operator, mode);
                    projected.locks.push(Lock::Multi(child));
                }
                Lock::Leaf(leaf) if leaf.lock_scope.applies_to(mode) => {
                    projected.locks.push(Lock::Leaf(leaf.clone()));
                }
                Lock::Leaf(_) => {}
            }
        }

        projected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::LockScope;

    fn leaf(name: &str, scope: LockScope) -> RecordSecurityLock {
        RecordSecurityLock::new(name, name).with_lock_scope(scope)
    }

    #[test]
    fn test_none_in_none_out() {
        assert!(RecordSecurityLockFilters::filter_for_read_lock_tree(None).is_none());
        assert!(RecordSecurityLockFilters::filter_for_write_lock_tree(None).is_none());
    }

    #[test]
    fn test_empty_list_gives_empty_and() {
        let locks: Vec<Lock> = Vec::new();
        let tree = RecordSecurityLockFilters::filter_for_read_lock_tree(Some(locks.as_slice())).unwrap();
        assert_eq!(tree.operator, BooleanOperator::And);
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_all_write_locks_project_to_nothing() {
        let locks = vec![
            Lock::from(leaf("a", LockScope::Write)),
            Lock::from(leaf("b", LockScope::Write)),
        ];

        let tree = RecordSecurityLockFilters::filter_for_read_lock_tree(Some(locks.as_slice())).unwrap();
        assert_eq!(tree.operator, BooleanOperator::And);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_write_lock_dropped_read_and_write_kept() {
        let a = leaf("a", LockScope::ReadAndWrite);
        let locks = vec![Lock::from(a.clone()), Lock::from(leaf("b", LockScope::Write))];

        let tree = RecordSecurityLockFilters::filter_for_read_lock_tree(Some(locks.as_slice())).unwrap();
        assert_eq!(tree.locks, vec![Lock::from(a)]);
    }

    #[test]
    fn test_nested_branch_kept_when_emptied() {
        let locks = vec![
            Lock::from(leaf("a", LockScope::Read)),
            Lock::from(
                MultiRecordSecurityLock::or()
                    .with_lock(leaf("b", LockScope::Write))
                    .with_lock(leaf("c", LockScope::Write)),
            ),
            Lock::from(leaf("d", LockScope::Write)),
        ];

        let tree = RecordSecurityLockFilters::filter_for_read_lock_tree(Some(locks.as_slice())).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.locks[0], Lock::from(leaf("a", LockScope::Read)));
        assert_eq!(tree.locks[1], Lock::from(MultiRecordSecurityLock::or()));
    }

    #[test]
    fn test_nested_order_and_operator_preserved() {
        let locks = vec![Lock::from(
            MultiRecordSecurityLock::or()
                .with_lock(leaf("a", LockScope::ReadAndWrite))
                .with_lock(leaf("b", LockScope::Write))
                .with_lock(MultiRecordSecurityLock::and().with_lock(leaf("c", LockScope::Read))),
        )];

        let tree = RecordSecurityLockFilters::filter_for_read_lock_tree(Some(locks.as_slice())).unwrap();
        let expected = MultiRecordSecurityLock::and().with_lock(
            MultiRecordSecurityLock::or()
                .with_lock(leaf("a", LockScope::ReadAndWrite))
                .with_lock(MultiRecordSecurityLock::and().with_lock(leaf("c", LockScope::Read))),
        );
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_write_projection() {
        let locks = vec![
            Lock::from(leaf("a", LockScope::Read)),
            Lock::from(leaf("b", LockScope::Write)),
            Lock::from(leaf("c", LockScope::ReadAndWrite)),
        ];

        let tree = RecordSecurityLockFilters::filter_for_write_lock_tree(Some(locks.as_slice())).unwrap();
        let names: Vec<&str> = tree.leaves().iter().map(|l| l.field_name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_input_not_mutated() {
        let locks = vec![
            Lock::from(leaf("a", LockScope::Write)),
            Lock::from(MultiRecordSecurityLock::and().with_lock(leaf("b", LockScope::Write))),
        ];
        let before = locks.clone();

        let _ = RecordSecurityLockFilters::filter_for_read_lock_tree(Some(locks.as_slice()));
        assert_eq!(locks, before);
    }

    #[test]
    fn test_flat_filters() {
        let locks = vec![
            leaf("a", LockScope::Read),
            leaf("b", LockScope::Write),
            leaf("c", LockScope::ReadAndWrite),
        ];

        let read = RecordSecurityLockFilters::filter_for_read_locks(&locks);
        assert_eq!(read.len(), 2);
        assert_eq!(read[0].field_name, "a");
        assert_eq!(read[1].field_name, "c");

        let write = RecordSecurityLockFilters::filter_for_write_locks(&locks);
        assert_eq!(write.len(), 2);
        assert_eq!(write[0].field_name, "b");
    }
}
