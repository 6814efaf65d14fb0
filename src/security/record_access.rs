//! Lock tree evaluation
//!
//! Two ways to apply a lock tree, which must agree on every record:
//! - direct: evaluate the tree against one record (write checks)
//! - as a filter: turn a read tree into a `QueryFilter` joined to the
//!   caller's own filter (queries and counts)
//!
//! Leaf rule, in order: all-access for the key type passes; a blank record
//! value defers to the effective null-value behavior; otherwise the record
//! value must equal one of the session's values for the key type. Inner
//! nodes fold their children with AND/OR. A node with no leaves below it
//! constrains nothing.

use super::errors::{SecurityError, SecurityResult};
use super::key_type::{SecurityKeyType, SecurityKeyTypeLookup};
use super::lock::{AccessMode, Lock, MultiRecordSecurityLock, RecordSecurityLock};
use super::lock_filters::RecordSecurityLockFilters;
use super::null_behavior::NullValueBehaviorResolver;
use super::session::Session;
use crate::filter::{BooleanOperator, FilterCriterion, QueryFilter};
use crate::record::Record;

/// Applies record security lock trees
pub struct RecordAccessEvaluator;

impl RecordAccessEvaluator {
    /// Whether `record` passes `tree` for the access mode.
    ///
    /// The tree is evaluated as given; project it with
    /// `RecordSecurityLockFilters` first if it mixes scopes.
    pub fn record_is_accessible<L: SecurityKeyTypeLookup + ?Sized>(
        tree: &MultiRecordSecurityLock,
        record: &Record,
        mode: AccessMode,
        lookup: &L,
        session: &Session,
    ) -> SecurityResult<bool> {
        Self::multi_allows(tree, record, mode, lookup, session)
    }

    /// Projects a table's lock list onto `mode` and rejects the record when
    /// the projection does not accept it
    pub fn check_record_access<L: SecurityKeyTypeLookup + ?Sized>(
        locks: &[Lock],
        record: &Record,
        mode: AccessMode,
        lookup: &L,
        session: &Session,
    ) -> SecurityResult<()> {
        let tree = RecordSecurityLockFilters::filter_for_mode(locks, mode);
        if Self::record_is_accessible(&tree, record, mode, lookup, session)? {
            Ok(())
        } else {
            Err(SecurityError::AccessDenied {
                table_name: record.table_name().to_string(),
                mode,
            })
        }
    }

    /// Converts a read lock tree into a filter that keeps exactly the
    /// records `record_is_accessible` would accept for reads.
    ///
    /// An unconstrained tree gives an empty filter.
    pub fn build_security_filter<L: SecurityKeyTypeLookup + ?Sized>(
        tree: &MultiRecordSecurityLock,
        lookup: &L,
        session: &Session,
    ) -> SecurityResult<QueryFilter> {
        Ok(Self::multi_filter(tree, lookup, session)?.unwrap_or_default())
    }

    fn multi_allows<L: SecurityKeyTypeLookup + ?Sized>(
        multi: &MultiRecordSecurityLock,
        record: &Record,
        mode: AccessMode,
        lookup: &L,
        session: &Session,
    ) -> SecurityResult<bool> {
        let mut result = multi.operator.identity();
        let mut constrained = false;

        for lock in multi.locks.iter().filter(|lock| lock.has_constraints()) {
            constrained = true;
            let allowed = match lock {
                Lock::Leaf(leaf) => Self::leaf_allows(leaf, record, mode, lookup, session)?,
                Lock::Multi(child) => Self::multi_allows(child, record, mode, lookup, session)?,
            };

            result = multi.operator.apply(result, allowed);
            if multi.operator.is_decided(result) {
                break;
            }
        }

        Ok(!constrained || result)
    }

    fn leaf_allows<L: SecurityKeyTypeLookup + ?Sized>(
        lock: &RecordSecurityLock,
        record: &Record,
        mode: AccessMode,
        lookup: &L,
        session: &Session,
    ) -> SecurityResult<bool> {
        let key_type = Self::key_type(lock, lookup)?;
        if session.has_all_access(key_type) {
            return Ok(true);
        }

        let value = record.value(&lock.field_name);
        if value.is_blank() {
            let behavior =
                NullValueBehaviorResolver::effective_null_value_behavior(lock, Some(key_type), session);
            return Ok(behavior.allows(mode));
        }

        Ok(session.has_security_key_value(&lock.security_key_type, value))
    }

    fn multi_filter<L: SecurityKeyTypeLookup + ?Sized>(
        multi: &MultiRecordSecurityLock,
        lookup: &L,
        session: &Session,
    ) -> SecurityResult<Option<QueryFilter>> {
        let mut filter = QueryFilter::new(multi.operator);
        let mut constrained = false;

        for lock in multi.locks.iter().filter(|lock| lock.has_constraints()) {
            constrained = true;
            let child = match lock {
                Lock::Leaf(leaf) => Self::leaf_filter(leaf, lookup, session)?,
                Lock::Multi(child) => Self::multi_filter(child, lookup, session)?,
            };

            match child {
                Some(child) => filter = filter.with_sub_filter(child),
                // an unconstrained child decides an OR outright
                None if multi.operator == BooleanOperator::Or => return Ok(None),
                None => {}
            }
        }

        if !constrained || filter.is_empty() {
            return Ok(None);
        }
        Ok(Some(filter))
    }

    fn leaf_filter<L: SecurityKeyTypeLookup + ?Sized>(
        lock: &RecordSecurityLock,
        lookup: &L,
        session: &Session,
    ) -> SecurityResult<Option<QueryFilter>> {
        let key_type = Self::key_type(lock, lookup)?;
        if session.has_all_access(key_type) {
            return Ok(None);
        }

        let mut filter = QueryFilter::or();
        for value in session.security_key_values(&lock.security_key_type) {
            // blank session values could only match blank records, which the
            // null-value behavior decides
            if !value.is_blank() {
                filter = filter.with_criteria(FilterCriterion::equals(&lock.field_name, value.clone()));
            }
        }

        let behavior = NullValueBehaviorResolver::effective_null_value_behavior(lock, Some(key_type), session);
        if behavior.allows(AccessMode::Read) {
            filter = filter.with_criteria(FilterCriterion::is_blank(&lock.field_name));
        }

        if filter.criteria.is_empty() {
            return Ok(Some(Self::contradiction(&lock.field_name)));
        }
        Ok(Some(filter))
    }

    /// A filter no record can match
    fn contradiction(field_name: &str) -> QueryFilter {
        QueryFilter::and()
            .with_criteria(FilterCriterion::is_blank(field_name))
            .with_criteria(FilterCriterion::is_not_blank(field_name))
    }

    fn key_type<'a, L: SecurityKeyTypeLookup + ?Sized>(
        lock: &RecordSecurityLock,
        lookup: &'a L,
    ) -> SecurityResult<&'a SecurityKeyType> {
        lookup
            .security_key_type(&lock.security_key_type)
            .ok_or_else(|| SecurityError::UnknownSecurityKeyType(lock.security_key_type.clone()))
    }
}
