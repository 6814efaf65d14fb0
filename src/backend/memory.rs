//! In-memory record backend
//!
//! Records live in per-table vectors behind one `RwLock`, in insertion
//! order. Every operation takes the caller's session:
//! - query: read security filter AND caller filter, then sort, page and
//!   clear field-locked values
//! - count: read security filter AND caller filter, no paging
//! - insert / update: every record must pass the write lock tree, or
//!   nothing is written
//! - delete: only records the session could write are removed
//!
//! Filtering runs on a snapshot taken under the read lock, so long
//! evaluations never block writers.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::config::BackendConfig;
use super::errors::{BackendError, BackendResult};
use super::request::{QueryInput, QueryOutput};
use crate::filter::{apply_filter, strict_equals, FilterMatcher, QueryFilter};
use crate::instance::{Instance, TableMetaData};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::record::{Record, Value};
use crate::security::{apply_field_locks, AccessMode, RecordAccessEvaluator, SecurityError, Session};

#[derive(Debug)]
struct TableStore {
    records: Vec<Record>,
    next_id: i64,
}

impl Default for TableStore {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }
}

impl TableStore {
    fn position(&self, primary_key_field: &str, primary_key: &Value) -> Option<usize> {
        self.records
            .iter()
            .position(|record| strict_equals(record.value(primary_key_field), primary_key))
    }

    /// Keys a batch of new records against the stored ones.
    ///
    /// Missing keys are drawn from the sequence; explicit integer keys push
    /// the sequence past them. A key already stored, or repeated within the
    /// batch, fails the whole batch. Nothing changes until `commit`.
    fn stage(&self, table: &TableMetaData, records: Vec<Record>) -> BackendResult<StagedInsert> {
        let primary_key_field = table.primary_key_field.as_str();
        let mut next_id = self.next_id;
        let mut staged: Vec<Record> = Vec::with_capacity(records.len());

        for mut record in records {
            match record.value(primary_key_field).clone() {
                Value::Null => {
                    let id = next_id;
                    next_id = id.checked_add(1).ok_or_else(|| {
                        BackendError::InvalidRecord(format!("primary key sequence of table {} is exhausted", table.name))
                    })?;
                    record.set_value(primary_key_field, id);
                }
                Value::Integer(id) if id >= next_id => {
                    // i64::MAX can be stored but leaves the sequence where it is
                    if let Some(next) = id.checked_add(1) {
                        next_id = next;
                    }
                }
                _ => {}
            }

            let primary_key = record.value(primary_key_field);
            let repeated = staged
                .iter()
                .any(|other| strict_equals(other.value(primary_key_field), primary_key));
            if repeated || self.position(primary_key_field, primary_key).is_some() {
                return Err(BackendError::DuplicateRecord {
                    table_name: table.name.clone(),
                    primary_key: primary_key.to_string(),
                });
            }
            staged.push(record);
        }

        Ok(StagedInsert {
            records: staged,
            next_id,
        })
    }

    fn commit(&mut self, staged: StagedInsert) -> Vec<Record> {
        self.next_id = staged.next_id;
        self.records.extend(staged.records.iter().cloned());
        staged.records
    }
}

/// Keyed records waiting to be appended to a table
struct StagedInsert {
    records: Vec<Record>,
    next_id: i64,
}

/// Record backend holding everything in memory
pub struct MemoryBackend {
    instance: Instance,
    config: BackendConfig,
    store: RwLock<BTreeMap<String, TableStore>>,
    metrics: MetricsRegistry,
}

impl MemoryBackend {
    /// Creates an empty backend over a validated instance
    pub fn new(instance: Instance, config: BackendConfig) -> BackendResult<Self> {
        config.validate()?;
        instance.validate()?;

        Ok(Self {
            instance,
            config,
            store: RwLock::new(BTreeMap::new()),
            metrics: MetricsRegistry::new(),
        })
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Bulk-loads trusted records with no security checks, assigning
    /// primary keys where missing. Used when booting from data files.
    pub fn seed(&self, table_name: &str, records: Vec<Record>) -> BackendResult<usize> {
        let table = self.instance.table(table_name)?;
        for record in &records {
            self.check_record_table(table, record)?;
        }

        let mut store = self.write_store()?;
        let table_store = store.entry(table.name.clone()).or_default();
        let staged = table_store.stage(table, records)?;
        Ok(table_store.commit(staged).len())
    }

    /// Runs a query and returns the visible page of records
    pub fn query(&self, input: &QueryInput, session: &Session) -> BackendResult<QueryOutput> {
        let result = self.run_query(input, session);
        match &result {
            Ok(output) => {
                self.metrics.increment_queries_executed();
                self.metrics.add_records_scanned(output.scanned_count as u64);
                self.metrics.add_records_returned(output.records.len() as u64);
                self.metrics.add_fields_redacted(output.redacted_field_count as u64);
                if self.config.log_queries {
                    let returned = output.records.len().to_string();
                    let scanned = output.scanned_count.to_string();
                    log_event_with_fields(
                        Event::QueryExecuted,
                        &[
                            ("returned", returned.as_str()),
                            ("scanned", scanned.as_str()),
                            ("table", input.table_name.as_str()),
                        ],
                    );
                }
            }
            Err(err) => self.record_failure(&input.table_name, err),
        }
        result
    }

    /// Counts the records visible to the session that match the filter.
    ///
    /// Ordering, skip and limit on the filter are ignored.
    pub fn count(&self, input: &QueryInput, session: &Session) -> BackendResult<usize> {
        let result = self.run_count(input, session);
        match &result {
            Ok(count) => {
                self.metrics.increment_counts_executed();
                if self.config.log_queries {
                    let count = count.to_string();
                    log_event_with_fields(
                        Event::CountExecuted,
                        &[("count", count.as_str()), ("table", input.table_name.as_str())],
                    );
                }
            }
            Err(err) => self.record_failure(&input.table_name, err),
        }
        result
    }

    /// Inserts records, assigning primary keys where missing.
    ///
    /// Returns the stored records. Fails without writing anything when any
    /// record is rejected or a primary key is taken.
    pub fn insert(&self, table_name: &str, records: Vec<Record>, session: &Session) -> BackendResult<Vec<Record>> {
        let table = self.instance.table(table_name)?;
        let mut store = self.write_store()?;
        let table_store = store.entry(table.name.clone()).or_default();

        for record in &records {
            self.check_record_table(table, record)?;
            self.check_write(table, record, session)?;
        }
        let staged = table_store.stage(table, records)?;
        let inserted = table_store.commit(staged);

        self.metrics.add_records_written(inserted.len() as u64);
        let count = inserted.len().to_string();
        log_event_with_fields(
            Event::RecordsInserted,
            &[("count", count.as_str()), ("table", table.name.as_str())],
        );

        Ok(inserted)
    }

    /// Merges each record onto the stored record with the same primary key.
    ///
    /// A key repeated within the batch merges onto the earlier result, and
    /// the returned list holds one record per key. The session must be able
    /// to write both the record being merged onto and the merged result.
    /// Fails without writing anything when any record is rejected.
    pub fn update(&self, table_name: &str, records: Vec<Record>, session: &Session) -> BackendResult<Vec<Record>> {
        let table = self.instance.table(table_name)?;
        let mut store = self.write_store()?;
        let table_store = store.entry(table.name.clone()).or_default();

        let mut merged_records = Vec::with_capacity(records.len());
        for record in &records {
            self.check_record_table(table, record)?;

            let primary_key = record.value(&table.primary_key_field);
            if primary_key.is_null() {
                return Err(BackendError::InvalidRecord(format!(
                    "update on table {} is missing primary key field {}",
                    table.name, table.primary_key_field
                )));
            }

            let position = table_store
                .position(&table.primary_key_field, primary_key)
                .ok_or_else(|| BackendError::RecordNotFound {
                    table_name: table.name.clone(),
                    primary_key: primary_key.to_string(),
                })?;

            let pending = merged_records.iter().position(|(staged, _)| *staged == position);
            let existing = match pending {
                Some(index) => &merged_records[index].1,
                None => &table_store.records[position],
            };
            self.check_write(table, existing, session)?;

            let mut merged = existing.clone();
            merged.merge_from(record);
            self.check_write(table, &merged, session)?;

            match pending {
                Some(index) => merged_records[index].1 = merged,
                None => merged_records.push((position, merged)),
            }
        }

        let mut updated = Vec::with_capacity(merged_records.len());
        for (position, merged) in merged_records {
            table_store.records[position] = merged.clone();
            updated.push(merged);
        }

        self.metrics.add_records_written(updated.len() as u64);
        let count = updated.len().to_string();
        log_event_with_fields(
            Event::RecordsUpdated,
            &[("count", count.as_str()), ("table", table.name.as_str())],
        );

        Ok(updated)
    }

    /// Deletes records by primary key.
    ///
    /// Keys with no record, and records the session may not write, are
    /// skipped. Returns the number of records removed.
    pub fn delete(&self, table_name: &str, primary_keys: &[Value], session: &Session) -> BackendResult<usize> {
        let table = self.instance.table(table_name)?;
        let write_tree = table.write_lock_tree();
        let mut store = self.write_store()?;
        let Some(table_store) = store.get_mut(&table.name) else {
            return Ok(0);
        };

        let mut doomed = Vec::with_capacity(table_store.records.len());
        for record in &table_store.records {
            let requested = primary_keys
                .iter()
                .any(|key| strict_equals(record.value(&table.primary_key_field), key));

            let writable = requested
                && RecordAccessEvaluator::record_is_accessible(
                    &write_tree,
                    record,
                    AccessMode::Write,
                    &self.instance,
                    session,
                )?;
            doomed.push(writable);
        }

        let deleted = doomed.iter().filter(|doomed| **doomed).count();
        let mut flags = doomed.into_iter();
        table_store
            .records
            .retain(|_| !flags.next().unwrap_or(false));

        self.metrics.add_records_deleted(deleted as u64);
        let count = deleted.to_string();
        log_event_with_fields(
            Event::RecordsDeleted,
            &[("count", count.as_str()), ("table", table.name.as_str())],
        );

        Ok(deleted)
    }

    fn run_query(&self, input: &QueryInput, session: &Session) -> BackendResult<QueryOutput> {
        let table = self.instance.table(&input.table_name)?;
        let records = self.snapshot(&table.name)?;
        let scanned_count = records.len();

        let mut filter = self.secured_filter(table, &input.filter, session)?;
        filter.order_bys = input.filter.order_bys.clone();
        filter.skip = input.filter.skip;
        filter.limit = self.config.effective_limit(input.filter.limit);

        let mut records = apply_filter(&filter, records)?;

        let mut redacted_field_count = 0;
        if !table.field_security_locks.is_empty() {
            for record in &mut records {
                redacted_field_count += apply_field_locks(&table.field_security_locks, record, session).len();
            }
        }
        if redacted_field_count > 0 {
            let redacted = redacted_field_count.to_string();
            log_event_with_fields(
                Event::FieldsRedacted,
                &[("redacted", redacted.as_str()), ("table", table.name.as_str())],
            );
        }

        Ok(QueryOutput {
            records,
            scanned_count,
            redacted_field_count,
        })
    }

    fn run_count(&self, input: &QueryInput, session: &Session) -> BackendResult<usize> {
        let table = self.instance.table(&input.table_name)?;
        let records = self.snapshot(&table.name)?;
        let filter = self.secured_filter(table, &input.filter, session)?;
        Ok(FilterMatcher::filter_records(&filter, records)?.len())
    }

    /// Caller filter ANDed with the table's read security filter, unpaged
    fn secured_filter(&self, table: &TableMetaData, filter: &QueryFilter, session: &Session) -> BackendResult<QueryFilter> {
        let security_filter =
            RecordAccessEvaluator::build_security_filter(&table.read_lock_tree(), &self.instance, session)?;

        Ok(QueryFilter::and()
            .with_sub_filter(security_filter)
            .with_sub_filter(filter.without_paging()))
    }

    fn check_record_table(&self, table: &TableMetaData, record: &Record) -> BackendResult<()> {
        if record.table_name() != table.name {
            return Err(BackendError::InvalidRecord(format!(
                "record for table {} written to table {}",
                record.table_name(),
                table.name
            )));
        }
        Ok(())
    }

    fn check_write(&self, table: &TableMetaData, record: &Record, session: &Session) -> BackendResult<()> {
        match RecordAccessEvaluator::check_record_access(
            &table.record_security_locks,
            record,
            AccessMode::Write,
            &self.instance,
            session,
        ) {
            Ok(()) => Ok(()),
            Err(err @ SecurityError::AccessDenied { .. }) => {
                self.metrics.increment_write_denials();
                let primary_key = record.value(&table.primary_key_field).to_string();
                let user = session.user_id.as_deref().unwrap_or("");
                log_event_with_fields(
                    Event::RecordWriteDenied,
                    &[
                        ("primary_key", primary_key.as_str()),
                        ("table", table.name.as_str()),
                        ("user_id", user),
                    ],
                );
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn record_failure(&self, table_name: &str, err: &BackendError) {
        self.metrics.increment_queries_failed();
        let message = err.to_string();
        log_event_with_fields(
            Event::QueryFailed,
            &[
                ("code", err.code()),
                ("error", message.as_str()),
                ("table", table_name),
            ],
        );
    }

    fn snapshot(&self, table_name: &str) -> BackendResult<Vec<Record>> {
        Ok(self
            .read_store()?
            .get(table_name)
            .map(|table_store| table_store.records.clone())
            .unwrap_or_default())
    }

    fn read_store(&self) -> BackendResult<RwLockReadGuard<'_, BTreeMap<String, TableStore>>> {
        self.store
            .read()
            .map_err(|e| BackendError::StorePoisoned(e.to_string()))
    }

    fn write_store(&self) -> BackendResult<RwLockWriteGuard<'_, BTreeMap<String, TableStore>>> {
        self.store
            .write()
            .map_err(|e| BackendError::StorePoisoned(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterCriterion, OrderBy};
    use crate::security::{
        FieldSecurityBehavior, FieldSecurityLock, LockScope, RecordSecurityLock, SecurityKeyType,
    };

    fn backend() -> MemoryBackend {
        let instance = Instance::new()
            .with_security_key_type(SecurityKeyType::new("clientId").with_all_access_key_name("clientIdAllAccess"))
            .with_table(
                TableMetaData::new("order")
                    .with_record_security_lock(RecordSecurityLock::new("clientId", "clientId"))
                    .with_field_security_lock(
                        "total",
                        FieldSecurityLock::new("clientId", FieldSecurityBehavior::Allow)
                            .with_key_value_behavior("2", FieldSecurityBehavior::Deny),
                    ),
            )
            .unwrap()
            .with_table(TableMetaData::new("note"))
            .unwrap();

        MemoryBackend::new(instance, BackendConfig::new().with_log_queries(false)).unwrap()
    }

    fn admin() -> Session {
        Session::new().with_security_key_value("clientIdAllAccess", true)
    }

    fn client(id: i64) -> Session {
        Session::new().with_security_key_value("clientId", id)
    }

    fn order(client_id: i64, total: i64) -> Record {
        Record::new("order")
            .with_value("clientId", client_id)
            .with_value("total", total)
    }

    fn seed(backend: &MemoryBackend) {
        backend
            .insert(
                "order",
                vec![order(1, 100), order(2, 200), order(1, 300), order(3, 400)],
                &admin(),
            )
            .unwrap();
    }

    #[test]
    fn test_insert_assigns_primary_keys() {
        let backend = backend();
        let inserted = backend
            .insert("note", vec![Record::new("note"), Record::new("note").with_value("id", 10), Record::new("note")], &Session::new())
            .unwrap();

        let ids: Vec<&Value> = inserted.iter().map(|r| r.value("id")).collect();
        assert_eq!(ids, vec![&Value::Integer(1), &Value::Integer(10), &Value::Integer(11)]);
    }

    #[test]
    fn test_insert_duplicate_key_rejected() {
        let backend = backend();
        backend
            .insert("note", vec![Record::new("note").with_value("id", 1)], &Session::new())
            .unwrap();
        let err = backend
            .insert("note", vec![Record::new("note").with_value("id", 1)], &Session::new())
            .unwrap_err();
        assert_eq!(err.code(), "QQQ_BACKEND_DUPLICATE_RECORD");
    }

    #[test]
    fn test_max_primary_key_does_not_poison_store() {
        let backend = backend();
        let inserted = backend
            .insert("note", vec![Record::new("note").with_value("id", i64::MAX)], &Session::new())
            .unwrap();
        assert_eq!(inserted[0].value("id"), &Value::Integer(i64::MAX));

        let next = backend.insert("note", vec![Record::new("note")], &Session::new()).unwrap();
        assert_eq!(next[0].value("id"), &Value::Integer(1));
        assert_eq!(backend.count(&QueryInput::new("note"), &Session::new()).unwrap(), 2);

        backend
            .seed("note", vec![Record::new("note").with_value("id", i64::MAX - 1)])
            .unwrap();
        assert_eq!(backend.count(&QueryInput::new("note"), &Session::new()).unwrap(), 3);
    }

    #[test]
    fn test_exhausted_key_sequence_rejected() {
        let backend = backend();
        backend
            .insert("note", vec![Record::new("note").with_value("id", i64::MAX - 1)], &Session::new())
            .unwrap();

        let err = backend.insert("note", vec![Record::new("note")], &Session::new()).unwrap_err();
        assert_eq!(err.code(), "QQQ_BACKEND_INVALID_RECORD");
        assert_eq!(backend.count(&QueryInput::new("note"), &Session::new()).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_keys_within_batch_rejected() {
        let backend = backend();
        let err = backend
            .insert(
                "note",
                vec![Record::new("note").with_value("id", 3), Record::new("note").with_value("id", 3)],
                &Session::new(),
            )
            .unwrap_err();
        assert_eq!(err.code(), "QQQ_BACKEND_DUPLICATE_RECORD");

        // the first record is keyed 1 from the sequence
        let err = backend
            .insert("note", vec![Record::new("note"), Record::new("note").with_value("id", 1)], &Session::new())
            .unwrap_err();
        assert_eq!(err.code(), "QQQ_BACKEND_DUPLICATE_RECORD");
        assert_eq!(backend.count(&QueryInput::new("note"), &Session::new()).unwrap(), 0);

        let inserted = backend
            .insert("note", vec![Record::new("note").with_value("id", 5), Record::new("note")], &Session::new())
            .unwrap();
        let ids: Vec<&Value> = inserted.iter().map(|r| r.value("id")).collect();
        assert_eq!(ids, vec![&Value::Integer(5), &Value::Integer(6)]);
    }

    #[test]
    fn test_update_repeated_key_merges_in_order() {
        let backend = backend();
        seed(&backend);

        let updated = backend
            .update(
                "order",
                vec![
                    Record::new("order").with_value("id", 1).with_value("total", 111),
                    Record::new("order").with_value("id", 1).with_value("note", "rush"),
                ],
                &client(1),
            )
            .unwrap();
        assert_eq!(updated.len(), 1);

        let stored = backend.query(&QueryInput::new("order"), &client(1)).unwrap();
        let first = stored.records.iter().find(|r| r.value("id") == &Value::Integer(1)).unwrap();
        assert_eq!(first.value("total"), &Value::Integer(111));
        assert_eq!(first.value("note"), &Value::from("rush"));
    }

    #[test]
    fn test_query_applies_read_security() {
        let backend = backend();
        seed(&backend);

        let output = backend.query(&QueryInput::new("order"), &client(1)).unwrap();
        assert_eq!(output.scanned_count, 4);
        assert_eq!(output.len(), 2);
        assert!(output.records.iter().all(|r| r.value("clientId") == &Value::Integer(1)));

        assert_eq!(backend.query(&QueryInput::new("order"), &Session::new()).unwrap().len(), 0);
        assert_eq!(backend.query(&QueryInput::new("order"), &admin()).unwrap().len(), 4);
    }

    #[test]
    fn test_query_with_filter_sort_and_page() {
        let backend = backend();
        seed(&backend);

        let filter = QueryFilter::and()
            .with_criteria(FilterCriterion::greater_than("total", 100))
            .with_order_by(OrderBy::desc("total"))
            .with_limit(2);
        let output = backend
            .query(&QueryInput::new("order").with_filter(filter), &admin())
            .unwrap();

        let totals: Vec<&Value> = output.records.iter().map(|r| r.value("total")).collect();
        assert_eq!(totals, vec![&Value::Integer(400), &Value::Integer(300)]);
    }

    #[test]
    fn test_max_query_limit_clamps() {
        let instance = backend().instance().clone();
        let backend = MemoryBackend::new(instance, BackendConfig::new().with_max_query_limit(1).with_log_queries(false)).unwrap();
        seed(&backend);

        let filter = QueryFilter::and().with_limit(3);
        let output = backend.query(&QueryInput::new("order").with_filter(filter), &admin()).unwrap();
        assert_eq!(output.len(), 1);
    }

    #[test]
    fn test_field_locks_redact() {
        let backend = backend();
        seed(&backend);

        let output = backend.query(&QueryInput::new("order"), &client(2)).unwrap();
        assert_eq!(output.len(), 1);
        assert!(output.records[0].value("total").is_null());
        assert_eq!(output.redacted_field_count, 1);

        let output = backend.query(&QueryInput::new("order"), &client(1)).unwrap();
        assert!(output.records.iter().all(|r| !r.value("total").is_null()));
    }

    #[test]
    fn test_count_ignores_paging() {
        let backend = backend();
        seed(&backend);

        let input = QueryInput::new("order").with_filter(QueryFilter::and().with_limit(1).with_skip(1));
        assert_eq!(backend.count(&input, &client(1)).unwrap(), 2);
        assert_eq!(backend.count(&input, &admin()).unwrap(), 4);
    }

    #[test]
    fn test_insert_denied_writes_nothing() {
        let backend = backend();
        let err = backend
            .insert("order", vec![order(1, 10), order(2, 20)], &client(1))
            .unwrap_err();

        assert_eq!(err.code(), "QQQ_SECURITY_ACCESS_DENIED");
        assert_eq!(backend.count(&QueryInput::new("order"), &admin()).unwrap(), 0);
        assert_eq!(backend.metrics().snapshot().write_denials, 1);
    }

    #[test]
    fn test_update_checks_old_and_new_values() {
        let backend = backend();
        seed(&backend);

        // record 2 belongs to client 2
        let err = backend
            .update("order", vec![Record::new("order").with_value("id", 2).with_value("total", 1)], &client(1))
            .unwrap_err();
        assert_eq!(err.code(), "QQQ_SECURITY_ACCESS_DENIED");

        // moving own record to another client is rejected
        let err = backend
            .update("order", vec![Record::new("order").with_value("id", 1).with_value("clientId", 2)], &client(1))
            .unwrap_err();
        assert_eq!(err.code(), "QQQ_SECURITY_ACCESS_DENIED");

        let updated = backend
            .update("order", vec![Record::new("order").with_value("id", 1).with_value("total", 150)], &client(1))
            .unwrap();
        assert_eq!(updated[0].value("total"), &Value::Integer(150));
        assert_eq!(updated[0].value("clientId"), &Value::Integer(1));
    }

    #[test]
    fn test_update_missing_record() {
        let backend = backend();
        let err = backend
            .update("note", vec![Record::new("note").with_value("id", 99)], &Session::new())
            .unwrap_err();
        assert_eq!(err.code(), "QQQ_BACKEND_RECORD_NOT_FOUND");
    }

    #[test]
    fn test_delete_only_writable_records() {
        let backend = backend();
        seed(&backend);

        let deleted = backend
            .delete("order", &[Value::Integer(1), Value::Integer(2), Value::Integer(42)], &client(1))
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(backend.count(&QueryInput::new("order"), &admin()).unwrap(), 3);
    }

    #[test]
    fn test_write_scope_lock_does_not_hide_reads() {
        let instance = Instance::new()
            .with_security_key_type(SecurityKeyType::new("clientId"))
            .with_table(
                TableMetaData::new("order").with_record_security_lock(
                    RecordSecurityLock::new("clientId", "clientId").with_lock_scope(LockScope::Write),
                ),
            )
            .unwrap();
        let backend = MemoryBackend::new(instance, BackendConfig::new().with_log_queries(false)).unwrap();
        backend.insert("order", vec![order(1, 10)], &client(1)).unwrap();

        assert_eq!(backend.query(&QueryInput::new("order"), &Session::new()).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_table_counts_failure() {
        let backend = backend();
        let err = backend.query(&QueryInput::new("nope"), &admin()).unwrap_err();
        assert_eq!(err.code(), "QQQ_INSTANCE_UNKNOWN_TABLE");
        assert_eq!(backend.metrics().snapshot().queries_failed, 1);
    }
}
