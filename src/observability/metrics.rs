//! Counter registry
//!
//! Counters only, monotonic, reset on process start. Atomics with Relaxed
//! ordering; exactness across threads is all that is required.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Operational counters of one backend
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    queries_executed: AtomicU64,
    counts_executed: AtomicU64,
    queries_failed: AtomicU64,
    records_scanned: AtomicU64,
    records_returned: AtomicU64,
    records_written: AtomicU64,
    records_deleted: AtomicU64,
    write_denials: AtomicU64,
    fields_redacted: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_counts_executed(&self) {
        self.counts_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_failed(&self) {
        self.queries_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records examined by a query before filtering
    pub fn add_records_scanned(&self, count: u64) {
        self.records_scanned.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_records_returned(&self, count: u64) {
        self.records_returned.fetch_add(count, Ordering::Relaxed);
    }

    /// Records inserted or updated
    pub fn add_records_written(&self, count: u64) {
        self.records_written.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_records_deleted(&self, count: u64) {
        self.records_deleted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_write_denials(&self) {
        self.write_denials.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_fields_redacted(&self, count: u64) {
        self.fields_redacted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            counts_executed: self.counts_executed.load(Ordering::Relaxed),
            queries_failed: self.queries_failed.load(Ordering::Relaxed),
            records_scanned: self.records_scanned.load(Ordering::Relaxed),
            records_returned: self.records_returned.load(Ordering::Relaxed),
            records_written: self.records_written.load(Ordering::Relaxed),
            records_deleted: self.records_deleted.load(Ordering::Relaxed),
            write_denials: self.write_denials.load(Ordering::Relaxed),
            fields_redacted: self.fields_redacted.load(Ordering::Relaxed),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or(serde_json::Value::Null)
    }
}

/// A point-in-time copy of every counter
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub queries_executed: u64,
    pub counts_executed: u64,
    pub queries_failed: u64,
    pub records_scanned: u64,
    pub records_returned: u64,
    pub records_written: u64,
    pub records_deleted: u64,
    pub write_denials: u64,
    pub fields_redacted: u64,
}
