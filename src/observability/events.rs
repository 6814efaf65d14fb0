//! Observable events
//!
//! Every log line names one of these. Events are explicit and typed; each
//! carries the severity it is logged at.

use std::fmt;

use super::logger::Severity;

/// Observable events of the record layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Metadata
    /// Instance metadata loaded and validated
    MetadataLoaded,
    /// Instance metadata rejected
    MetadataInvalid,
    /// Backend configuration loaded
    ConfigLoaded,

    // Queries
    /// Query evaluated and returned records
    QueryExecuted,
    /// Count evaluated
    CountExecuted,
    /// Query or count aborted with an error
    QueryFailed,

    // Writes
    /// Records inserted
    RecordsInserted,
    /// Records updated
    RecordsUpdated,
    /// Records deleted
    RecordsDeleted,
    /// Write rejected by the write lock tree
    RecordWriteDenied,

    // Security
    /// Session null-value-behavior override did not name a behavior
    NullBehaviorOverrideIgnored,
    /// Field values cleared by field security locks
    FieldsRedacted,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::MetadataLoaded => "METADATA_LOADED",
            Event::MetadataInvalid => "METADATA_INVALID",
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::CountExecuted => "COUNT_EXECUTED",
            Event::QueryFailed => "QUERY_FAILED",

            Event::RecordsInserted => "RECORDS_INSERTED",
            Event::RecordsUpdated => "RECORDS_UPDATED",
            Event::RecordsDeleted => "RECORDS_DELETED",
            Event::RecordWriteDenied => "RECORD_WRITE_DENIED",

            Event::NullBehaviorOverrideIgnored => "NULL_BEHAVIOR_OVERRIDE_IGNORED",
            Event::FieldsRedacted => "FIELDS_REDACTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::MetadataInvalid | Event::QueryFailed => Severity::Error,
            Event::RecordWriteDenied | Event::NullBehaviorOverrideIgnored => Severity::Warn,
            Event::FieldsRedacted => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
