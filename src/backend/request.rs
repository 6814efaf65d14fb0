//! Query inputs and outputs

use serde::{Deserialize, Serialize};

use crate::filter::QueryFilter;
use crate::record::Record;

/// A query or count against one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryInput {
    pub table_name: String,
    #[serde(default)]
    pub filter: QueryFilter,
}

impl QueryInput {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            filter: QueryFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: QueryFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Records returned by a query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOutput {
    /// Matching records, sorted and paged
    pub records: Vec<Record>,
    /// Records examined before filtering
    pub scanned_count: usize,
    /// Field values cleared by field locks, across all records
    pub redacted_field_count: usize,
}

impl QueryOutput {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
