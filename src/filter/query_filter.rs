//! Query filters: a boolean tree of criteria plus ordering and paging

use serde::{Deserialize, Serialize};

use super::criterion::FilterCriterion;

/// Operator joining the children of a filter or lock node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BooleanOperator {
    #[default]
    And,
    Or,
}

impl BooleanOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanOperator::And => "AND",
            BooleanOperator::Or => "OR",
        }
    }

    /// Starting value of a fold: true for AND, false for OR
    pub fn identity(&self) -> bool {
        matches!(self, BooleanOperator::And)
    }

    /// Folds one more result into the accumulator
    pub fn apply(&self, accumulator: bool, result: bool) -> bool {
        match self {
            BooleanOperator::And => accumulator && result,
            BooleanOperator::Or => accumulator || result,
        }
    }

    /// True once the accumulator can no longer change
    pub fn is_decided(&self, accumulator: bool) -> bool {
        match self {
            BooleanOperator::And => !accumulator,
            BooleanOperator::Or => accumulator,
        }
    }
}

/// A single sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    /// Field to sort by
    pub field_name: String,
    /// Ascending when true
    #[serde(default = "default_ascending")]
    pub is_ascending: bool,
}

fn default_ascending() -> bool {
    true
}

impl OrderBy {
    pub fn asc(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            is_ascending: true,
        }
    }

    pub fn desc(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            is_ascending: false,
        }
    }
}

/// A filter node.
///
/// Criteria and sub-filters are all reduced under the node's single
/// boolean operator. A node with neither is vacuously true.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFilter {
    #[serde(default)]
    pub boolean_operator: BooleanOperator,
    #[serde(default)]
    pub criteria: Vec<FilterCriterion>,
    #[serde(default)]
    pub sub_filters: Vec<QueryFilter>,
    #[serde(default)]
    pub order_bys: Vec<OrderBy>,
    #[serde(default)]
    pub skip: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl QueryFilter {
    /// Create an empty filter with the given operator
    pub fn new(boolean_operator: BooleanOperator) -> Self {
        Self {
            boolean_operator,
            ..Self::default()
        }
    }

    /// Create an empty AND filter
    pub fn and() -> Self {
        Self::new(BooleanOperator::And)
    }

    /// Create an empty OR filter
    pub fn or() -> Self {
        Self::new(BooleanOperator::Or)
    }

    pub fn with_criteria(mut self, criterion: FilterCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn with_sub_filter(mut self, sub_filter: QueryFilter) -> Self {
        self.sub_filters.push(sub_filter);
        self
    }

    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_bys.push(order_by);
        self
    }

    pub fn with_skip(mut self, skip: i64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True when the node has no criteria and no sub-filters
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty() && self.sub_filters.is_empty()
    }

    /// Returns a copy of this filter's boolean tree without ordering or paging
    pub fn without_paging(&self) -> Self {
        Self {
            boolean_operator: self.boolean_operator,
            criteria: self.criteria.clone(),
            sub_filters: self.sub_filters.clone(),
            order_bys: Vec::new(),
            skip: None,
            limit: None,
        }
    }
}
