//! Filter criteria: one field, one operator, positional comparison values

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{FilterError, FilterResult};
use crate::record::Value;

/// Criterion operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriteriaOperator {
    Equals,
    NotEquals,
    In,
    NotIn,
    IsBlank,
    IsNotBlank,
    Contains,
    NotContains,
    StartsWith,
    NotStartsWith,
    EndsWith,
    NotEndsWith,
    GreaterThan,
    GreaterThanOrEquals,
    LessThan,
    LessThanOrEquals,
    Between,
    NotBetween,
}

impl CriteriaOperator {
    /// Returns the operator name as written in metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            CriteriaOperator::Equals => "EQUALS",
            CriteriaOperator::NotEquals => "NOT_EQUALS",
            CriteriaOperator::In => "IN",
            CriteriaOperator::NotIn => "NOT_IN",
            CriteriaOperator::IsBlank => "IS_BLANK",
            CriteriaOperator::IsNotBlank => "IS_NOT_BLANK",
            CriteriaOperator::Contains => "CONTAINS",
            CriteriaOperator::NotContains => "NOT_CONTAINS",
            CriteriaOperator::StartsWith => "STARTS_WITH",
            CriteriaOperator::NotStartsWith => "NOT_STARTS_WITH",
            CriteriaOperator::EndsWith => "ENDS_WITH",
            CriteriaOperator::NotEndsWith => "NOT_ENDS_WITH",
            CriteriaOperator::GreaterThan => "GREATER_THAN",
            CriteriaOperator::GreaterThanOrEquals => "GREATER_THAN_OR_EQUALS",
            CriteriaOperator::LessThan => "LESS_THAN",
            CriteriaOperator::LessThanOrEquals => "LESS_THAN_OR_EQUALS",
            CriteriaOperator::Between => "BETWEEN",
            CriteriaOperator::NotBetween => "NOT_BETWEEN",
        }
    }

    /// Returns the exact number of values required, if fixed
    pub fn required_value_count(&self) -> Option<usize> {
        match self {
            CriteriaOperator::IsBlank | CriteriaOperator::IsNotBlank => Some(0),
            CriteriaOperator::Between | CriteriaOperator::NotBetween => Some(2),
            _ => None,
        }
    }

    /// True for the string-pattern operators and their negations
    pub fn is_string_operator(&self) -> bool {
        matches!(
            self,
            CriteriaOperator::Contains
                | CriteriaOperator::NotContains
                | CriteriaOperator::StartsWith
                | CriteriaOperator::NotStartsWith
                | CriteriaOperator::EndsWith
                | CriteriaOperator::NotEndsWith
        )
    }
}

impl fmt::Display for CriteriaOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single field test within a filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriterion {
    /// Field to test
    pub field_name: String,
    /// Comparison operator
    pub operator: CriteriaOperator,
    /// Comparison values; BETWEEN uses index 0 and 1 as low and high
    #[serde(default)]
    pub values: Vec<Value>,
}

impl FilterCriterion {
    /// Create a new criterion
    pub fn new(field_name: impl Into<String>, operator: CriteriaOperator, values: Vec<Value>) -> Self {
        Self {
            field_name: field_name.into(),
            operator,
            values,
        }
    }

    /// Create an EQUALS criterion
    pub fn equals(field_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field_name, CriteriaOperator::Equals, vec![value.into()])
    }

    /// Create an IN criterion
    pub fn in_list(field_name: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(field_name, CriteriaOperator::In, values)
    }

    /// Create an IS_BLANK criterion
    pub fn is_blank(field_name: impl Into<String>) -> Self {
        Self::new(field_name, CriteriaOperator::IsBlank, Vec::new())
    }

    /// Create an IS_NOT_BLANK criterion
    pub fn is_not_blank(field_name: impl Into<String>) -> Self {
        Self::new(field_name, CriteriaOperator::IsNotBlank, Vec::new())
    }

    /// Create a GREATER_THAN criterion
    pub fn greater_than(field_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field_name, CriteriaOperator::GreaterThan, vec![value.into()])
    }

    /// Create a LESS_THAN criterion
    pub fn less_than(field_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field_name, CriteriaOperator::LessThan, vec![value.into()])
    }

    /// Create a BETWEEN criterion (inclusive on both ends)
    pub fn between(
        field_name: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        Self::new(field_name, CriteriaOperator::Between, vec![low.into(), high.into()])
    }

    /// Checks value-count invariants for the operator.
    ///
    /// IS_BLANK / IS_NOT_BLANK ignore values; BETWEEN / NOT_BETWEEN need
    /// exactly two; every other operator needs at least one. String
    /// operators also need a string pattern.
    pub fn validate(&self) -> FilterResult<()> {
        self.validate_value_count()?;

        if self.operator.is_string_operator() {
            if let Some(pattern) = self.values.first().filter(|v| !matches!(v, Value::String(_))) {
                return Err(FilterError::type_mismatch(format!(
                    "Criteria value [{}] on field '{}' is a {}, but the {} operator requires a string",
                    pattern,
                    self.field_name,
                    pattern.type_name(),
                    self.operator
                )));
            }
        }
        Ok(())
    }

    fn validate_value_count(&self) -> FilterResult<()> {
        match self.operator.required_value_count() {
            Some(0) => Ok(()),
            Some(count) if self.values.len() != count => Err(FilterError::invalid_argument(format!(
                "{} on field '{}' requires exactly {} values, found {}",
                self.operator,
                self.field_name,
                count,
                self.values.len()
            ))),
            _ if self.values.is_empty() => Err(FilterError::invalid_argument(format!(
                "Missing criteria value for {} on field '{}'",
                self.operator, self.field_name
            ))),
            _ => Ok(()),
        }
    }
}
