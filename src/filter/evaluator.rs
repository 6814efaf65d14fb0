//! Criterion evaluation against a single record value
//!
//! Null handling:
//! - EQUALS never matches null; NOT_EQUALS always does
//! - IS_BLANK matches null and empty strings
//! - string operators read a null record value as ""
//! - every ordering operator is false for a null record value, mirroring SQL NULL
//!
//! Ordering operators all derive from one `compare_values` call, and EQUALS
//! agrees with that comparison wherever it succeeds, so GREATER_THAN_OR_EQUALS
//! is GREATER_THAN or EQUALS and LESS_THAN is its negation. NOT_BETWEEN is the
//! exact complement of BETWEEN (inclusive on both ends) for non-null values.

use std::borrow::Cow;
use std::cmp::Ordering;

use super::compare::{compare_values, strict_equals, values_equal};
use super::criterion::{CriteriaOperator, FilterCriterion};
use super::errors::{FilterError, FilterResult};
use crate::record::Value;

/// Evaluates one criterion against one record value
pub struct CriterionEvaluator;

impl CriterionEvaluator {
    /// Returns whether `value` satisfies the criterion.
    ///
    /// Malformed criteria fail before the record value is inspected.
    pub fn matches(criterion: &FilterCriterion, value: &Value) -> FilterResult<bool> {
        criterion.validate()?;

        let result = match criterion.operator {
            CriteriaOperator::Equals => Self::test_equals(&criterion.values, value),
            CriteriaOperator::NotEquals => !Self::test_equals(&criterion.values, value),
            CriteriaOperator::In => Self::test_in(&criterion.values, value),
            CriteriaOperator::NotIn => !Self::test_in(&criterion.values, value),
            CriteriaOperator::IsBlank => value.is_blank(),
            CriteriaOperator::IsNotBlank => !value.is_blank(),
            CriteriaOperator::Contains
            | CriteriaOperator::NotContains
            | CriteriaOperator::StartsWith
            | CriteriaOperator::NotStartsWith
            | CriteriaOperator::EndsWith
            | CriteriaOperator::NotEndsWith => Self::test_string(criterion, value)?,
            CriteriaOperator::GreaterThan => {
                let bound = Self::ordering_bound(criterion, 0)?;
                Self::ordering(value, bound)? == Some(Ordering::Greater)
            }
            CriteriaOperator::GreaterThanOrEquals => {
                let bound = Self::ordering_bound(criterion, 0)?;
                matches!(Self::ordering(value, bound)?, Some(Ordering::Greater | Ordering::Equal))
            }
            CriteriaOperator::LessThan => {
                let bound = Self::ordering_bound(criterion, 0)?;
                Self::ordering(value, bound)? == Some(Ordering::Less)
            }
            CriteriaOperator::LessThanOrEquals => {
                let bound = Self::ordering_bound(criterion, 0)?;
                matches!(Self::ordering(value, bound)?, Some(Ordering::Less | Ordering::Equal))
            }
            CriteriaOperator::Between => {
                let low = Self::ordering_bound(criterion, 0)?;
                let high = Self::ordering_bound(criterion, 1)?;
                Self::between(value, low, high)?
            }
            CriteriaOperator::NotBetween => {
                let low = Self::ordering_bound(criterion, 0)?;
                let high = Self::ordering_bound(criterion, 1)?;
                !value.is_null() && !Self::between(value, low, high)?
            }
        };

        Ok(result)
    }

    /// EQUALS against the first criterion value
    fn test_equals(values: &[Value], value: &Value) -> bool {
        values
            .first()
            .map(|expected| values_equal(value, expected))
            .unwrap_or(false)
    }

    /// Membership test.
    ///
    /// A numeric record value is stringified only when the first listed value
    /// is a string.
    fn test_in(values: &[Value], value: &Value) -> bool {
        let candidate = match values.first() {
            Some(Value::String(_)) if value.is_number() => Cow::Owned(Value::String(value.to_string())),
            _ => Cow::Borrowed(value),
        };
        values.iter().any(|listed| strict_equals(&candidate, listed))
    }

    /// String pattern operators and their negations; both sides must be strings
    fn test_string(criterion: &FilterCriterion, value: &Value) -> FilterResult<bool> {
        let pattern = Self::first_string_value(criterion)?;
        let actual = match value {
            Value::Null => "",
            Value::String(s) => s.as_str(),
            other => {
                return Err(FilterError::type_mismatch(format!(
                    "Value [{}] for field '{}' is a {}, but the {} operator requires a string",
                    other,
                    criterion.field_name,
                    other.type_name(),
                    criterion.operator
                )))
            }
        };
        let result = match criterion.operator {
            CriteriaOperator::Contains => actual.contains(pattern),
            CriteriaOperator::NotContains => !actual.contains(pattern),
            CriteriaOperator::StartsWith => actual.starts_with(pattern),
            CriteriaOperator::NotStartsWith => !actual.starts_with(pattern),
            CriteriaOperator::EndsWith => actual.ends_with(pattern),
            CriteriaOperator::NotEndsWith => !actual.ends_with(pattern),
            other => {
                return Err(FilterError::invalid_argument(format!(
                    "{} is not a string operator",
                    other
                )))
            }
        };
        Ok(result)
    }

    fn first_string_value(criterion: &FilterCriterion) -> FilterResult<&str> {
        match criterion.values.first() {
            None => Err(FilterError::invalid_argument(format!(
                "Missing criteria value for {} on field '{}'",
                criterion.operator, criterion.field_name
            ))),
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(FilterError::type_mismatch(format!(
                "Criteria value [{}] on field '{}' is a {}, but the {} operator requires a string",
                other,
                criterion.field_name,
                other.type_name(),
                criterion.operator
            ))),
        }
    }

    /// Returns the positional bound of an ordering criterion; null bounds are invalid.
    fn ordering_bound(criterion: &FilterCriterion, index: usize) -> FilterResult<&Value> {
        match criterion.values.get(index) {
            Some(bound) if !bound.is_null() => Ok(bound),
            _ => Err(FilterError::invalid_argument(format!(
                "Null or missing criteria value at position {} for {} on field '{}'",
                index, criterion.operator, criterion.field_name
            ))),
        }
    }

    /// Orders the record value against a bound; `None` for a null record value
    fn ordering(value: &Value, bound: &Value) -> FilterResult<Option<Ordering>> {
        if value.is_null() {
            return Ok(None);
        }
        compare_values(value, bound).map(Some)
    }

    fn between(value: &Value, low: &Value, high: &Value) -> FilterResult<bool> {
        let Some(from_low) = Self::ordering(value, low)? else {
            return Ok(false);
        };
        let Some(from_high) = Self::ordering(value, high)? else {
            return Ok(false);
        };
        Ok(from_low != Ordering::Less && from_high != Ordering::Greater)
    }
}
