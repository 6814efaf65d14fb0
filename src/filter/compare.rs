//! Value comparison primitives shared by the evaluator, sorter and lock checks
//!
//! Equality coercion:
//! - number vs number: numeric value
//! - number vs string: the number is stringified
//! - date / date-time vs date, date-time or string: equal exactly when the
//!   ordering below says so; unparseable is unequal
//! - anything else: same kind and same value
//!
//! Ordering coercion:
//! - date vs date, or vs a string parseable as a date
//! - date-time vs date-time, or vs an RFC 3339 string
//! - number vs number (as f64); NaN has no ordering
//! - string vs string (lexicographic)
//! - boolean vs boolean
//! - anything else is an unsupported comparison

use std::cmp::Ordering;

use super::errors::{FilterError, FilterResult};
use crate::record::Value;

/// Equality with number/string and date/string coercion.
///
/// Null never equals anything, including null.
pub fn values_equal(value: &Value, criterion: &Value) -> bool {
    match (value, criterion) {
        (Value::Null, _) | (_, Value::Null) => false,
        (a, b) if a.is_number() && b.is_number() => numbers_equal(a, b),
        (Value::String(s), n) | (n, Value::String(s)) if n.is_number() => *s == n.to_string(),
        (a, b) if is_temporal(a) || is_temporal(b) => {
            matches!(compare_values(a, b), Ok(Ordering::Equal))
        }
        (a, b) => a == b,
    }
}

/// Equality without coercion, except that numbers compare by value.
///
/// Used for list membership, where null may legitimately be listed.
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    if a.is_number() && b.is_number() {
        return numbers_equal(a, b);
    }
    a == b
}

fn is_temporal(value: &Value) -> bool {
    matches!(value, Value::Date(_) | Value::DateTime(_))
}

fn numbers_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => x == y,
        _ => a.as_f64() == b.as_f64(),
    }
}

/// Orders two non-null values.
///
/// Fails with `UnsupportedComparison` for type pairings without an ordering,
/// and `TypeMismatch` when a string cannot be coerced to the date on the other side.
pub fn compare_values(a: &Value, b: &Value) -> FilterResult<Ordering> {
    match (a, b) {
        (Value::Date(_), _) | (_, Value::Date(_)) => {
            let left = coerce_date(a, b)?;
            let right = coerce_date(b, a)?;
            Ok(left.cmp(&right))
        }
        (Value::DateTime(x), Value::DateTime(y)) => Ok(x.cmp(y)),
        (Value::DateTime(x), s @ Value::String(_)) => Ok(x.cmp(&coerce_date_time(s)?)),
        (s @ Value::String(_), Value::DateTime(y)) => Ok(coerce_date_time(s)?.cmp(y)),
        (Value::Integer(x), Value::Integer(y)) => Ok(x.cmp(y)),
        (x, y) if x.is_number() && y.is_number() => {
            let xf = x.as_f64().unwrap_or_default();
            let yf = y.as_f64().unwrap_or_default();
            xf.partial_cmp(&yf).ok_or_else(|| {
                FilterError::type_mismatch(format!("Values [{}] and [{}] have no numeric ordering", x, y))
            })
        }
        (Value::String(x), Value::String(y)) => Ok(x.cmp(y)),
        (Value::Boolean(x), Value::Boolean(y)) => Ok(x.cmp(y)),
        _ => Err(unsupported(a, b)),
    }
}

fn coerce_date(value: &Value, other: &Value) -> FilterResult<chrono::NaiveDate> {
    match value {
        Value::Date(_) | Value::DateTime(_) | Value::String(_) => value.as_date().ok_or_else(|| {
            FilterError::type_mismatch(format!("Value [{}] cannot be compared as a date", value))
        }),
        _ => Err(unsupported(value, other)),
    }
}

fn coerce_date_time(value: &Value) -> FilterResult<chrono::DateTime<chrono::Utc>> {
    value.as_date_time().ok_or_else(|| {
        FilterError::type_mismatch(format!("Value [{}] cannot be compared as a date-time", value))
    })
}

fn unsupported(a: &Value, b: &Value) -> FilterError {
    FilterError::UnsupportedComparison {
        left: a.type_name(),
        right: b.type_name(),
    }
}
