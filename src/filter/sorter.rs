//! Record sorting by an ordered list of sort keys
//!
//! Each sort column is first normalized to a single key kind (the same
//! coercions the ordering operators use), so the comparator itself can never
//! fail mid-sort. The sort is stable: records that tie on every key keep
//! their input order. Null sorts before any value in ascending order.

use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;

use super::errors::{FilterError, FilterResult};
use super::query_filter::OrderBy;
use crate::record::{Record, Value};

/// Normalized, totally ordered sort key
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl SortKey {
    /// Keys within one column share a kind, so cross-kind arms only order null
    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Null, SortKey::Null) => Ordering::Equal,
            (SortKey::Null, _) => Ordering::Less,
            (_, SortKey::Null) => Ordering::Greater,
            (SortKey::Boolean(a), SortKey::Boolean(b)) => a.cmp(b),
            (SortKey::Integer(a), SortKey::Integer(b)) => a.cmp(b),
            (SortKey::Decimal(a), SortKey::Decimal(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::DateTime(a), SortKey::DateTime(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Column kind every non-null value is coerced to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Empty,
    Boolean,
    Integer,
    Decimal,
    Text,
    Date,
    DateTime,
}

/// Sorts records
pub struct RecordSorter;

impl RecordSorter {
    /// Returns the records sorted by the order-bys.
    ///
    /// Fails before any reordering when a column mixes values that have no
    /// common ordering.
    pub fn sort(order_bys: &[OrderBy], records: Vec<Record>) -> FilterResult<Vec<Record>> {
        if order_bys.is_empty() || records.len() < 2 {
            return Ok(records);
        }

        let mut columns = Vec::with_capacity(order_bys.len());
        for order_by in order_bys {
            columns.push(Self::column_keys(&order_by.field_name, &records)?);
        }

        let mut keyed: Vec<(usize, Record)> = records.into_iter().enumerate().collect();
        keyed.sort_by(|(a, _), (b, _)| {
            for (order_by, keys) in order_bys.iter().zip(&columns) {
                let ordering = keys[*a].compare(&keys[*b]);
                if ordering == Ordering::Equal {
                    continue;
                }
                return if order_by.is_ascending {
                    ordering
                } else {
                    ordering.reverse()
                };
            }
            Ordering::Equal
        });

        Ok(keyed.into_iter().map(|(_, record)| record).collect())
    }

    /// Builds the normalized keys of one field across all records
    fn column_keys(field_name: &str, records: &[Record]) -> FilterResult<Vec<SortKey>> {
        let kind = Self::column_kind(field_name, records)?;
        records
            .iter()
            .map(|record| Self::to_key(record.value(field_name), kind))
            .collect()
    }

    /// Picks the common kind of a column.
    ///
    /// Any date makes the column a date column; otherwise any date-time makes
    /// it a date-time column. Integers widen to decimals.
    fn column_kind(field_name: &str, records: &[Record]) -> FilterResult<ColumnKind> {
        let mut kind = ColumnKind::Empty;
        let mut first: Option<&Value> = None;

        for record in records {
            let value = record.value(field_name);
            let value_kind = match value {
                Value::Null => continue,
                Value::Boolean(_) => ColumnKind::Boolean,
                Value::Integer(_) => ColumnKind::Integer,
                Value::Decimal(_) => ColumnKind::Decimal,
                Value::String(_) => ColumnKind::Text,
                Value::Date(_) => ColumnKind::Date,
                Value::DateTime(_) => ColumnKind::DateTime,
            };

            let Some(first_value) = first else {
                first = Some(value);
                kind = value_kind;
                continue;
            };

            kind = match (kind, value_kind) {
                (a, b) if a == b => a,
                (ColumnKind::Integer, ColumnKind::Decimal) | (ColumnKind::Decimal, ColumnKind::Integer) => {
                    ColumnKind::Decimal
                }
                (ColumnKind::Date, ColumnKind::Text | ColumnKind::DateTime)
                | (ColumnKind::Text | ColumnKind::DateTime, ColumnKind::Date) => ColumnKind::Date,
                (ColumnKind::DateTime, ColumnKind::Text) | (ColumnKind::Text, ColumnKind::DateTime) => {
                    ColumnKind::DateTime
                }
                _ => {
                    return Err(FilterError::UnsupportedComparison {
                        left: first_value.type_name(),
                        right: value.type_name(),
                    })
                }
            };
        }

        Ok(kind)
    }

    fn to_key(value: &Value, kind: ColumnKind) -> FilterResult<SortKey> {
        if value.is_null() {
            return Ok(SortKey::Null);
        }

        let key = match (kind, value) {
            (ColumnKind::Boolean, Value::Boolean(b)) => Some(SortKey::Boolean(*b)),
            (ColumnKind::Integer, Value::Integer(i)) => Some(SortKey::Integer(*i)),
            (ColumnKind::Decimal, v) => v.as_f64().map(SortKey::Decimal),
            (ColumnKind::Text, Value::String(s)) => Some(SortKey::Text(s.clone())),
            (ColumnKind::Date, v) => v.as_date().map(SortKey::Date),
            (ColumnKind::DateTime, v) => v.as_date_time().map(SortKey::DateTime),
            _ => None,
        };

        key.ok_or_else(|| {
            FilterError::type_mismatch(format!(
                "Value [{}] cannot be ordered alongside {:?} values",
                value, kind
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(id: i64, name: &str, region: &str) -> Record {
        Record::new("state")
            .with_value("id", id)
            .with_value("name", name)
            .with_value("region", region)
    }

    fn ids(records: &[Record]) -> Vec<i64> {
        records
            .iter()
            .map(|r| match r.value("id") {
                Value::Integer(i) => *i,
                _ => -1,
            })
            .collect()
    }

    #[test]
    fn test_sort_by_name() {
        let records = vec![state(1, "Missouri", "MW"), state(2, "Illinois", "MW")];

        let records = RecordSorter::sort(&[OrderBy::asc("name")], records).unwrap();
        assert_eq!(ids(&records), vec![2, 1]);

        let records = RecordSorter::sort(&[OrderBy::desc("name")], records).unwrap();
        assert_eq!(ids(&records), vec![1, 2]);
    }

    #[test]
    fn test_secondary_key() {
        let records = vec![
            state(1, "Texas", "S"),
            state(2, "Iowa", "MW"),
            state(3, "Alabama", "S"),
            state(4, "Ohio", "MW"),
        ];

        let order_bys = [OrderBy::desc("region"), OrderBy::asc("name")];
        let records = RecordSorter::sort(&order_bys, records).unwrap();
        assert_eq!(ids(&records), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_full_ties_keep_input_order() {
        let records = vec![
            state(3, "Iowa", "MW"),
            state(1, "Iowa", "MW"),
            state(2, "Iowa", "MW"),
        ];

        let records = RecordSorter::sort(&[OrderBy::asc("name")], records).unwrap();
        assert_eq!(ids(&records), vec![3, 1, 2]);
    }

    #[test]
    fn test_nulls_first_ascending() {
        let records = vec![state(1, "Iowa", "MW"), Record::new("state").with_value("id", 2)];

        let records = RecordSorter::sort(&[OrderBy::asc("name")], records).unwrap();
        assert_eq!(ids(&records), vec![2, 1]);

        let records = RecordSorter::sort(&[OrderBy::desc("name")], records).unwrap();
        assert_eq!(ids(&records), vec![1, 2]);
    }

    #[test]
    fn test_mixed_numbers_sort_numerically() {
        let records = vec![
            Record::new("t").with_value("id", 1).with_value("v", 2.5),
            Record::new("t").with_value("id", 2).with_value("v", 2),
            Record::new("t").with_value("id", 3).with_value("v", 10),
        ];

        let records = RecordSorter::sort(&[OrderBy::asc("v")], records).unwrap();
        assert_eq!(ids(&records), vec![2, 1, 3]);
    }

    #[test]
    fn test_dates_and_date_strings() {
        let records = vec![
            Record::new("t")
                .with_value("id", 1)
                .with_value("d", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
            Record::new("t").with_value("id", 2).with_value("d", "2024-01-01"),
        ];

        let records = RecordSorter::sort(&[OrderBy::asc("d")], records).unwrap();
        assert_eq!(ids(&records), vec![2, 1]);
    }

    #[test]
    fn test_empty_order_bys_is_noop() {
        let records = vec![state(2, "B", "x"), state(1, "A", "x")];
        let records = RecordSorter::sort(&[], records).unwrap();
        assert_eq!(ids(&records), vec![2, 1]);
    }

    #[test]
    fn test_incomparable_values_fail() {
        let records = vec![
            Record::new("t").with_value("v", 1),
            Record::new("t").with_value("v", true),
        ];

        let err = RecordSorter::sort(&[OrderBy::asc("v")], records).unwrap_err();
        assert_eq!(
            err,
            FilterError::UnsupportedComparison {
                left: "integer",
                right: "boolean"
            }
        );
    }

    #[test]
    fn test_unparseable_date_string_fails() {
        let records = vec![
            Record::new("t").with_value("d", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
            Record::new("t").with_value("d", "someday"),
        ];

        let err = RecordSorter::sort(&[OrderBy::asc("d")], records).unwrap_err();
        assert_eq!(err.code(), "QQQ_FILTER_TYPE_MISMATCH");
    }
}
