//! Boolean-tree filter matching over materialized records
//!
//! Evaluation order is fixed: the node's criteria in list order, then its
//! sub-filters in list order. AND nodes stop at the first false result and
//! OR nodes at the first true one, so later criteria are not evaluated once
//! the outcome is decided.

use super::errors::FilterResult;
use super::evaluator::CriterionEvaluator;
use super::query_filter::QueryFilter;
use crate::record::Record;

/// Matches records against filter trees
pub struct FilterMatcher;

impl FilterMatcher {
    /// Checks whether a record satisfies the filter.
    ///
    /// An empty filter matches every record. Evaluation errors abort the match.
    pub fn record_matches(filter: &QueryFilter, record: &Record) -> FilterResult<bool> {
        if filter.is_empty() {
            return Ok(true);
        }

        let operator = filter.boolean_operator;
        let mut accumulator = operator.identity();

        for criterion in &filter.criteria {
            let value = record.value(&criterion.field_name);
            let result = CriterionEvaluator::matches(criterion, value)?;
            accumulator = operator.apply(accumulator, result);
            if operator.is_decided(accumulator) {
                return Ok(accumulator);
            }
        }

        for sub_filter in &filter.sub_filters {
            let result = Self::record_matches(sub_filter, record)?;
            accumulator = operator.apply(accumulator, result);
            if operator.is_decided(accumulator) {
                return Ok(accumulator);
            }
        }

        Ok(accumulator)
    }

    /// Returns the records matching the filter, in input order.
    ///
    /// Ordering and paging on the filter are not applied here.
    pub fn filter_records(filter: &QueryFilter, records: Vec<Record>) -> FilterResult<Vec<Record>> {
        let mut matched = Vec::with_capacity(records.len());
        for record in records {
            if Self::record_matches(filter, &record)? {
                matched.push(record);
            }
        }
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{CriteriaOperator, FilterCriterion};
    use crate::record::Value;

    fn states() -> Vec<Record> {
        vec![
            Record::new("state")
                .with_value("id", 1)
                .with_value("name", "Missouri")
                .with_value("population", 15_000_000),
            Record::new("state")
                .with_value("id", 2)
                .with_value("name", "Illinois")
                .with_value("population", 25_000_000),
        ]
    }

    /// A criterion that fails with a type error whenever it is evaluated
    fn poisoned() -> FilterCriterion {
        FilterCriterion::new("name", CriteriaOperator::Contains, vec![Value::from(1)])
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let record = Record::new("state");
        assert!(FilterMatcher::record_matches(&QueryFilter::and(), &record).unwrap());
        assert!(FilterMatcher::record_matches(&QueryFilter::or(), &record).unwrap());
    }

    #[test]
    fn test_population_greater_than() {
        let filter = QueryFilter::and()
            .with_criteria(FilterCriterion::greater_than("population", 20_000_000));

        let matched = FilterMatcher::filter_records(&filter, states()).unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].value("name"), &Value::from("Illinois"));
    }

    #[test]
    fn test_and_short_circuits() {
        let filter = QueryFilter::and()
            .with_criteria(FilterCriterion::equals("name", "Kansas"))
            .with_criteria(poisoned());

        for record in states() {
            assert!(!FilterMatcher::record_matches(&filter, &record).unwrap());
        }
    }

    #[test]
    fn test_or_short_circuits() {
        let filter = QueryFilter::or()
            .with_criteria(FilterCriterion::is_not_blank("name"))
            .with_criteria(poisoned());

        for record in states() {
            assert!(FilterMatcher::record_matches(&filter, &record).unwrap());
        }
    }

    #[test]
    fn test_sub_filters_short_circuit_after_criteria() {
        let filter = QueryFilter::and()
            .with_criteria(FilterCriterion::equals("id", 3))
            .with_sub_filter(QueryFilter::and().with_criteria(poisoned()));

        let record = &states()[0];
        assert!(!FilterMatcher::record_matches(&filter, record).unwrap());
    }

    #[test]
    fn test_errors_propagate_when_reached() {
        let filter = QueryFilter::and()
            .with_criteria(FilterCriterion::equals("name", "Missouri"))
            .with_criteria(poisoned());

        let err = FilterMatcher::filter_records(&filter, states()).unwrap_err();
        assert_eq!(err.code(), "QQQ_FILTER_TYPE_MISMATCH");
    }

    #[test]
    fn test_nested_or_inside_and() {
        let filter = QueryFilter::and()
            .with_criteria(FilterCriterion::greater_than("population", 1))
            .with_sub_filter(
                QueryFilter::or()
                    .with_criteria(FilterCriterion::equals("name", "Kansas"))
                    .with_criteria(FilterCriterion::equals("name", "Missouri")),
            );

        let matched = FilterMatcher::filter_records(&filter, states()).unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].value("id"), &Value::Integer(1));
    }

    #[test]
    fn test_or_with_no_true_branch() {
        let filter = QueryFilter::or()
            .with_criteria(FilterCriterion::equals("name", "Kansas"))
            .with_sub_filter(QueryFilter::and().with_criteria(FilterCriterion::is_blank("name")));

        let matched = FilterMatcher::filter_records(&filter, states()).unwrap();
        assert!(matched.is_empty());
    }
}
