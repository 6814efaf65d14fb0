//! Backend-agnostic query filtering
//!
//! Backends without native filtering use this module to emulate
//! WHERE / ORDER BY / OFFSET / LIMIT over fully materialized records.
//!
//! # Evaluation Flow
//!
//! 1. Match each record against the filter tree (`FilterMatcher`)
//! 2. Sort survivors by the filter's order-bys (`RecordSorter`)
//! 3. Apply skip and limit (`Pager`)
//!
//! Malformed criteria and incomparable values are errors, never silent
//! non-matches.

mod compare;
mod criterion;
mod errors;
mod evaluator;
mod matcher;
mod pager;
mod query_filter;
mod sorter;

pub use compare::{compare_values, strict_equals, values_equal};
pub use criterion::{CriteriaOperator, FilterCriterion};
pub use errors::{FilterError, FilterResult};
pub use evaluator::CriterionEvaluator;
pub use matcher::FilterMatcher;
pub use pager::Pager;
pub use query_filter::{BooleanOperator, OrderBy, QueryFilter};
pub use sorter::RecordSorter;

use crate::record::Record;

/// Runs the full match, sort and page pipeline for a filter
pub fn apply_filter(filter: &QueryFilter, records: Vec<Record>) -> FilterResult<Vec<Record>> {
    let matched = FilterMatcher::filter_records(filter, records)?;
    let sorted = RecordSorter::sort(&filter.order_bys, matched)?;
    Ok(Pager::apply_skip_and_limit(filter.skip, filter.limit, sorted))
}
