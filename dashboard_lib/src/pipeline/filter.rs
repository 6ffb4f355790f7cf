//! Record filters. Every function returns a new vector and leaves the input
//! untouched; an empty criterion is the identity.

use super::record::Record;

/// Keeps records where any of `fields` contains `term`, ignoring case.
///
/// Text fields match as lowercase substrings, numbers match on their
/// decimal rendering, and other values never match. A blank term returns
/// every record in its original order.
pub fn filter_by_search<R: Record + Clone>(records: &[R], term: &str, fields: &[&str]) -> Vec<R> {
    if term.trim().is_empty() {
        return records.to_vec();
    }
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|record| {
            fields.iter().any(|field| {
                record
                    .field(field)
                    .map(|value| value.contains_lowercase(&needle))
                    .unwrap_or(false)
            })
        })
        .cloned()
        .collect()
}

/// Keeps records whose text `field` equals `value` exactly.
pub fn filter_by_category<R: Record + Clone>(records: &[R], value: &str, field: &str) -> Vec<R> {
    if value.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| {
            record
                .field(field)
                .map(|v| v.as_text() == Some(value))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// Keeps records whose text `field` is one of `values`.
pub fn filter_by_values<R: Record + Clone>(records: &[R], field: &str, values: &[&str]) -> Vec<R> {
    if values.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| {
            record
                .field(field)
                .and_then(|v| v.as_text().map(|t| values.contains(&t)))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// Keeps records that satisfy every predicate.
pub fn apply_filters<R: Clone>(records: &[R], predicates: &[&dyn Fn(&R) -> bool]) -> Vec<R> {
    records
        .iter()
        .filter(|record| predicates.iter().all(|p| p(record)))
        .cloned()
        .collect()
}

/// Keeps records whose numeric `field` lies within `[min, max]`.
///
/// With neither bound set this is the identity. With any bound set,
/// records whose field is missing or not a number are dropped.
pub fn filter_by_range<R: Record + Clone>(
    records: &[R],
    field: &str,
    min: Option<f64>,
    max: Option<f64>,
) -> Vec<R> {
    if min.is_none() && max.is_none() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| match record.field(field).and_then(|v| v.as_number()) {
            Some(n) => min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi),
            None => false,
        })
        .cloned()
        .collect()
}
