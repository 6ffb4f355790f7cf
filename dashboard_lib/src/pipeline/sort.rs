//! Stable single- and multi-field sorting.

use std::cmp::Ordering;

use dashboard_api::SortDirection;

use super::record::{FieldValue, Record};

/// One sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct SortConfig {
    pub field: String,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn new(field: &str, direction: SortDirection) -> Self {
        Self {
            field: field.to_string(),
            direction,
        }
    }

    pub fn asc(field: &str) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: &str) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Same field, opposite direction.
    pub fn toggled(&self) -> Self {
        Self::new(&self.field, self.direction.toggle())
    }
}

/// Sort group of a value. Comparable kinds sort before missing ones so the
/// ordering stays total when a column mixes kinds.
fn kind_rank(value: &Option<FieldValue>) -> u8 {
    match value {
        Some(FieldValue::Number(_)) => 0,
        Some(FieldValue::Text(_)) => 1,
        Some(FieldValue::Bool(_)) => 2,
        Some(FieldValue::Nested) | None => 3,
    }
}

/// Compares two records on one field.
///
/// Numbers compare numerically and text lexicographically, in `direction`.
/// Values of different kinds are grouped by kind regardless of direction,
/// with missing and nested values always last and tied among themselves.
pub fn compare_field<R: Record>(a: &R, b: &R, field: &str, direction: SortDirection) -> Ordering {
    let (x, y) = (a.field(field), b.field(field));
    let by_kind = kind_rank(&x).cmp(&kind_rank(&y));
    if by_kind != Ordering::Equal {
        return by_kind;
    }
    let ordering = match (x, y) {
        (Some(FieldValue::Number(x)), Some(FieldValue::Number(y))) => x.total_cmp(&y),
        (Some(FieldValue::Text(x)), Some(FieldValue::Text(y))) => x.cmp(&y),
        (Some(FieldValue::Bool(x)), Some(FieldValue::Bool(y))) => x.cmp(&y),
        _ => Ordering::Equal,
    };
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Sorted copy of `records` by one field. Ties keep their input order.
pub fn sort_records<R: Record + Clone>(
    records: &[R],
    field: &str,
    direction: SortDirection,
) -> Vec<R> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| compare_field(a, b, field, direction));
    sorted
}

/// Sorted copy of `records` by several keys; the first unequal key decides.
pub fn sort_by_fields<R: Record + Clone>(records: &[R], configs: &[SortConfig]) -> Vec<R> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        configs
            .iter()
            .map(|c| compare_field(a, b, &c.field, c.direction))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    sorted
}

/// Sorted copy when a sort is active, otherwise the records as given.
pub fn sorted_or_original<R: Record + Clone>(records: &[R], config: Option<&SortConfig>) -> Vec<R> {
    match config {
        Some(c) => sort_records(records, &c.field, c.direction),
        None => records.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn prices(v: &[Value]) -> Vec<i64> {
        v.iter().map(|x| x["price"].as_i64().unwrap()).collect()
    }

    #[test]
    fn numeric_descending() {
        let data = vec![json!({"price": 999}), json!({"price": 150}), json!({"price": 799})];
        let sorted = sort_records(&data, "price", SortDirection::Desc);
        assert_eq!(prices(&sorted), vec![999, 799, 150]);
    }

    #[test]
    fn numbers_are_not_compared_as_text() {
        let data = vec![json!({"price": 100}), json!({"price": 20}), json!({"price": 3})];
        let sorted = sort_records(&data, "price", SortDirection::Asc);
        assert_eq!(prices(&sorted), vec![3, 20, 100]);
    }

    #[test]
    fn text_ascending_is_lexicographic() {
        let data = vec![json!({"t": "banana"}), json!({"t": "Apple"}), json!({"t": "apple"})];
        let sorted = sort_records(&data, "t", SortDirection::Asc);
        let titles: Vec<&str> = sorted.iter().map(|v| v["t"].as_str().unwrap()).collect();
        assert_eq!(titles, vec!["Apple", "apple", "banana"]);
    }

    #[test]
    fn multi_field_sort() {
        let data = vec![json!({"a": 1, "b": 2}), json!({"a": 1, "b": 1})];
        let sorted = sort_by_fields(&data, &[SortConfig::asc("a"), SortConfig::asc("b")]);
        assert_eq!(sorted, vec![json!({"a": 1, "b": 1}), json!({"a": 1, "b": 2})]);
    }

    #[test]
    fn secondary_key_direction_applies() {
        let data = vec![
            json!({"c": "x", "p": 1}),
            json!({"c": "y", "p": 5}),
            json!({"c": "x", "p": 3}),
        ];
        let sorted = sort_by_fields(&data, &[SortConfig::asc("c"), SortConfig::desc("p")]);
        assert_eq!(prices_of(&sorted), vec![3, 1, 5]);
    }

    fn prices_of(v: &[Value]) -> Vec<i64> {
        v.iter().map(|x| x["p"].as_i64().unwrap()).collect()
    }

    fn ids(v: &[Value]) -> Vec<i64> {
        v.iter().map(|x| x["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn ties_keep_input_order_and_missing_sort_last() {
        let data = vec![
            json!({"id": 1, "p": 5}),
            json!({"id": 2}),
            json!({"id": 3, "p": 5}),
            json!({"id": 4, "p": 9}),
        ];
        assert_eq!(ids(&sort_records(&data, "p", SortDirection::Desc)), vec![4, 1, 3, 2]);
        assert_eq!(ids(&sort_records(&data, "p", SortDirection::Asc)), vec![1, 3, 4, 2]);

        let all_equal = sort_by_fields(&data, &[SortConfig::asc("nope")]);
        assert_eq!(all_equal, data);
    }

    #[test]
    fn mixed_kinds_are_grouped() {
        let data = vec![
            json!({"id": 1, "p": "n/a"}),
            json!({"id": 2, "p": 10}),
            json!({"id": 3, "p": {"rate": 4}}),
            json!({"id": 4, "p": 2}),
        ];
        assert_eq!(ids(&sort_records(&data, "p", SortDirection::Asc)), vec![4, 2, 1, 3]);
        assert_eq!(ids(&sort_records(&data, "p", SortDirection::Desc)), vec![2, 4, 1, 3]);
    }

    #[test]
    fn no_sort_returns_original() {
        let data = vec![json!({"p": 2}), json!({"p": 1})];
        assert_eq!(sorted_or_original(&data, None), data);
        let cfg = SortConfig::asc("p");
        assert_eq!(sorted_or_original(&data, Some(&cfg))[0], json!({"p": 1}));
        assert_eq!(cfg.toggled().direction, SortDirection::Desc);
    }
}
