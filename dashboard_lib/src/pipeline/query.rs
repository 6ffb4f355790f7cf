//! The composed list pipeline: search, category, range, sort, paginate.

use dashboard_api::SortDirection;

use super::filter::{filter_by_category, filter_by_range, filter_by_search};
use super::paginate::Page;
use super::record::Record;
use super::sort::{sort_by_fields, SortConfig};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Inclusive numeric bounds on one field.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter {
    pub field: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Everything a table view needs to turn raw records into one page.
///
/// # Example
///
/// ```
/// use dashboard_lib::pipeline::ListQuery;
/// use serde_json::json;
///
/// let rows = vec![
///     json!({"title": "iPhone 13", "price": 999, "category": "electronics"}),
///     json!({"title": "Nike Shoes", "price": 150, "category": "clothing"}),
/// ];
/// let page = ListQuery::new()
///     .with_search("iphone", &["title"])
///     .with_sort("price", dashboard_lib::SortDirection::Desc)
///     .apply(&rows);
/// assert_eq!(page.total, 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub search_fields: Vec<String>,
    pub category: Option<(String, String)>,
    pub range: Option<RangeFilter>,
    pub sort: Vec<SortConfig>,
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            search_fields: Vec::new(),
            category: None,
            range: None,
            sort: Vec::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: &str, fields: &[&str]) -> Self {
        self.search = Some(term.to_string());
        self.search_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_category(mut self, field: &str, value: &str) -> Self {
        self.category = Some((field.to_string(), value.to_string()));
        self
    }

    pub fn with_range(mut self, field: &str, min: Option<f64>, max: Option<f64>) -> Self {
        self.range = Some(RangeFilter {
            field: field.to_string(),
            min,
            max,
        });
        self
    }

    /// Replaces any existing sort with a single key.
    pub fn with_sort(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort = vec![SortConfig::new(field, direction)];
        self
    }

    /// Adds a tie-breaking sort key after the existing ones.
    pub fn then_sort(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort.push(SortConfig::new(field, direction));
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// All matching records in display order, before pagination.
    pub fn matching<R: Record + Clone>(&self, records: &[R]) -> Vec<R> {
        let mut rows = match &self.search {
            Some(term) => {
                let fields: Vec<&str> = self.search_fields.iter().map(String::as_str).collect();
                filter_by_search(records, term, &fields)
            }
            None => records.to_vec(),
        };
        if let Some((field, value)) = &self.category {
            rows = filter_by_category(&rows, value, field);
        }
        if let Some(range) = &self.range {
            rows = filter_by_range(&rows, &range.field, range.min, range.max);
        }
        if !self.sort.is_empty() {
            rows = sort_by_fields(&rows, &self.sort);
        }
        rows
    }

    /// Runs the full pipeline and returns the requested page.
    pub fn apply<R: Record + Clone>(&self, records: &[R]) -> Page<R> {
        let rows = self.matching(records);
        tracing::debug!(
            input = records.len(),
            matched = rows.len(),
            page = self.page,
            "list pipeline applied"
        );
        Page::new(&rows, self.page, self.page_size)
    }
}
