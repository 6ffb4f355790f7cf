//! Client-side list processing for table views.
//!
//! Every stage is a pure function over a slice of [`Record`]s and returns a
//! new vector. [`ListQuery`] composes them in display order.

mod filter;
mod paginate;
mod query;
mod record;
mod sort;

pub use filter::{
    apply_filters, filter_by_category, filter_by_range, filter_by_search, filter_by_values,
};
pub use paginate::{paginate, total_pages, Page};
pub use query::{ListQuery, RangeFilter, DEFAULT_PAGE_SIZE};
pub use record::{FieldValue, Record};
pub use sort::{compare_field, sort_by_fields, sort_records, sorted_or_original, SortConfig};
