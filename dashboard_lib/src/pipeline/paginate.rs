//! Page windows over an already filtered and sorted list.

use serde::Serialize;

/// Number of pages needed for `total` items. Zero when either is zero.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Items of the 1-based `page`. Page 0 is treated as page 1; pages past the
/// end and a zero page size yield nothing.
pub fn paginate<R: Clone>(records: &[R], page: usize, page_size: usize) -> Vec<R> {
    if page_size == 0 {
        return Vec::new();
    }
    let page = page.max(1);
    let start = (page - 1).saturating_mul(page_size);
    if start >= records.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(records.len());
    records[start..end].to_vec()
}

/// One page of results together with the size of the full result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<R> {
    pub items: Vec<R>,
    /// Matching records before pagination.
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<R: Clone> Page<R> {
    pub fn new(records: &[R], page: usize, page_size: usize) -> Self {
        let page = page.max(1);
        Self {
            items: paginate(records, page, page_size),
            total: records.len(),
            page,
            page_size,
            total_pages: total_pages(records.len(), page_size),
        }
    }
}

impl<R> Page<R> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// "start-end of total", 1-based and inclusive.
    pub fn range_label(&self) -> String {
        if self.items.is_empty() {
            return format!("0-0 of {}", self.total);
        }
        let start = (self.page - 1) * self.page_size + 1;
        let end = start + self.items.len() - 1;
        format!("{}-{} of {}", start, end, self.total)
    }
}
