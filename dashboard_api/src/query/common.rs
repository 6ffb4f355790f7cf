//! Shared query infrastructure: the [`Query`] trait, [`QueryCommon`] fields, and [`SortDirection`].

use std::str::FromStr;

/// Trait implemented by all query builders. Provides query-string pairs and
/// shared builder methods for limit/skip paging and sort direction.
pub trait Query {
    /// Returns the query-string pairs this query contributes, in order.
    fn query_pairs(&self) -> Vec<(String, String)>;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the maximum number of results returned.
    fn with_limit(mut self, limit: u32) -> Self
    where
        Self: Sized,
    {
        self.get_common().limit = Some(limit);
        self
    }

    /// Sets the number of results to skip.
    fn with_skip(mut self, skip: u32) -> Self
    where
        Self: Sized,
    {
        self.get_common().skip = Some(skip);
        self
    }

    /// Converts a 1-indexed page and page size into limit/skip parameters.
    fn with_page(mut self, page: u32, page_size: u32) -> Self
    where
        Self: Sized,
    {
        let common = self.get_common();
        common.limit = Some(page_size);
        common.skip = Some(page.max(1).saturating_sub(1).saturating_mul(page_size));
        self
    }

    /// Sets the sort direction (ascending or descending).
    fn with_sort_direction(mut self, sort_direction: SortDirection) -> Self
    where
        Self: Sized,
    {
        self.get_common().sort_direction = sort_direction;
        self
    }
}

/// Sort order, shared by remote queries and the local list pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (smallest first). This is the default.
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SortDirection::Asc => "asc",
                SortDirection::Desc => "desc",
            }
        )
    }
}

impl FromStr for SortDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(()),
        }
    }
}

/// Fields shared by all list queries: paging window and sort direction.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryCommon {
    /// Maximum number of results. `None` uses the API default.
    pub limit: Option<u32>,
    /// Number of results to skip. `None` (or zero) starts at the beginning.
    pub skip: Option<u32>,
    /// Sort direction, sent only alongside a sort field.
    pub sort_direction: SortDirection,
}

impl QueryCommon {
    /// Returns the paging pairs (`limit`, `skip`) that are set.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(skip) = self.skip.filter(|s| *s > 0) {
            pairs.push(("skip".to_string(), skip.to_string()));
        }
        pairs
    }
}
