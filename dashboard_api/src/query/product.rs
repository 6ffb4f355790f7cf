use std::str::FromStr;

use super::{
    common::{QueryCommon, SortDirection},
    Query,
};

/// Query for the product catalog list endpoints.
///
/// A search term routes to `/products/search`, a category to
/// `/products/category/{slug}`, otherwise `/products`. Search wins over
/// category when both are set.
#[derive(Default, Debug, Clone)]
pub struct ProductQuery {
    pub common: QueryCommon,
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort_by: Option<ProductSortBy>,
}

impl Query for ProductQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("q".to_string(), search.clone()));
        }
        pairs.extend(self.common.query_pairs());
        if let Some(sort_by) = self.sort_by {
            pairs.push(("sortBy".to_string(), sort_by.to_string()));
            pairs.push((
                "order".to_string(),
                self.common.sort_direction.to_string(),
            ));
        }
        pairs
    }
}

impl ProductQuery {
    /// Request path for this query.
    pub fn path(&self) -> String {
        if self.search.is_some() {
            "/products/search".to_string()
        } else if let Some(category) = &self.category {
            format!("/products/category/{}", category)
        } else {
            "/products".to_string()
        }
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_sort_by(mut self, sort_by: ProductSortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }
}

/// Server-side sort fields supported by the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductSortBy {
    Price,
    Rating,
    Stock,
    Title,
}

impl std::fmt::Display for ProductSortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ProductSortBy::Price => "price",
                ProductSortBy::Rating => "rating",
                ProductSortBy::Stock => "stock",
                ProductSortBy::Title => "title",
            }
        )
    }
}

impl FromStr for ProductSortBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(ProductSortBy::Price),
            "rating" => Ok(ProductSortBy::Rating),
            "stock" => Ok(ProductSortBy::Stock),
            "title" => Ok(ProductSortBy::Title),
            _ => Err(()),
        }
    }
}
