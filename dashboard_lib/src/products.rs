//! Catalog-specific helpers on top of the generic pipeline.

use dashboard_api::types::Product;
use serde::Serialize;

use crate::format::{capitalize_first, format_currency};
use crate::pipeline::{
    filter_by_category, filter_by_range, filter_by_search, sort_records, FieldValue, Record,
    SortConfig,
};

/// Fields searched by the product table's search box.
pub const PRODUCT_SEARCH_FIELDS: &[&str] = &["title", "description", "category"];

impl Record for Product {
    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "id" => FieldValue::from(self.id),
            "title" => FieldValue::from(self.title.as_str()),
            "description" => FieldValue::from(self.description.as_str()),
            "category" => FieldValue::from(self.category.as_str()),
            "price" => FieldValue::from(self.price),
            "discount_percentage" | "discountPercentage" => {
                FieldValue::from(self.discount_percentage)
            }
            "rating" => FieldValue::from(self.rating),
            "stock" => FieldValue::from(self.stock),
            "brand" => FieldValue::from(self.brand.clone()?),
            "sku" => FieldValue::from(self.sku.clone()?),
            "availability_status" | "availabilityStatus" => {
                FieldValue::from(self.availability_status.clone()?)
            }
            "tags" | "reviews" | "dimensions" | "meta" | "images" => FieldValue::Nested,
            _ => return None,
        };
        Some(value)
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// The product table's filter bar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilters {
    pub search: String,
    pub category: String,
    pub price_range: Option<PriceRange>,
}

/// Applies search, category and price filters in that order.
pub fn filter_products(products: &[Product], filters: &ProductFilters) -> Vec<Product> {
    let mut filtered = filter_by_search(products, &filters.search, PRODUCT_SEARCH_FIELDS);
    filtered = filter_by_category(&filtered, &filters.category, "category");
    if let Some(range) = filters.price_range {
        filtered = filter_by_range(&filtered, "price", Some(range.min), Some(range.max));
    }
    filtered
}

pub fn sort_products(products: &[Product], config: &SortConfig) -> Vec<Product> {
    sort_records(products, &config.field, config.direction)
}

pub fn format_product_price(price: f64) -> String {
    format_currency(price, "USD")
}

/// "4.5 (3 reviews)".
pub fn format_product_rating(product: &Product) -> String {
    format!("{:.1} ({} reviews)", product.rating, product.reviews.len())
}

/// Display tone for a rating badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingTier {
    Success,
    Warning,
    Danger,
    Default,
}

impl RatingTier {
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 4.0 {
            RatingTier::Success
        } else if rate >= 3.0 {
            RatingTier::Warning
        } else if rate >= 2.0 {
            RatingTier::Danger
        } else {
            RatingTier::Default
        }
    }
}

pub fn format_category_name(category: &str) -> String {
    capitalize_first(category)
}

/// Distinct categories in first-seen order.
pub fn unique_categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for p in products {
        if !seen.iter().any(|c| c == &p.category) {
            seen.push(p.category.clone());
        }
    }
    seen
}

/// Lowest and highest price, or `0..100` for an empty catalog.
pub fn price_range(products: &[Product]) -> PriceRange {
    if products.is_empty() {
        return PriceRange { min: 0.0, max: 100.0 };
    }
    products.iter().fold(
        PriceRange {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        },
        |acc, p| PriceRange {
            min: acc.min.min(p.price),
            max: acc.max.max(p.price),
        },
    )
}

/// Summary figures for the catalog header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductStats {
    pub total: usize,
    /// Products rated 4 or higher.
    pub high_rated: usize,
    /// Rounded to one decimal.
    pub average_rating: f64,
    /// Rounded to cents.
    pub average_price: f64,
}

pub fn product_stats(products: &[Product]) -> ProductStats {
    let total = products.len();
    let high_rated = products.iter().filter(|p| p.rating >= 4.0).count();
    let (average_rating, average_price) = if total > 0 {
        let n = total as f64;
        (
            products.iter().map(|p| p.rating).sum::<f64>() / n,
            products.iter().map(|p| p.price).sum::<f64>() / n,
        )
    } else {
        (0.0, 0.0)
    };
    ProductStats {
        total,
        high_rated,
        average_rating: round_to(average_rating, 1),
        average_price: round_to(average_price, 2),
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
