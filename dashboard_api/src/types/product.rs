//! Product catalog types returned by the catalog API.

use serde::{Deserialize, Serialize};

/// Unique identifier for a catalog product.
pub type ProductID = i64;

/// Full product record returned by the `/products` endpoints.
///
/// Only the identity, naming, category and pricing fields are required;
/// everything else defaults when the catalog omits it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductID,

    pub title: String,

    #[serde(default)]
    pub description: String,

    pub category: String,

    pub price: f64,

    #[serde(default)]
    pub discount_percentage: f64,

    /// Average review score, 0-5.
    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub stock: i64,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Absent for unbranded goods (groceries, mostly).
    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub sku: Option<String>,

    #[serde(default)]
    pub weight: Option<f64>,

    #[serde(default)]
    pub dimensions: Option<Dimensions>,

    #[serde(default)]
    pub warranty_information: Option<String>,

    #[serde(default)]
    pub shipping_information: Option<String>,

    #[serde(default)]
    pub availability_status: Option<String>,

    #[serde(default)]
    pub reviews: Vec<Review>,

    #[serde(default)]
    pub return_policy: Option<String>,

    #[serde(default)]
    pub minimum_order_quantity: Option<i64>,

    #[serde(default)]
    pub meta: Option<ProductMeta>,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// A single customer review embedded in a product.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub rating: f64,
    pub comment: String,
    pub date: String,
    pub reviewer_name: String,
    pub reviewer_email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductMeta {
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub qr_code: Option<String>,
}

/// Paginated product list as returned by `/products`, `/products/search`
/// and `/products/category/{slug}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
}

/// Entry of the `/products/categories` listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Category {
    pub slug: String,
    pub name: String,
    pub url: String,
}

/// Payload for creating a product.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
    pub brand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Partial update payload; only the fields that are `Some` are sent.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.brand.is_none()
            && self.discount_percentage.is_none()
    }
}

/// Response body of `DELETE /products/{id}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeletedProduct {
    pub id: ProductID,
    pub title: Option<String>,
    pub is_deleted: bool,
    pub deleted_on: String,
}
