//! Transport-neutral description of an outgoing API request.

use reqwest::Method;
use serde::Serialize;
use url::form_urlencoded;

use crate::{
    query::{ProcurementQuery, ProductQuery, Query},
    types::{NewProduct, ProductID, ProductUpdate},
    Error,
};

/// A single API call: method, path, query pairs, optional JSON body and
/// extra headers.
///
/// Policy layers add headers (auth, signatures) before handing the request
/// to [`crate::Client::send`].
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn post<B: Serialize>(path: &str, body: &B) -> Result<Self, Error> {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn put<B: Serialize>(path: &str, body: &B) -> Result<Self, Error> {
        Self::new(Method::PUT, path).with_body(body)
    }

    pub fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self, Error> {
        let value = serde_json::to_value(body)
            .map_err(|e| Error::InvalidFormat(format!("unserializable request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn with_query(mut self, query: &impl Query) -> Self {
        self.query.extend(query.query_pairs());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Header value previously attached under `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Path plus encoded query string, as sent on the wire.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{}", self.path, encoded)
    }

    /// Compact JSON body, or the empty string when there is none.
    pub fn body_string(&self) -> String {
        self.body
            .as_ref()
            .map(|b| b.to_string())
            .unwrap_or_default()
    }
}

/// Request builders for every endpoint the dashboard talks to.
pub mod endpoints {
    use super::*;

    pub fn products(query: &ProductQuery) -> ApiRequest {
        ApiRequest::get(&query.path()).with_query(query)
    }

    pub fn product(id: ProductID) -> ApiRequest {
        ApiRequest::get(&format!("/products/{}", id))
    }

    pub fn create_product(product: &NewProduct) -> Result<ApiRequest, Error> {
        ApiRequest::post("/products/add", product)
    }

    pub fn update_product(id: ProductID, update: &ProductUpdate) -> Result<ApiRequest, Error> {
        ApiRequest::put(&format!("/products/{}", id), update)
    }

    pub fn delete_product(id: ProductID) -> ApiRequest {
        ApiRequest::delete(&format!("/products/{}", id))
    }

    pub fn categories() -> ApiRequest {
        ApiRequest::get("/products/categories")
    }

    pub fn procurement(query: &ProcurementQuery, base_path: &str) -> ApiRequest {
        ApiRequest::get(&query.path(base_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_and_query_encodes_pairs() {
        let req = ApiRequest::get("/products/search")
            .with_query(&ProductQuery::default().with_search("red shoe"));
        assert_eq!(req.path_and_query(), "/products/search?q=red+shoe");
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = ApiRequest::get("/x").with_header("X-Client-Id", "abc");
        assert_eq!(req.header("x-client-id"), Some("abc"));
        assert_eq!(req.header("authorization"), None);
    }

    #[test]
    fn body_string_empty_without_body() {
        assert_eq!(ApiRequest::get("/x").body_string(), "");
        let req = endpoints::update_product(
            3,
            &ProductUpdate {
                price: Some(9.5),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(req.body_string(), r#"{"price":9.5}"#);
        assert_eq!(req.method, Method::PUT);
    }
}
