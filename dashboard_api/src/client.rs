//! HTTP client for the dashboard's JSON APIs.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{request::ApiRequest, Error};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for a single JSON API base URL.
///
/// Holds one pooled `reqwest::Client`. Every failure is classified into
/// [`Error`] before it leaves this type; transport errors are never passed
/// through.
pub struct Client {
    http: reqwest::Client,
    /// Base URL every request path is appended to.
    base_api_url: String,
}

impl Client {
    /// Creates a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::from(e)
            })?;
        Ok(Self {
            http,
            base_api_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client with the default 30-second timeout. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(base_url, DEFAULT_TIMEOUT)
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    fn get_url(&self, request: &ApiRequest) -> Result<Url, Error> {
        let mut url = Url::parse(format!("{}{}", &self.base_api_url, request.path).as_str())
            .map_err(|e| {
                tracing::error!("Invalid URL constructed: {}", e);
                Error::InvalidUrl(e.to_string())
            })?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }

    /// Sends `request` and deserializes the JSON response body into `T`.
    pub async fn send<T>(&self, request: &ApiRequest) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let url = self.get_url(request)?;
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header("content-type", "application/json")
            .header("accept", "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| {
            tracing::error!("{} {} failed: {}", request.method, request.path, e);
            Error::from(e)
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::from(e)
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::debug!(
                "{} {} returned {}: {}",
                request.method,
                request.path,
                status,
                snippet
            );
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let parsed = serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::InvalidFormat(e.to_string())
        })?;

        tracing::debug!(
            "{} {} -> {} ({} bytes)",
            request.method,
            request.path,
            status.as_u16(),
            body.len()
        );
        Ok(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProductQuery;

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(1500);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
    }

    #[test]
    fn url_joins_base_path_and_query() {
        let client = Client::with_base_url("https://example.com/").unwrap();
        let req = ApiRequest::get("/products").with_query(
            &ProductQuery::default().with_sort_by(crate::ProductSortBy::Price),
        );
        let url = client.get_url(&req).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/products?sortBy=price&order=asc"
        );
    }
}
