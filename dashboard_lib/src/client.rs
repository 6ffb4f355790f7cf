//! Policy wrapper around the API client: auth, client identification,
//! signing, rate limiting, error handling and retries.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashboard_api::request::endpoints;
use dashboard_api::types::{
    Category, DeletedProduct, NewProduct, ProcurementPackage, Product, ProductID, ProductUpdate,
    ProductsResponse,
};
use dashboard_api::{ApiRequest, Client, ProcurementQuery, ProductQuery};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::config::{env_u64, env_usize, ApiConfig, Environment};
use crate::error::DashboardError;
use crate::fingerprint;
use crate::rate_limiter::RateLimiter;
use crate::signing::RequestSigner;
use crate::storage::{KeyValueStore, AUTH_TOKEN_KEY};

pub const CLIENT_ID_HEADER: &str = "X-Client-Id";
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Process-wide session notifications emitted by [`SecureClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The server rejected the stored credentials; the token was cleared.
    Unauthorized,
}

/// Backoff policy for transient failures (network errors, 429, 5xx).
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryConfig {
    pub fn new(max_retries: usize, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms,
        }
    }

    /// Reads `DASHBOARD_RETRY_MAX`, `DASHBOARD_RETRY_BASE_MS` and `DASHBOARD_RETRY_MAX_MS`.
    pub fn from_env() -> Self {
        Self {
            max_retries: env_usize("DASHBOARD_RETRY_MAX", 3),
            base_delay_ms: env_u64("DASHBOARD_RETRY_BASE_MS", 500),
            max_delay_ms: env_u64("DASHBOARD_RETRY_MAX_MS", 10_000),
        }
    }

    /// Never retry.
    pub fn disabled() -> Self {
        Self::new(0, 0, 0)
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

/// API façade shared by every fetch in the application.
///
/// Every request is stamped with the client identifier, the bearer token
/// (when one is stored), the API key and, when a secret is configured, an
/// HMAC signature. With a rate limiter attached, requests over budget fail
/// locally with [`DashboardError::RateLimited`] and never reach the network.
/// A 401 clears the stored token and broadcasts [`SessionEvent::Unauthorized`].
pub struct SecureClient {
    inner: Client,
    store: Arc<dyn KeyValueStore>,
    rate_limiter: Option<Arc<RateLimiter>>,
    signer: Option<RequestSigner>,
    api_key: Option<String>,
    environment: Environment,
    retry: RetryConfig,
    events: broadcast::Sender<SessionEvent>,
}

/// Builder for [`SecureClient`].
pub struct SecureClientBuilder {
    base_url: String,
    timeout: Duration,
    store: Arc<dyn KeyValueStore>,
    rate_limiter: Option<Arc<RateLimiter>>,
    signer: Option<RequestSigner>,
    api_key: Option<String>,
    environment: Environment,
    retry: Option<RetryConfig>,
}

impl SecureClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = store;
        self
    }

    pub fn rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    pub fn signing_secret(mut self, secret: &str) -> Self {
        self.signer = Some(RequestSigner::new(secret));
        self
    }

    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn build(self) -> Result<SecureClient, DashboardError> {
        let inner = Client::new(&self.base_url, self.timeout)?;
        let (events, _) = broadcast::channel(16);
        Ok(SecureClient {
            inner,
            store: self.store,
            rate_limiter: self.rate_limiter,
            signer: self.signer,
            api_key: self.api_key,
            environment: self.environment,
            retry: self.retry.unwrap_or_else(RetryConfig::from_env),
            events,
        })
    }
}

impl SecureClient {
    /// Starts a builder for `base_url` with an in-memory store, no rate
    /// limiter and no signing.
    pub fn builder(base_url: &str) -> SecureClientBuilder {
        SecureClientBuilder {
            base_url: base_url.to_string(),
            timeout: dashboard_api::DEFAULT_TIMEOUT,
            store: Arc::new(crate::storage::MemoryStore::new()),
            rate_limiter: None,
            signer: None,
            api_key: None,
            environment: Environment::default(),
            retry: None,
        }
    }

    /// Builds a client for `base_url` from validated configuration. The
    /// limiter is attached only when rate limiting is enabled.
    pub fn from_config(
        base_url: &str,
        config: &ApiConfig,
        store: Arc<dyn KeyValueStore>,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, DashboardError> {
        let mut builder = Self::builder(base_url)
            .timeout(config.timeout)
            .store(store)
            .environment(config.environment);
        if config.enable_rate_limit {
            builder = builder.rate_limiter(limiter);
        }
        if let Some(secret) = &config.api_secret {
            builder = builder.signing_secret(secret);
        }
        if let Some(key) = &config.api_key {
            builder = builder.api_key(key);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    /// Subscribes to session events such as [`SessionEvent::Unauthorized`].
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// The persisted client identifier, generated on first use.
    pub fn client_id(&self) -> Result<String, DashboardError> {
        fingerprint::client_id(self.store.as_ref())
    }

    pub fn set_auth_token(&self, token: &str) -> Result<(), DashboardError> {
        self.store.set(AUTH_TOKEN_KEY, token)
    }

    pub fn clear_auth_token(&self) -> Result<(), DashboardError> {
        self.store.remove(AUTH_TOKEN_KEY)
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.get(AUTH_TOKEN_KEY).is_some()
    }

    /// Requests left in this client's rate-limit window, or `None` when
    /// rate limiting is disabled.
    pub fn remaining_requests(&self) -> Result<Option<u64>, DashboardError> {
        match &self.rate_limiter {
            Some(limiter) => Ok(Some(limiter.remaining(&self.client_id()?))),
            None => Ok(None),
        }
    }

    /// Time until this client's rate-limit window resets.
    pub fn rate_limit_reset(&self) -> Result<Option<Duration>, DashboardError> {
        match &self.rate_limiter {
            Some(limiter) => Ok(limiter.reset_in(&self.client_id()?)),
            None => Ok(None),
        }
    }

    pub fn rate_limiter(&self) -> Option<&Arc<RateLimiter>> {
        self.rate_limiter.as_ref()
    }

    /// Spends one unit of the local rate-limit budget for a logical call and
    /// returns the client identifier it was charged to.
    fn admit(&self, request: &ApiRequest) -> Result<String, DashboardError> {
        let client_id = self.client_id()?;
        if let Some(limiter) = &self.rate_limiter {
            if let Err(err) = limiter.try_acquire(&client_id) {
                tracing::warn!(
                    "Rate limit exceeded for client {} ({} {})",
                    client_id,
                    request.method,
                    request.path
                );
                return Err(err);
            }
        }
        Ok(client_id)
    }

    /// Attaches identification, auth and signature headers. Runs once per
    /// attempt so retries carry a fresh signature timestamp.
    fn prepare(
        &self,
        request: ApiRequest,
        client_id: &str,
    ) -> Result<ApiRequest, DashboardError> {
        let mut request = request.with_header(CLIENT_ID_HEADER, client_id);
        if let Some(key) = &self.api_key {
            request = request.with_header(API_KEY_HEADER, key);
        }
        if let Some(token) = self.store.get(AUTH_TOKEN_KEY) {
            request = request.with_header("Authorization", &format!("Bearer {}", token));
        }
        if let Some(signer) = &self.signer {
            request = signer.sign(request, Utc::now().timestamp_millis())?;
        }
        Ok(request)
    }

    fn handle_failure(&self, err: &dashboard_api::Error, request: &ApiRequest) {
        match err.status() {
            Some(401) => {
                tracing::warn!("Unauthorized response; clearing stored auth token");
                if let Err(e) = self.clear_auth_token() {
                    tracing::error!("Failed to clear auth token: {}", e);
                }
                // No subscribers is fine.
                let _ = self.events.send(SessionEvent::Unauthorized);
            }
            Some(429) => tracing::warn!("Server rate limit exceeded"),
            Some(status) if status >= 500 => tracing::error!("Server error: {}", status),
            _ => {}
        }
        if self.environment == Environment::Development {
            tracing::debug!(
                status = ?err.status(),
                "{} {} failed: {}",
                request.method,
                request.path,
                err
            );
        }
    }

    async fn attempt<T>(&self, request: ApiRequest, client_id: &str) -> Result<T, DashboardError>
    where
        T: DeserializeOwned,
    {
        let prepared = self.prepare(request, client_id)?;
        match self.inner.send::<T>(&prepared).await {
            Ok(value) => {
                if self.environment == Environment::Development {
                    tracing::debug!("{} {} ok", prepared.method, prepared.path_and_query());
                }
                Ok(value)
            }
            Err(err) => {
                self.handle_failure(&err, &prepared);
                Err(err.into())
            }
        }
    }

    async fn with_retry<T, F, Fut>(&self, label: &str, mut f: F) -> Result<T, DashboardError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, DashboardError>>,
    {
        let mut attempt = 0usize;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !is_retryable(&err) {
                        return Err(err);
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s",
                        label,
                        attempt,
                        self.retry.max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Sends `request` through the full policy chain. A logical call is
    /// charged against the local rate limit once, however many retries it
    /// takes.
    pub async fn execute<T>(&self, request: ApiRequest) -> Result<T, DashboardError>
    where
        T: DeserializeOwned,
    {
        let client_id = self.admit(&request)?;
        let label = format!("{} {}", request.method, request.path);
        self.with_retry(&label, || {
            let request = request.clone();
            let client_id = client_id.as_str();
            async move { self.attempt::<T>(request, client_id).await }
        })
        .await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DashboardError> {
        self.execute(ApiRequest::get(path)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DashboardError> {
        self.execute(ApiRequest::post(path, body)?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DashboardError> {
        self.execute(ApiRequest::put(path, body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, DashboardError> {
        self.execute(ApiRequest::delete(path)).await
    }

    /// Fetches a page of catalog products.
    pub async fn get_products(
        &self,
        query: &ProductQuery,
    ) -> Result<ProductsResponse, DashboardError> {
        self.execute(endpoints::products(query)).await
    }

    pub async fn get_product(&self, id: ProductID) -> Result<Product, DashboardError> {
        self.execute(endpoints::product(id)).await
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>, DashboardError> {
        self.execute(endpoints::categories()).await
    }

    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, DashboardError> {
        if product.title.trim().is_empty() {
            return Err(DashboardError::InvalidInput(
                "product title is required".to_string(),
            ));
        }
        self.execute(endpoints::create_product(product)?).await
    }

    pub async fn update_product(
        &self,
        id: ProductID,
        update: &ProductUpdate,
    ) -> Result<Product, DashboardError> {
        if update.is_empty() {
            return Err(DashboardError::InvalidInput(
                "update contains no fields".to_string(),
            ));
        }
        self.execute(endpoints::update_product(id, update)?).await
    }

    pub async fn delete_product(&self, id: ProductID) -> Result<DeletedProduct, DashboardError> {
        self.execute(endpoints::delete_product(id)).await
    }

    /// Fetches procurement packages. The response must be a JSON array.
    pub async fn get_procurement(
        &self,
        query: &ProcurementQuery,
        base_path: &str,
    ) -> Result<Vec<ProcurementPackage>, DashboardError> {
        self.execute(endpoints::procurement(query, base_path)).await
    }

    /// Looks up a single package by its code within the query's dataset.
    pub async fn find_procurement(
        &self,
        code: &str,
        query: &ProcurementQuery,
        base_path: &str,
    ) -> Result<Option<ProcurementPackage>, DashboardError> {
        let packages = self.get_procurement(query, base_path).await?;
        Ok(packages.into_iter().find(|p| p.code == code))
    }
}

fn is_retryable(err: &DashboardError) -> bool {
    match err {
        DashboardError::Api(api_err) => match api_err {
            dashboard_api::Error::Network { .. } | dashboard_api::Error::Timeout => true,
            dashboard_api::Error::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_delay_is_capped() {
        let cfg = RetryConfig::new(5, 1000, 3000);
        let d = cfg.delay_for_attempt(10);
        assert!(d <= Duration::from_millis(3600));
        assert!(d >= Duration::from_millis(2400));
    }

    #[test]
    fn retryable_classification() {
        assert!(is_retryable(&DashboardError::Api(dashboard_api::Error::Timeout)));
        assert!(is_retryable(&DashboardError::Api(
            dashboard_api::Error::HttpStatus {
                status: 503,
                body: String::new()
            }
        )));
        assert!(!is_retryable(&DashboardError::Api(
            dashboard_api::Error::HttpStatus {
                status: 404,
                body: String::new()
            }
        )));
        assert!(!is_retryable(&DashboardError::RateLimited {
            reset_in: Duration::from_secs(1)
        }));
        assert!(!is_retryable(&DashboardError::Api(
            dashboard_api::Error::InvalidFormat("x".to_string())
        )));
    }
}
