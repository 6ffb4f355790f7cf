use std::sync::Arc;
use std::time::Duration;

use dashboard_lib::dashboard_api::request::endpoints;
use dashboard_lib::signing::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use dashboard_lib::storage::{AUTH_TOKEN_KEY, CLIENT_ID_KEY};
use dashboard_lib::types::NewProduct;
use dashboard_lib::{
    DashboardError, KeyValueStore, MemoryStore, ProcurementQuery, ProductQuery, Query,
    RateLimiter, RequestSigner, RetryConfig, SecureClient, SessionEvent,
};
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn products_fixture() -> String {
    include_str!("../../dashboard_api/tests/fixtures/products.json").to_string()
}

fn procurement_fixture() -> String {
    include_str!("../../dashboard_api/tests/fixtures/procurement.json").to_string()
}

fn store_with_id() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.set(CLIENT_ID_KEY, "test-client").unwrap();
    store
}

fn client(server: &MockServer, store: Arc<MemoryStore>) -> SecureClient {
    SecureClient::builder(&server.uri())
        .store(store)
        .retry(RetryConfig::disabled())
        .build()
        .unwrap()
}

fn api_status(err: &DashboardError) -> Option<u16> {
    match err {
        DashboardError::Api(e) => e.status(),
        _ => None,
    }
}

// ============================================================================
// Request decoration
// ============================================================================

#[tokio::test]
async fn attaches_identity_auth_and_signature_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(header("X-Client-Id", "test-client"))
        .and(header("Authorization", "Bearer tok-123"))
        .and(header("X-Api-Key", "key-1"))
        .and(header_exists(SIGNATURE_HEADER))
        .and(header_exists(TIMESTAMP_HEADER))
        .respond_with(ResponseTemplate::new(200).set_body_string(products_fixture()))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with_id();
    store.set(AUTH_TOKEN_KEY, "tok-123").unwrap();
    let client = SecureClient::builder(&server.uri())
        .store(store)
        .api_key("key-1")
        .signing_secret("s3cret")
        .retry(RetryConfig::disabled())
        .build()
        .unwrap();

    let query = ProductQuery::default().with_limit(3);
    let resp = client.get_products(&query).await.unwrap();
    assert_eq!(resp.products.len(), 3);

    let received = server.received_requests().await.unwrap();
    let req = &received[0];
    let signature = req.headers.get(SIGNATURE_HEADER).unwrap().to_str().unwrap();
    let timestamp: i64 = req
        .headers
        .get(TIMESTAMP_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    let expected = endpoints::products(&query);
    assert!(RequestSigner::new("s3cret").verify(&expected, timestamp, signature));
}

#[tokio::test]
async fn omits_optional_headers_when_unconfigured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let client = client(&server, store_with_id());
    assert!(!client.is_authenticated());
    client.get_categories().await.unwrap();

    let received = server.received_requests().await.unwrap();
    let headers = &received[0].headers;
    assert!(headers.get("authorization").is_none());
    assert!(headers.get("x-api-key").is_none());
    assert!(headers.get(SIGNATURE_HEADER).is_none());
    assert_eq!(headers.get("x-client-id").unwrap().to_str().unwrap(), "test-client");
}

#[tokio::test]
async fn generates_and_persists_client_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/categories"))
        .and(header_exists("X-Client-Id"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let client = client(&server, store.clone());
    client.get_categories().await.unwrap();

    let id = store.get(CLIENT_ID_KEY).unwrap();
    assert!(!id.is_empty());
    assert_eq!(client.client_id().unwrap(), id);
}

// ============================================================================
// Error handling
// ============================================================================

#[tokio::test]
async fn unauthorized_clears_token_and_notifies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"message\":\"expired\"}"))
        .mount(&server)
        .await;

    let store = store_with_id();
    store.set(AUTH_TOKEN_KEY, "stale").unwrap();
    let client = client(&server, store.clone());
    let mut events = client.subscribe();

    let err = client.get_product(1).await.unwrap_err();
    assert_eq!(api_status(&err), Some(401));
    assert_eq!(store.get(AUTH_TOKEN_KEY), None);
    assert!(!client.is_authenticated());
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Unauthorized);
}

#[tokio::test]
async fn server_error_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client(&server, store_with_id());
    let err = client.get_product(1).await.unwrap_err();
    let info = err.to_info();
    assert_eq!(info.http_status, Some(503));
    assert!(info.is_server_error());
    assert!(!info.is_network_error());
    assert_eq!(info.message, "Server error - please try again later");
}

#[tokio::test]
async fn malformed_body_is_format_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = client(&server, store_with_id());
    let err = client.get_product(1).await.unwrap_err();
    assert!(matches!(
        err,
        DashboardError::Api(dashboard_lib::dashboard_api::Error::InvalidFormat(_))
    ));
}

// ============================================================================
// Rate limiting
// ============================================================================

#[tokio::test]
async fn local_rate_limit_blocks_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(2)
        .mount(&server)
        .await;

    let limiter = Arc::new(RateLimiter::new(2, Duration::from_secs(3600)));
    let client = SecureClient::builder(&server.uri())
        .store(store_with_id())
        .rate_limiter(limiter.clone())
        .retry(RetryConfig::new(3, 1, 5))
        .build()
        .unwrap();

    client.get_categories().await.unwrap();
    client.get_categories().await.unwrap();
    let err = client.get_categories().await.unwrap_err();

    assert!(matches!(err, DashboardError::RateLimited { .. }));
    assert!(err.to_info().is_rate_limited());
    assert_eq!(client.remaining_requests().unwrap(), Some(0));
    assert!(client.rate_limit_reset().unwrap().is_some());
    assert_eq!(limiter.stats().rejected, 1);
}

#[tokio::test]
async fn rate_limit_status_is_none_when_disabled() {
    let server = MockServer::start().await;
    let client = client(&server, store_with_id());
    assert_eq!(client.remaining_requests().unwrap(), None);
    assert_eq!(client.rate_limit_reset().unwrap(), None);
}

// ============================================================================
// Retries
// ============================================================================

#[tokio::test]
async fn retries_server_errors_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/categories"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let client = SecureClient::builder(&server.uri())
        .store(store_with_id())
        .retry(RetryConfig::new(3, 1, 5))
        .build()
        .unwrap();

    let categories = client.get_categories().await.unwrap();
    assert!(categories.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn retries_do_not_spend_rate_limit_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/categories"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let limiter = Arc::new(RateLimiter::new(1, Duration::from_secs(3600)));
    let client = SecureClient::builder(&server.uri())
        .store(store_with_id())
        .rate_limiter(limiter.clone())
        .retry(RetryConfig::new(3, 1, 5))
        .build()
        .unwrap();

    client.get_categories().await.unwrap();
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
    assert_eq!(limiter.stats().allowed, 1);
    assert_eq!(limiter.stats().rejected, 0);
    assert_eq!(client.remaining_requests().unwrap(), Some(0));
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/999"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = SecureClient::builder(&server.uri())
        .store(store_with_id())
        .retry(RetryConfig::new(3, 1, 5))
        .build()
        .unwrap();

    let err = client.get_product(999).await.unwrap_err();
    assert_eq!(api_status(&err), Some(404));
}

// ============================================================================
// Typed endpoints
// ============================================================================

#[tokio::test]
async fn search_routes_with_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "phone"))
        .respond_with(ResponseTemplate::new(200).set_body_string(products_fixture()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, store_with_id());
    let resp = client
        .get_products(&ProductQuery::default().with_search("phone"))
        .await
        .unwrap();
    assert_eq!(resp.total, 194);
}

#[tokio::test]
async fn procurement_lookup_by_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/api/json/RUP-PaketPenyedia-Terumumkan/tipe/4:12/parameter/2025:D112",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(procurement_fixture()))
        .mount(&server)
        .await;

    let client = client(&server, store_with_id());
    let query = ProcurementQuery::default();

    let all = client.get_procurement(&query, "/api/json").await.unwrap();
    assert_eq!(all.len(), 3);

    let found = client
        .find_procurement("50321902", &query, "/api/json")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.package_name, "Renovasi Puskesmas");

    let missing = client
        .find_procurement("00000000", &query, "/api/json")
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn create_product_rejects_blank_title_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server, store_with_id());
    let err = client
        .create_product(&NewProduct {
            title: "  ".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::InvalidInput(_)));
}
