use dashboard_api::request::endpoints;
use dashboard_api::types::{
    Category, DeletedProduct, NewProduct, ProcurementPackage, Product, ProductUpdate,
    ProductsResponse,
};
use dashboard_api::{Client, Error, ProcurementQuery, ProductQuery, Query};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn get_products_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("products.json");

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client
        .send::<ProductsResponse>(&endpoints::products(&ProductQuery::default()))
        .await;
    assert!(result.is_ok());

    let resp = result.unwrap();
    assert_eq!(resp.products.len(), 3);
    assert_eq!(resp.total, 194);
    assert_eq!(resp.products[0].title, "Essence Mascara Lash Princess");
}

#[tokio::test]
async fn search_routes_to_search_endpoint() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("products.json");

    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "phone"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let query = ProductQuery::default().with_search("phone").with_limit(10);
    assert!(client
        .send::<ProductsResponse>(&endpoints::products(&query))
        .await
        .is_ok());
}

#[tokio::test]
async fn get_products_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client
        .send::<ProductsResponse>(&endpoints::products(&ProductQuery::default()))
        .await;
    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected HttpStatus, got {:?}", other.map(|r| r.total)),
    }
}

#[tokio::test]
async fn get_product_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/9999"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"missing"}"#))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let err = client
        .send::<Product>(&endpoints::product(9999))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Resource not found - check URL configuration");
}

#[tokio::test]
async fn get_products_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client
        .send::<ProductsResponse>(&endpoints::products(&ProductQuery::default()))
        .await;
    assert!(matches!(result, Err(Error::InvalidFormat(_))));
}

#[tokio::test]
async fn procurement_requires_array_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rup/RUP-PaketPenyedia-Terumumkan/tipe/4:12/parameter/2025:D112"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":[]}"#))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client
        .send::<Vec<ProcurementPackage>>(&endpoints::procurement(
            &ProcurementQuery::default(),
            "/rup",
        ))
        .await;
    assert!(matches!(result, Err(Error::InvalidFormat(_))));
}

#[tokio::test]
async fn get_procurement_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("procurement.json");

    Mock::given(method("GET"))
        .and(path("/rup/RUP-PaketPenyedia-Terumumkan/tipe/4:12/parameter/2024:D200"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let query = ProcurementQuery::default().with_year(2024).with_work_unit("D200");
    let packages: Vec<ProcurementPackage> = client
        .send(&endpoints::procurement(&query, "/rup/"))
        .await
        .unwrap();
    assert_eq!(packages.len(), 3);
    assert_eq!(packages[1].package_name, "Renovasi Puskesmas");
}

#[tokio::test]
async fn create_product_posts_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/products/add"))
        .and(body_json(serde_json::json!({
            "title": "Desk Lamp",
            "description": "LED lamp",
            "category": "home-decoration",
            "price": 24.5,
            "stock": 10,
            "brand": "Lumo"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 195,
            "title": "Desk Lamp",
            "description": "LED lamp",
            "category": "home-decoration",
            "price": 24.5,
            "stock": 10,
            "brand": "Lumo"
        })))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let request = endpoints::create_product(&NewProduct {
        title: "Desk Lamp".to_string(),
        description: "LED lamp".to_string(),
        category: "home-decoration".to_string(),
        price: 24.5,
        stock: 10,
        brand: "Lumo".to_string(),
        ..Default::default()
    })
    .unwrap();
    let created: Product = client.send(&request).await.unwrap();
    assert_eq!(created.id, 195);
    assert_eq!(created.brand.as_deref(), Some("Lumo"));
}

#[tokio::test]
async fn update_and_delete_product() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/products/1"))
        .and(body_json(serde_json::json!({ "price": 12.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1, "title": "Essence Mascara Lash Princess", "category": "beauty", "price": 12.0
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/products/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1, "title": "Essence Mascara Lash Princess",
            "isDeleted": true, "deletedOn": "2025-01-01T00:00:00.000Z"
        })))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let update = ProductUpdate {
        price: Some(12.0),
        ..Default::default()
    };
    let updated: Product = client
        .send(&endpoints::update_product(1, &update).unwrap())
        .await
        .unwrap();
    assert_eq!(updated.price, 12.0);

    let deleted: DeletedProduct = client
        .send(&endpoints::delete_product(1))
        .await
        .unwrap();
    assert!(deleted.is_deleted);
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    // Nothing listens on port 9 on a test host.
    let client = Client::with_base_url("http://127.0.0.1:9").unwrap();
    let err = client
        .send::<Vec<Category>>(&endpoints::categories())
        .await
        .unwrap_err();
    assert!(err.transport_code().is_some());
    assert_eq!(err.status(), None);
}
