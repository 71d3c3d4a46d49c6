use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;
use wholesale_marketplace_api::{
    app::build_app,
    config::AppConfig,
    models::Role,
    services::auth_service::issue_token,
    state::AppState,
};

// Every request here must be decided before a query runs: the database handle is disconnected.
fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        jwt_ttl_hours: 1,
        cors_origins: Vec::new(),
        max_body_bytes: 64 * 1024,
        concurrency_limit: 16,
        db_max_connections: 1,
        run_migrations: false,
    }
}

fn app() -> Router {
    build_app(AppState::new(DatabaseConnection::Disconnected, test_config()))
}

fn token_for(role: Role) -> String {
    let (token, _) = issue_token(&test_config(), Uuid::new_v4(), role).expect("token");
    token
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

async fn send(req: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(req).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_is_public() {
    let (status, body) = send(request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let (status, body) = send(request("GET", "/api/nope", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/api/nope");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let id = Uuid::new_v4();
    let cases = [
        ("GET", "/api/auth/me".to_string()),
        ("GET", "/api/admin/suppliers".to_string()),
        ("PATCH", format!("/api/admin/suppliers/{id}/approve")),
        ("GET", "/api/favourites".to_string()),
        ("DELETE", format!("/api/favourites/{id}")),
        ("GET", "/api/quote-requests".to_string()),
        ("GET", "/api/quote-requests/received".to_string()),
        ("GET", "/api/suppliers/me".to_string()),
        ("POST", "/api/products".to_string()),
        ("DELETE", format!("/api/products/{id}")),
    ];

    for (method, uri) in cases {
        let (status, body) = send(request(method, &uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert!(
            body["message"]
                .as_str()
                .is_some_and(|m| m.contains("Authentication required")),
            "{method} {uri}: {body}"
        );
    }
}

#[tokio::test]
async fn invalid_token_is_rejected() {
    let (status, _) = send(request("GET", "/api/favourites", Some("not-a-jwt"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let mut other = test_config();
    other.jwt_secret = "someone-else".into();
    let (token, _) = issue_token(&other, Uuid::new_v4(), Role::Admin).expect("token");

    let (status, _) = send(request("GET", "/api/admin/suppliers", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_refuse_buyers_and_sellers() {
    let id = Uuid::new_v4();
    for role in [Role::Buyer, Role::Seller] {
        let token = token_for(role);
        for (method, uri) in [
            ("GET", "/api/admin/suppliers".to_string()),
            ("GET", format!("/api/admin/suppliers/{id}")),
            ("PATCH", format!("/api/admin/suppliers/{id}/approve")),
            ("PATCH", format!("/api/admin/suppliers/{id}/block")),
        ] {
            let (status, _) = send(request(method, &uri, Some(&token), None)).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{role} {method} {uri}");
        }
    }
}

#[tokio::test]
async fn listing_management_is_seller_only() {
    let id = Uuid::new_v4();
    for role in [Role::Buyer, Role::Admin] {
        let token = token_for(role);
        for (method, uri) in [
            ("POST", "/api/products".to_string()),
            ("PUT", format!("/api/products/{id}")),
            ("DELETE", format!("/api/products/{id}")),
            ("GET", "/api/suppliers/me".to_string()),
            ("GET", "/api/quote-requests/received".to_string()),
            ("PATCH", format!("/api/quote-requests/{id}")),
        ] {
            let (status, _) = send(request(method, &uri, Some(&token), None)).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{role} {method} {uri}");
        }
    }
}

#[tokio::test]
async fn register_reports_field_errors() {
    let payload = json!({
        "fullname": "",
        "email": "not-an-email",
        "phone": "98",
        "password": "123",
    });
    let (status, body) = send(request("POST", "/api/auth/register", None, Some(payload))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let fields = &body["data"]["fields"];
    for field in ["fullname", "email", "phone", "password"] {
        assert!(fields.get(field).is_some(), "missing {field} in {body}");
    }
}

#[tokio::test]
async fn admin_accounts_cannot_be_self_registered() {
    let payload = json!({
        "fullname": "Mallory",
        "email": "mallory@example.com",
        "phone": "9800000099",
        "password": "secret123",
        "role": "admin",
    });
    let (status, _) = send(request("POST", "/api/auth/register", None, Some(payload))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let (status, _) = send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn catalog_rejects_bad_filters() {
    let (status, body) = send(request("GET", "/api/products?sort=cheapest", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].as_str().is_some_and(|e| e.contains("sort")), "{body}");
    assert!(body["meta"].is_object(), "{body}");

    let (status, body) = send(request("GET", "/api/products?page=abc", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string(), "{body}");

    let (status, body) = send(request(
        "GET",
        "/api/products?minPrice=300&maxPrice=200",
        None,
        None,
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().is_some_and(|m| m.contains("minPrice")));
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let payload = json!({ "email": "a@example.com", "password": "x".repeat(128 * 1024) }).to_string();
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .expect("request");
    let response = app().oneshot(req).await.expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn malformed_path_ids_use_the_error_envelope() {
    let (status, body) = send(request("GET", "/api/products/not-a-uuid", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].is_string(), "{body}");

    let token = token_for(Role::Admin);
    let (status, body) = send(request(
        "PATCH",
        "/api/admin/suppliers/42/approve",
        Some(&token),
        None,
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].is_string(), "{body}");
}

#[tokio::test]
async fn favourite_body_errors_use_the_error_envelope() {
    let token = token_for(Role::Buyer);
    let payload = json!({ "product_id": "nope" });
    let (status, body) = send(request("POST", "/api/favourites", Some(&token), Some(payload))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].is_string(), "{body}");

    let (status, body) = send(request(
        "GET",
        "/api/quote-requests?status=archived",
        Some(&token),
        None,
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].is_string(), "{body}");
}
