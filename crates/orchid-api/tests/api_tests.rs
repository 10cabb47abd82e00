//! API integration tests
//!
//! The pool is created lazily and token checks run before any query, so
//! the authentication and authorization paths are testable without a
//! database. Tests marked #[ignore] need a real Postgres; run them with
//! `cargo test -- --ignored` against a test database.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use orchid_api::auth::jwt::{self, Claims, JwtConfig};
use orchid_api::{create_router, state::AppState};
use orchid_core::config::AppConfig;
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> axum::Router {
    let config = AppConfig::default();
    let pool = PgPool::connect_lazy(&config.database.url).expect("lazy pool");
    create_router(Arc::new(AppState::new(config, pool)))
}

fn test_jwt_config() -> JwtConfig {
    JwtConfig::from(&AppConfig::default().auth)
}

fn bearer_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Token whose exp is already in the past, signed with the right key
fn expired_token() -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    let config = test_jwt_config();
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: "user".to_string(),
        role: Some("ROLE_USER".to_string()),
        iat: now - 7200,
        exp: now - 3600,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .unwrap()
}

// =============================================================================
// Health and docs
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_openapi_spec_available() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert!(json["openapi"].is_string());
    assert!(json["paths"]["/api/accounts/login"].is_object());
}

// =============================================================================
// Authentication (401) - no database needed, rejection happens up front
// =============================================================================

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/orchids")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_protected_route_with_malformed_token() {
    let app = test_app();

    let response = app
        .oneshot(bearer_request("GET", "/api/orchids", "not.a.token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_wrong_auth_scheme() {
    let app = test_app();

    let request = Request::builder()
        .uri("/api/orchids")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_unauthenticated() {
    // Expired tokens get the same 401 as invalid ones, not a distinct error
    let app = test_app();

    let response = app
        .oneshot(bearer_request("GET", "/api/orchids", &expired_token()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_token_signed_with_other_key_rejected() {
    let app = test_app();
    let other = JwtConfig::new("a-different-secret", 10);
    let token = jwt::sign(&other, "admin", Some("ROLE_ADMIN")).unwrap();

    let response = app
        .oneshot(bearer_request("GET", "/api/orchids", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Authorization (403) - policy check precedes store access
// =============================================================================

#[tokio::test]
async fn test_user_token_denied_on_admin_operation() {
    let app = test_app();
    let token = jwt::sign(&test_jwt_config(), "user", Some("ROLE_USER")).unwrap();

    let response = app
        .oneshot(bearer_request("GET", "/api/accounts", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_admin_token_denied_on_user_only_operation() {
    // A valid admin token is still denied where only users may act
    let app = test_app();
    let token = jwt::sign(&test_jwt_config(), "admin", Some("ROLE_ADMIN")).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/orders")
                .header("Content-Type", "application/json")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::from(
                    serde_json::to_string(&json!({"price": "10.00", "quantity": 1})).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_without_role_denied_above_authenticated() {
    let app = test_app();
    let token = jwt::sign(&test_jwt_config(), "ghost", None).unwrap();

    let response = app
        .oneshot(bearer_request("GET", "/api/orchids", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_token_denied_on_role_administration() {
    let app = test_app();
    let token = jwt::sign(&test_jwt_config(), "user", Some("ROLE_USER")).unwrap();

    let response = app
        .oneshot(bearer_request("DELETE", "/api/roles/1", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// =============================================================================
// Database-backed flows
// =============================================================================

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_with_seeded_admin() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/accounts/login",
            json!({"username": "admin", "password": "@1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["token"].is_string());
    assert!(!json["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_invalid_credentials() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/accounts/login",
            json!({"username": "admin", "password": "wrong"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_then_login_round_trip() {
    let app = test_app();

    let register = json_request(
        "POST",
        "/api/accounts/register",
        json!({
            "accountName": "newuser",
            "email": "newuser@example.com",
            "password": "secret1"
        }),
    );
    let response = app.clone().oneshot(register).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["accountName"], "newuser");
    assert_eq!(json["roleName"], "ROLE_USER");

    let login = json_request(
        "POST",
        "/api/accounts/login",
        json!({"username": "newuser", "password": "secret1"}),
    );
    let response = app.oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_duplicate_name_rejected() {
    let app = test_app();

    let body = json!({
        "accountName": "dupe",
        "email": "dupe@example.com",
        "password": "secret1"
    });
    app.clone()
        .oneshot(json_request("POST", "/api/accounts/register", body.clone()))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request("POST", "/api/accounts/register", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_admin_category_crud() {
    let app = test_app();
    let token = jwt::sign(&test_jwt_config(), "admin", Some("ROLE_ADMIN")).unwrap();

    let create = Request::builder()
        .method("POST")
        .uri("/api/categories")
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(
            serde_json::to_string(&json!({"categoryName": "Dendrobium"})).unwrap(),
        ))
        .unwrap();

    let response = app.clone().oneshot(create).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let created: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(created["categoryName"], "Dendrobium");
    assert_eq!(created["status"], "ACTIVE");

    let id = created["categoryId"].as_i64().unwrap();
    let delete = bearer_request("DELETE", &format!("/api/categories/{id}"), &token);
    let response = app.oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_user_order_flow() {
    let app = test_app();
    let admin = jwt::sign(&test_jwt_config(), "admin", Some("ROLE_ADMIN")).unwrap();
    let user = jwt::sign(&test_jwt_config(), "user", Some("ROLE_USER")).unwrap();

    // Admin lists an orchid for the user to order
    let create_orchid = Request::builder()
        .method("POST")
        .uri("/api/orchids")
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {admin}"))
        .body(Body::from(
            serde_json::to_string(&json!({
                "orchidName": "Vanda coerulea",
                "orchidDescription": "Blue vanda",
                "price": "45.00",
                "isNatural": true
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.clone().oneshot(create_orchid).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let orchid: Value = serde_json::from_slice(&body).unwrap();
    let orchid_id = orchid["orchidId"].as_i64().unwrap();

    // User places an order for two of them
    let place = Request::builder()
        .method("POST")
        .uri("/api/orders")
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {user}"))
        .body(Body::from(
            serde_json::to_string(&json!({
                "orchidId": orchid_id,
                "price": "45.00",
                "quantity": 2
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.clone().oneshot(place).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let order: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(order["accountUsername"], "user");
    assert_eq!(order["totalAmount"], "90.00");
    assert_eq!(order["orderDetails"].as_array().unwrap().len(), 1);

    // The order shows up under /my for its owner
    let response = app
        .clone()
        .oneshot(bearer_request("GET", "/api/orders/my", &user))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Another user's view of it is a 404
    let other = jwt::sign(&test_jwt_config(), "someone-else", Some("ROLE_USER")).unwrap();
    let order_id = order["orderId"].as_i64().unwrap();
    let response = app
        .oneshot(bearer_request(
            "GET",
            &format!("/api/orders/{order_id}"),
            &other,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
