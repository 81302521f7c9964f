//! Integration tests for API endpoints.
//!
//! The router runs on real services backed by in-memory repositories, so
//! these tests need neither a database nor Redis.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use boat_rental::api::{create_router, AppState};
use boat_rental::config::Config;
use boat_rental::domain::{Credential, CredentialManager, UserType};
use boat_rental::errors::{AppError, AppResult};
use boat_rental::infra::{HealthCheck, RateLimitStore};
use boat_rental::services::{
    Authenticator, BoatManager, GeographyLookup, Services, UserManager,
};

use common::InMemory;

const SECRET: &str = "test-secret-key-for-testing-only-32chars";
const BOUNDARY: &str = "boat-rental-test-boundary";

// =============================================================================
// Fakes
// =============================================================================

struct Counter {
    allow: bool,
}

#[async_trait]
impl RateLimitStore for Counter {
    async fn check_rate_limit(&self, _: &str, max: u64, _: u64) -> AppResult<(u64, bool)> {
        Ok(if self.allow { (1, true) } else { (max + 1, false) })
    }
}

struct Probe {
    up: bool,
}

#[async_trait]
impl HealthCheck for Probe {
    async fn ping(&self) -> AppResult<()> {
        if self.up {
            Ok(())
        } else {
            Err(AppError::internal("connection refused"))
        }
    }
}

struct TestApp {
    router: Router,
    store: InMemory,
    district_id: Uuid,
}

fn app_with(store: InMemory, allow: bool, cache_up: bool) -> Router {
    let uow = Arc::new(store);
    let services = Services::new(
        Arc::new(Authenticator::new(
            uow.clone(),
            CredentialManager::default(),
            Config::with_jwt_secret(SECRET),
        )),
        Arc::new(UserManager::new(uow.clone())),
        Arc::new(BoatManager::new(uow.clone())),
        Arc::new(GeographyLookup::new(uow)),
    );

    create_router(AppState::new(
        Arc::new(services),
        Arc::new(Counter { allow }),
        Arc::new(Probe { up: true }),
        Arc::new(Probe { up: cache_up }),
        1024 * 1024,
    ))
}

fn test_app() -> TestApp {
    let store = InMemory::new();
    let district_id = store.seed_location();
    TestApp {
        router: app_with(store.clone(), true, true),
        store,
        district_id,
    }
}

// =============================================================================
// Helpers
// =============================================================================

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

enum Part<'a> {
    Text(&'a str, String),
    File(&'a str, &'a str, &'a str, &'a [u8]),
}

fn multipart_request(method: Method, uri: &str, token: &str, parts: &[Part]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n", name, value)
                        .as_bytes(),
                );
            }
            Part::File(name, filename, content_type, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, filename, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body))
        .unwrap()
}

fn listing_parts(district_id: Uuid) -> Vec<Part<'static>> {
    vec![
        Part::Text("name", "Blue Horizon".to_string()),
        Part::Text("description", "Gulet with six cabins".to_string()),
        Part::Text("price_per_hour", "450".to_string()),
        Part::Text("capacity", "12".to_string()),
        Part::Text("available_from", "2025-06-01T09:00:00Z".to_string()),
        Part::Text("available_to", "2025-09-30T18:00:00Z".to_string()),
        Part::Text("district_id", district_id.to_string()),
    ]
}

/// Registers `email` through the API and returns `(user_id, token)`.
async fn sign_up(router: &Router, email: &str) -> (Uuid, String) {
    let (status, body) = send(
        router,
        json_request(
            Method::POST,
            "/auth/register",
            None,
            json!({
                "email": email,
                "name": "Deniz Kaptan",
                "password": "SecurePass123!",
                "confirm_password": "SecurePass123!"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (status, body) = send(
        router,
        json_request(
            Method::POST,
            "/auth/login",
            None,
            json!({ "email": email, "password": "SecurePass123!" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let id = body["user"]["id"].as_str().unwrap().parse().unwrap();
    let token = body["access_token"].as_str().unwrap().to_string();
    (id, token)
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_reports_each_dependency() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let degraded = app_with(InMemory::new(), true, false);
    let (status, body) = send(&degraded, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["services"]["redis"]["status"], "unhealthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
}

// =============================================================================
// Auth & users
// =============================================================================

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        Request::get("/users/me").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_register_validation_error_body() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        json_request(
            Method::POST,
            "/auth/register",
            None,
            json!({
                "email": "not-an-email",
                "name": "Deniz",
                "password": "SecurePass123!",
                "confirm_password": "SecurePass123!"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_wrong_current_password_is_unauthorized() {
    let app = test_app();
    let (user_id, token) = sign_up(&app.router, "captain@example.com").await;

    let (status, body) = send(
        &app.router,
        json_request(
            Method::PUT,
            &format!("/users/{}/change-password", user_id),
            Some(&token),
            json!({
                "current_password": "guess-guess",
                "new_password": "Anchors-Aweigh-9",
                "new_password_confirm": "Anchors-Aweigh-9"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CURRENT_PASSWORD");
}

#[tokio::test]
async fn test_password_change_confirmation_mismatch_is_bad_request() {
    let app = test_app();
    let (user_id, token) = sign_up(&app.router, "captain@example.com").await;

    let (status, body) = send(
        &app.router,
        json_request(
            Method::PUT,
            &format!("/users/{}/change-password", user_id),
            Some(&token),
            json!({
                "current_password": "SecurePass123!",
                "new_password": "Anchors-Aweigh-9",
                "new_password_confirm": "Anchors-Aweigh-8"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "PASSWORD_CONFIRMATION_MISMATCH");
}

#[tokio::test]
async fn test_password_change_is_self_only() {
    let app = test_app();
    let (victim_id, _) = sign_up(&app.router, "captain@example.com").await;
    let (_, token) = sign_up(&app.router, "mate@example.com").await;

    let (status, _) = send(
        &app.router,
        json_request(
            Method::PUT,
            &format!("/users/{}/change-password", victim_id),
            Some(&token),
            json!({
                "current_password": "SecurePass123!",
                "new_password": "Anchors-Aweigh-9",
                "new_password_confirm": "Anchors-Aweigh-9"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_list_is_admin_only() {
    let app = test_app();
    let (_, token) = sign_up(&app.router, "captain@example.com").await;

    let (status, _) = send(
        &app.router,
        json_request(Method::GET, "/users", Some(&token), Value::Null),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rate_limited_auth_route() {
    let router = app_with(InMemory::new(), false, true);

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/auth/login",
            None,
            json!({ "email": "captain@example.com", "password": "SecurePass123!" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("Retry-After"));
}

// =============================================================================
// Boats
// =============================================================================

#[tokio::test]
async fn test_create_boat_with_image() {
    let app = test_app();
    let (user_id, token) = sign_up(&app.router, "captain@example.com").await;

    let mut parts = listing_parts(app.district_id);
    parts.push(Part::File("images", "bow.png", "image/png", b"\x89PNG"));

    let (status, body) = send(
        &app.router,
        multipart_request(Method::POST, "/boats", &token, &parts),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["owner_id"], user_id.to_string());
    assert_eq!(body["district_name"], "Bodrum");
    assert_eq!(body["country_name"], "Türkiye");
    assert_eq!(body["images"].as_array().unwrap().len(), 1);
    assert!(body["images"][0]["data_uri"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));

    let (status, listed) = send(
        &app.router,
        Request::get("/boats?city=mu%C4%9F&capacity=10")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_boat_rejects_executable() {
    let app = test_app();
    let (_, token) = sign_up(&app.router, "captain@example.com").await;

    let mut parts = listing_parts(app.district_id);
    parts.push(Part::File("images", "bow.png", "image/png", b"\x89PNG"));
    parts.push(Part::File("images", "setup.exe", "application/octet-stream", b"MZ"));

    let (status, body) = send(
        &app.router,
        multipart_request(Method::POST, "/boats", &token, &parts),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "UNSUPPORTED_FILE_TYPE");
    assert!(app.store.world().boats.is_empty());
}

#[tokio::test]
async fn test_update_boat_over_image_limit() {
    let app = test_app();
    let (user_id, token) = sign_up(&app.router, "captain@example.com").await;
    let boat_id = app.store.seed_boat(user_id, app.district_id, 4);

    let mut parts = listing_parts(app.district_id);
    parts.push(Part::File("new_images", "a.jpg", "image/jpeg", b"\xFF\xD8a"));
    parts.push(Part::File("new_images", "b.jpg", "image/jpeg", b"\xFF\xD8b"));

    let (status, body) = send(
        &app.router,
        multipart_request(Method::PUT, &format!("/boats/{}", boat_id), &token, &parts),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "IMAGE_LIMIT_EXCEEDED");
    assert_eq!(app.store.image_ids(boat_id).len(), 4);
}

#[tokio::test]
async fn test_update_boat_swaps_images() {
    let app = test_app();
    let (user_id, token) = sign_up(&app.router, "captain@example.com").await;
    let boat_id = app.store.seed_boat(user_id, app.district_id, 5);
    let dropped = app.store.image_ids(boat_id)[0];

    let mut parts = listing_parts(app.district_id);
    parts.push(Part::Text("images_to_delete", dropped.to_string()));
    parts.push(Part::File("new_images", "stern.webp", "image/webp", b"RIFF"));

    let (status, body) = send(
        &app.router,
        multipart_request(Method::PUT, &format!("/boats/{}", boat_id), &token, &parts),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    let ids = app.store.image_ids(boat_id);
    assert_eq!(ids.len(), 5);
    assert!(!ids.contains(&dropped));
}

#[tokio::test]
async fn test_update_foreign_boat_is_forbidden() {
    let app = test_app();
    let owner = app.store.seed_user(
        "owner@example.com",
        UserType::BoatOwner,
        Credential::placeholder(),
    );
    let boat_id = app.store.seed_boat(owner.id, app.district_id, 1);
    let (_, token) = sign_up(&app.router, "mate@example.com").await;

    let (status, _) = send(
        &app.router,
        multipart_request(
            Method::PUT,
            &format!("/boats/{}", boat_id),
            &token,
            &listing_parts(app.district_id),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.store.image_ids(boat_id).len(), 1);
}

#[tokio::test]
async fn test_foreign_boat_ownership_is_checked_before_the_form() {
    let app = test_app();
    let owner = app.store.seed_user(
        "owner@example.com",
        UserType::BoatOwner,
        Credential::placeholder(),
    );
    let boat_id = app.store.seed_boat(owner.id, app.district_id, 1);
    let (_, token) = sign_up(&app.router, "mate@example.com").await;

    // No price and an inverted window would be a 400 for the owner
    let parts = vec![
        Part::Text("name", "Blue Horizon".to_string()),
        Part::Text("available_from", "2025-10-01T00:00:00Z".to_string()),
        Part::Text("available_to", "2025-06-01T00:00:00Z".to_string()),
    ];

    let (status, body) = send(
        &app.router,
        multipart_request(Method::PUT, &format!("/boats/{}", boat_id), &token, &parts),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_create_boat_requires_price() {
    let app = test_app();
    let (_, token) = sign_up(&app.router, "captain@example.com").await;

    let parts: Vec<Part> = listing_parts(app.district_id)
        .into_iter()
        .filter(|part| !matches!(part, Part::Text("price_per_hour", _)))
        .collect();

    let (status, body) = send(
        &app.router,
        multipart_request(Method::POST, "/boats", &token, &parts),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(app.store.world().boats.is_empty());
}

#[tokio::test]
async fn test_unknown_boat_is_not_found() {
    let app = test_app();
    let (status, body) = send(
        &app.router,
        Request::get(format!("/boats/{}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// =============================================================================
// Geography
// =============================================================================

#[tokio::test]
async fn test_location_lookups() {
    let app = test_app();

    let (status, countries) = send(
        &app.router,
        Request::get("/countries").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let country_id = countries[0]["id"].as_str().unwrap().to_string();

    let (status, cities) = send(
        &app.router,
        Request::get(format!("/countries/{}/cities", country_id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cities[0]["name"], "Muğla");

    let (status, _) = send(
        &app.router,
        Request::get(format!("/cities/{}/districts", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
