//! Shared harness for HTTP-level integration tests.
//!
//! Builds the same router (middleware stack included) that `main.rs`
//! serves, with the clock pinned so entry-placement defaults are
//! deterministic, and provides request/seed helpers. Requests carry the
//! caller's id in `x-user-id`, matching the gateway contract.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use nestling_api::config::ServerConfig;
use nestling_api::router::build_app_router;
use nestling_api::state::AppState;
use nestling_core::clock::FixedClock;
use nestling_core::types::{DbId, TagKind, Timestamp};
use nestling_db::models::tag::CreateTag;
use nestling_db::models::user::CreateUser;
use nestling_db::repositories::{TagRepo, UserRepo};

/// The pinned "now" for every test app: a Sunday morning.
pub fn test_now() -> Timestamp {
    Utc.with_ymd_and_hms(2021, 6, 27, 9, 30, 0).unwrap()
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and a clock pinned to [`test_now`].
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        clock: Arc::new(FixedClock(test_now())),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    user_id: Option<DbId>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, user_id: DbId) -> Response<Body> {
    send(app, "GET", uri, Some(user_id), None).await
}

pub async fn get_anonymous(app: Router, uri: &str) -> Response<Body> {
    send(app, "GET", uri, None, None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    user_id: DbId,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, "POST", uri, Some(user_id), Some(body)).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    user_id: DbId,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, "PATCH", uri, Some(user_id), Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    user_id: DbId,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, "PUT", uri, Some(user_id), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, user_id: DbId) -> Response<Body> {
    send(app, "DELETE", uri, Some(user_id), None).await
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the standard error envelope and return its `code` field.
pub async fn error_code(response: Response<Body>, expected: StatusCode) -> String {
    assert_eq!(response.status(), expected);
    let json = body_json(response).await;
    assert!(json["error"].is_string());
    json["code"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Seed helpers (below the HTTP surface: no user signup endpoint exists)
// ---------------------------------------------------------------------------

pub async fn seed_user(pool: &PgPool, email: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            display_name: "Test Parent".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_tag(pool: &PgPool, kind: TagKind, name: &str, sort_order: i32) -> DbId {
    TagRepo::create(
        pool,
        &CreateTag {
            kind,
            name: name.to_string(),
            group_name: "general".to_string(),
            sort_order,
        },
    )
    .await
    .unwrap()
    .id
}

/// Create a child through the API, returning its id.
pub async fn create_child(pool: &PgPool, user_id: DbId, name: &str) -> DbId {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/children",
        user_id,
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
