//! HTTP-level integration tests for the tag catalog and disablement.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_child, error_code, get, post_json, put_json, seed_tag, seed_user};
use nestling_core::types::TagKind;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn listing_is_kind_scoped_and_catalog_ordered(pool: PgPool) {
    let user = seed_user(&pool, "list@test.dev").await;
    seed_tag(&pool, TagKind::Behavior, "tantrum", 2).await;
    seed_tag(&pool, TagKind::Behavior, "biting", 1).await;
    seed_tag(&pool, TagKind::Activity, "swimming", 0).await;

    let response = get(
        common::build_test_app(pool),
        "/api/v1/tags?kind=behavior",
        user,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["biting", "tantrum"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn listing_can_filter_by_group(pool: PgPool) {
    let user = seed_user(&pool, "group@test.dev").await;
    seed_tag(&pool, TagKind::Behavior, "biting", 1).await;

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/tags?kind=behavior&group=general",
        user,
    )
    .await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = get(
        common::build_test_app(pool),
        "/api/v1/tags?kind=behavior&group=other",
        user,
    )
    .await;
    assert!(body_json(response).await.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn disablement_is_per_user_and_reversible(pool: PgPool) {
    let alice = seed_user(&pool, "alice@test.dev").await;
    let bob = seed_user(&pool, "bob@test.dev").await;
    let tag = seed_tag(&pool, TagKind::Behavior, "biting", 1).await;

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/tags/{tag}/disabled"),
        alice,
        serde_json::json!({ "disabled": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Hidden for Alice, still visible for Bob.
    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/tags?kind=behavior",
        alice,
    )
    .await;
    assert!(body_json(response).await.as_array().unwrap().is_empty());

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/tags?kind=behavior",
        bob,
    )
    .await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    // Re-enabling restores it.
    put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/tags/{tag}/disabled"),
        alice,
        serde_json::json!({ "disabled": false }),
    )
    .await;
    let response = get(
        common::build_test_app(pool),
        "/api/v1/tags?kind=behavior",
        alice,
    )
    .await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn disabling_a_missing_tag_is_404(pool: PgPool) {
    let user = seed_user(&pool, "missing@test.dev").await;

    let response = put_json(
        common::build_test_app(pool),
        "/api/v1/tags/999999/disabled",
        user,
        serde_json::json!({ "disabled": true }),
    )
    .await;

    let code = error_code(response, StatusCode::NOT_FOUND).await;
    assert_eq!(code, "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn disablement_does_not_rewrite_stored_events(pool: PgPool) {
    let user = seed_user(&pool, "history@test.dev").await;
    let child = create_child(&pool, user, "Alex").await;
    let tag = seed_tag(&pool, TagKind::Behavior, "biting", 1).await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/events/behavior",
        user,
        serde_json::json!({ "child_id": child, "tags": ["biting"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/tags/{tag}/disabled"),
        user,
        serde_json::json!({ "disabled": true }),
    )
    .await;

    // The stored event still renders the tag by name.
    let response = get(common::build_test_app(pool), "/api/v1/timeline", user).await;
    let json = body_json(response).await;
    assert_eq!(json["events"][0]["tags"][0]["name"], "biting");
}
