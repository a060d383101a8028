//! Integration tests for scripts.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn script_content_defaults_to_empty(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = common::new_user();

    let response = post_json_auth(&app, "/api/scripts", json!({ "title": "Episode 1" }), &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["title"], "Episode 1");
    assert_eq!(data["content"], "");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn script_update_and_delete(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = common::new_user();

    let response = post_json_auth(
        &app,
        "/api/scripts",
        json!({ "title": "Draft", "content": "Scene 1" }),
        &token,
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/scripts/{id}");

    let response = put_json_auth(&app, &uri, json!({ "title": "Final" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["title"], "Final");
    assert_eq!(data["content"], "Scene 1");

    let response = put_json_auth(&app, &uri, json!({ "title": "" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(delete_auth(&app, &uri, &token).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(delete_auth(&app, &uri, &token).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn scripts_are_scoped_to_their_owner(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, owner) = common::new_user();
    let (_, other) = common::new_user();

    post_json_auth(&app, "/api/scripts", json!({ "title": "Mine" }), &owner).await;

    let mine = body_json(get_auth(&app, "/api/scripts", &owner).await).await;
    let theirs = body_json(get_auth(&app, "/api/scripts", &other).await).await;
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);
    assert!(theirs["data"].as_array().unwrap().is_empty());
}
