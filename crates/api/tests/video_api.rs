//! Integration tests for generated video records.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth};
use mediaforge_storage::memory::MemoryStore;
use mediaforge_storage::ObjectStore;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn video_record_defaults_content_type(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = common::new_user();

    let response = post_json_auth(
        &app,
        "/api/videos",
        json!({
            "provider": "fal",
            "model": "fal-ai/ltx-video",
            "prompt": "a fox",
            "publicUrl": "https://cdn.test/v.mp4"
        }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["contentType"], "video/mp4");
    assert_eq!(data["storageKey"], serde_json::Value::Null);

    let listed = body_json(get_auth(&app, "/api/videos", &token).await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_video_records_are_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = common::new_user();

    let response = post_json_auth(
        &app,
        "/api/videos",
        json!({ "provider": "fal", "model": "m", "publicUrl": " " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        &app,
        "/api/videos",
        json!({ "provider": "fal", "model": "m", "publicUrl": "https://x", "sizeBytes": -1 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// App wired to the mock FAL and media servers over `store`.
async fn generation_app(pool: PgPool, store: Arc<MemoryStore>) -> axum::Router {
    let media = common::spawn_media_server().await;
    let fal = common::spawn_fal_mock(media).await;
    let config = common::with_fal(common::test_config(), &fal);
    common::build_test_app_with(pool, config, store)
}

/// Generate a clip as the owner of `token`, returning `(video_id, storage_key)`.
async fn generate_owned_video(app: &axum::Router, token: &str) -> (String, String) {
    let response = post_json_auth(
        app,
        "/api/text-to-video/providers/fal",
        json!({ "prompt": "a fox", "model": "fal-ai/ltx-video" }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    (
        json["videoId"].as_str().expect("video id").to_string(),
        json["storageKey"].as_str().expect("storage key").to_string(),
    )
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn authenticated_generation_records_an_owned_video(pool: PgPool) {
    let store = Arc::new(MemoryStore::new("https://cdn.test"));
    let app = generation_app(pool, store.clone()).await;
    let (_, token) = common::new_user();

    let (id, key) = generate_owned_video(&app, &token).await;

    let video = body_json(get_auth(&app, &format!("/api/videos/{id}"), &token).await).await;
    assert_eq!(video["data"]["storageKey"], key.as_str());
    assert_eq!(video["data"]["prompt"], "a fox");
    assert_eq!(video["data"]["publicUrl"], format!("https://cdn.test/{key}"));
    assert_eq!(video["data"]["sizeBytes"], common::MEDIA_BYTES.len());
    assert!(store.get(&key).is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_video_removes_its_stored_object(pool: PgPool) {
    let store = Arc::new(MemoryStore::new("https://cdn.test"));
    let app = generation_app(pool, store.clone()).await;
    let (_, token) = common::new_user();
    let (id, _) = generate_owned_video(&app, &token).await;

    let response = delete_auth(&app, &format!("/api/videos/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(store.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn client_supplied_storage_key_is_ignored(pool: PgPool) {
    let store = Arc::new(MemoryStore::new("https://cdn.test"));
    let key = "generated-videos/fal-fal-ai-ltx-video/someone-elses.mp4";
    store.put(key, vec![1, 2, 3], "video/mp4").await.unwrap();

    let app = common::build_test_app_with(pool, common::test_config(), store.clone());
    let (_, token) = common::new_user();

    let response = post_json_auth(
        &app,
        "/api/videos",
        json!({
            "provider": "fal",
            "model": "fal-ai/ltx-video",
            "storageKey": key,
            "publicUrl": format!("https://cdn.test/{key}")
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["storageKey"], serde_json::Value::Null);

    let id = data["id"].as_str().unwrap();
    let response = delete_auth(&app, &format!("/api/videos/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(store.get(key).is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_users_cannot_read_or_delete_a_generated_video(pool: PgPool) {
    let store = Arc::new(MemoryStore::new("https://cdn.test"));
    let app = generation_app(pool, store.clone()).await;
    let (_, owner) = common::new_user();
    let (_, intruder) = common::new_user();
    let (id, key) = generate_owned_video(&app, &owner).await;

    let uri = format!("/api/videos/{id}");
    assert_eq!(get_auth(&app, &uri, &intruder).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete_auth(&app, &uri, &intruder).await.status(), StatusCode::NOT_FOUND);
    assert!(store.get(&key).is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_with_missing_object_still_succeeds(pool: PgPool) {
    let store = Arc::new(MemoryStore::new("https://cdn.test"));
    let app = generation_app(pool, store.clone()).await;
    let (_, token) = common::new_user();
    let (id, key) = generate_owned_video(&app, &token).await;
    store.delete(&key).await.unwrap();

    let response = delete_auth(&app, &format!("/api/videos/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(&app, &format!("/api/videos/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
