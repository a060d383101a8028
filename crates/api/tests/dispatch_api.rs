//! Integration tests for the dispatch routes.
//!
//! Validation failures are answered directly. Valid requests are forwarded
//! over HTTP to the provider sub-route, so those tests serve the app on a
//! real port.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, post_json};
use mediaforge_storage::memory::MemoryStore;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_provider_lists_valid_providers() {
    let app = common::build_test_app(common::lazy_pool());

    let response = post_json(
        &app,
        "/api/text-to-video",
        json!({ "provider": "runway", "prompt": "a fox" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNSUPPORTED");
    assert_eq!(json["details"]["kind"], "provider");
    assert_eq!(json["details"]["valid"], json!(["fal", "replicate"]));
}

#[tokio::test]
async fn missing_provider_is_a_validation_error() {
    let app = common::build_test_app(common::lazy_pool());

    let response = post_json(&app, "/api/text-to-image", json!({ "prompt": "a fox" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("openai, fal"));
}

#[tokio::test]
async fn unknown_model_for_known_provider_is_rejected() {
    let app = common::build_test_app(common::lazy_pool());

    let response = post_json(
        &app,
        "/api/text-to-speech",
        json!({ "provider": "google", "model": "Chirp", "text": "hi" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["details"]["kind"], "model");
    assert_eq!(json["details"]["valid"], json!(["Neural2", "WaveNet", "Standard"]));
}

#[tokio::test]
async fn non_object_body_is_rejected() {
    let app = common::build_test_app(common::lazy_pool());

    let response = post_json(&app, "/api/image-to-video", json!(["fal"])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Forwarding
// ---------------------------------------------------------------------------

async fn served_app() -> String {
    let media = common::spawn_media_server().await;
    let fal = common::spawn_fal_mock(media).await;
    let config = common::with_fal(common::test_config(), &fal);
    common::serve_test_app(common::lazy_pool(), config, Arc::new(MemoryStore::default())).await
}

async fn dispatch(base: &str, capability: &str, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{base}/api/{capability}"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn valid_request_is_answered_by_the_provider_route() {
    let base = served_app().await;

    let (status, json) = dispatch(
        &base,
        "text-to-video",
        json!({ "provider": "fal", "model": "fal-ai/ltx-video", "prompt": "a fox" }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(json["success"], true);
    assert_eq!(json["provider"], "fal");
    assert_eq!(json["requestId"], "req-ltx-video");
    assert_eq!(json["persisted"], true);
}

#[tokio::test]
async fn provider_route_failure_is_relayed_verbatim() {
    let base = served_app().await;

    let (status, json) = dispatch(
        &base,
        "text-to-video",
        json!({ "provider": "fal", "model": "fal-ai/hunyuan-video", "prompt": "a fox" }),
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(json["code"], "GENERATION_FAILED");
    assert_eq!(json["details"], "FAILED (content policy)");
}

#[tokio::test]
async fn sub_route_validation_errors_pass_through() {
    let base = served_app().await;

    let (status, json) = dispatch(
        &base,
        "text-to-video",
        json!({ "provider": "fal", "prompt": "a fox", "duration": 6 }),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(json["details"]["kind"], "duration");
}
