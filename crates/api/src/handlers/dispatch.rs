//! Dispatch routes: pick a provider sub-route and relay the request to it.
//!
//! The body is validated against the provider registry, then forwarded
//! unchanged over HTTP to `/api/<capability>/providers/<key>` on the
//! server's own base URL. The sub-route's status and body are returned
//! verbatim.

use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName};
use axum::response::{IntoResponse, Response};
use mediaforge_core::registry::{self, Capability};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// Validate `body` for `capability` and relay it to the provider sub-route.
pub async fn forward(
    state: &AppState,
    capability: Capability,
    headers: &HeaderMap,
    body: Value,
) -> AppResult<Response> {
    if !body.is_object() {
        return Err(AppError::BadRequest(
            "Request body must be a JSON object".into(),
        ));
    }
    let provider = body.get("provider").and_then(Value::as_str);
    let model = body.get("model").and_then(Value::as_str);
    let entry = registry::resolve(capability, provider, model)?;

    let url = format!("{}{}", state.config.internal_base_url, entry.forward_path);
    tracing::info!(
        capability = capability.slug(),
        provider = entry.key,
        model = model.unwrap_or(entry.default_model()),
        "Dispatching generation request"
    );

    let mut request = state.http.post(&url).json(&body);
    // Caller identity and request id travel with the body.
    for name in [AUTHORIZATION, HeaderName::from_static("x-request-id")] {
        if let Some(value) = headers.get(&name) {
            request = request.header(name, value.clone());
        }
    }

    let upstream = request
        .send()
        .await
        .map_err(|e| AppError::generation("Failed to reach provider route", e))?;
    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
    let bytes = upstream
        .bytes()
        .await
        .map_err(|e| AppError::generation("Failed to read provider route response", e))?;

    tracing::debug!(provider = entry.key, status = status.as_u16(), "Provider route answered");

    let mut response = (status, bytes).into_response();
    if let Some(content_type) = content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    Ok(response)
}

// ---------------------------------------------------------------------------
// POST /api/{capability}
// ---------------------------------------------------------------------------

pub async fn text_to_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(body): AppJson<Value>,
) -> AppResult<Response> {
    forward(&state, Capability::TextToVideo, &headers, body).await
}

pub async fn image_to_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(body): AppJson<Value>,
) -> AppResult<Response> {
    forward(&state, Capability::ImageToVideo, &headers, body).await
}

pub async fn text_to_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(body): AppJson<Value>,
) -> AppResult<Response> {
    forward(&state, Capability::TextToImage, &headers, body).await
}

pub async fn text_to_speech(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(body): AppJson<Value>,
) -> AppResult<Response> {
    forward(&state, Capability::TextToSpeech, &headers, body).await
}
