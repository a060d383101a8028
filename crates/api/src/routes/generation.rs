//! Route definitions for the generation capabilities.
//!
//! Each capability has a dispatch route at `/` and one sub-route per
//! provider under `/providers/{key}`.

use axum::routing::post;
use axum::Router;

use crate::handlers::{dispatch, image_to_video, text_to_image, text_to_speech, text_to_video};
use crate::state::AppState;

/// Mounted at `/text-to-video`.
pub fn text_to_video_router() -> Router<AppState> {
    Router::new()
        .route("/", post(dispatch::text_to_video))
        .route("/providers/fal", post(text_to_video::fal))
        .route("/providers/replicate", post(text_to_video::replicate))
}

/// Mounted at `/image-to-video`.
pub fn image_to_video_router() -> Router<AppState> {
    Router::new()
        .route("/", post(dispatch::image_to_video))
        .route("/providers/fal", post(image_to_video::fal))
        .route("/providers/replicate", post(image_to_video::replicate))
}

/// Mounted at `/text-to-image`.
pub fn text_to_image_router() -> Router<AppState> {
    Router::new()
        .route("/", post(dispatch::text_to_image))
        .route("/providers/openai", post(text_to_image::openai))
        .route("/providers/fal", post(text_to_image::fal))
}

/// Mounted at `/text-to-speech`.
pub fn text_to_speech_router() -> Router<AppState> {
    Router::new()
        .route("/", post(dispatch::text_to_speech))
        .route("/providers/voicemaker", post(text_to_speech::voicemaker))
        .route("/providers/google", post(text_to_speech::google))
}
