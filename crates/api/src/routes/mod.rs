pub mod ai_voices;
pub mod generation;
pub mod health;
pub mod prompts;
pub mod research;
pub mod scripts;
pub mod utils;
pub mod videos;

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Generation routes hold their request for the whole poll loop, so they get
/// `generation_timeout_secs`; everything else gets `request_timeout_secs`.
///
/// ```text
/// /text-to-video                                   dispatch (POST)
/// /text-to-video/providers/{fal,replicate}         generate (POST)
/// /image-to-video                                  dispatch (POST)
/// /image-to-video/providers/{fal,replicate}        generate (POST)
/// /text-to-image                                   dispatch (POST)
/// /text-to-image/providers/{openai,fal}            generate (POST)
/// /text-to-speech                                  dispatch (POST)
/// /text-to-speech/providers/{voicemaker,google}    generate (POST)
///
/// /prompts                                         list, create (auth)
/// /prompts/{id}                                    get, update, delete (auth)
/// /ai-voices                                       list, create (auth)
/// /ai-voices/{id}                                  get, update, delete (auth)
/// /scripts                                         list, create (auth)
/// /scripts/{id}                                    get, update, delete (auth)
/// /videos                                          list, create (auth)
/// /videos/{id}                                     get, delete (auth)
///
/// /utils/parse-docx                                DOCX upload -> text (POST)
/// /utils/markdown-to-docx                          markdown -> DOCX (POST)
/// /utils/remove-links                              (POST)
/// /utils/chunk-text                                (POST)
///
/// /scrape                                          page -> markdown (POST)
/// /youtube/transcript                              video -> transcript (POST)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    let generation = Router::new()
        .nest("/text-to-video", generation::text_to_video_router())
        .nest("/image-to-video", generation::image_to_video_router())
        .nest("/text-to-image", generation::text_to_image_router())
        .nest("/text-to-speech", generation::text_to_speech_router())
        .layer(timeout_layer(config.generation_timeout_secs));

    let standard = Router::new()
        .nest("/prompts", prompts::router())
        .nest("/ai-voices", ai_voices::router())
        .nest("/scripts", scripts::router())
        .nest("/videos", videos::router())
        .nest("/utils", utils::router())
        .merge(research::router())
        .layer(timeout_layer(config.request_timeout_secs));

    generation.merge(standard)
}

/// Timeout layer answering `408 Request Timeout`.
pub fn timeout_layer(secs: u64) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_secs(secs))
}
