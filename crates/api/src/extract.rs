//! Request extractors whose rejections render as the JSON error body.

use axum::extract::FromRequest;

use crate::error::AppError;

/// [`axum::Json`] whose rejection is an [`AppError::BadRequest`] instead of
/// axum's plain-text 400/415/422.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
