use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mediaforge_core::error::CoreError;
use mediaforge_core::polling::PollError;
use mediaforge_providers::ProviderError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses
/// of the form `{ "error", "code", "details"? }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `mediaforge_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A provider call or generation job failed. `details` carries the
    /// provider's own error text back to the client.
    #[error("{message}: {details}")]
    Generation { message: String, details: String },

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn generation(message: impl Into<String>, details: impl ToString) -> Self {
        Self::Generation {
            message: message.into(),
            details: details.to_string(),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        let message = match &err {
            ProviderError::NotConfigured(_) => "Provider is not configured",
            _ => "Provider request failed",
        };
        AppError::generation(message, err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PollError<ProviderError>> for AppError {
    fn from(err: PollError<ProviderError>) -> Self {
        match err {
            PollError::Backend(e) => e.into(),
            PollError::Failed { status, .. } => AppError::generation("Generation failed", status),
            timed_out @ PollError::TimedOut { .. } => {
                AppError::generation("Generation timed out", timed_out)
            }
            PollError::MissingMediaUrl { payload, .. } => {
                AppError::generation("Provider returned no media URL", payload)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details): (StatusCode, &str, String, Option<Value>) =
            match &self {
                // --- CoreError variants ---
                AppError::Core(core) => match core {
                    CoreError::NotFound { entity, id } => (
                        StatusCode::NOT_FOUND,
                        "NOT_FOUND",
                        format!("{entity} with id {id} not found"),
                        None,
                    ),
                    CoreError::Validation(msg) => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
                    }
                    CoreError::Unsupported { kind, value, valid } => (
                        StatusCode::BAD_REQUEST,
                        "UNSUPPORTED",
                        core.to_string(),
                        Some(json!({ "kind": kind, "value": value, "valid": valid })),
                    ),
                    CoreError::Unauthorized(msg) => {
                        (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
                    }
                    CoreError::Internal(msg) => {
                        tracing::error!(error = %msg, "Internal core error");
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "INTERNAL_ERROR",
                            "An internal error occurred".to_string(),
                            None,
                        )
                    }
                },

                // --- Database errors ---
                AppError::Database(err) => {
                    let (status, code, message) = classify_sqlx_error(err);
                    (status, code, message, None)
                }

                // --- HTTP-specific errors ---
                AppError::BadRequest(msg) => {
                    (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
                }
                AppError::Generation { message, details } => {
                    tracing::error!(error = %message, details = %details, "Generation failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "GENERATION_FAILED",
                        message.clone(),
                        Some(Value::String(details.clone())),
                    )
                }
                AppError::InternalError(msg) => {
                    tracing::error!(error = %msg, "Internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                        None,
                    )
                }
            };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
