//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//! Responses are always envelope-shaped: `{"success": false, "error": ..., "message": ...}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use agrisetu_core::ApiResponse;

use crate::clients::detection::DetectionError;
use crate::clients::mistral::MistralError;
use crate::clients::news::NewsError;
use crate::clients::weather::WeatherError;
use crate::db::RepositoryError;

/// Application-level error type for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// LLM provider call failed.
    #[error("LLM error: {0}")]
    Llm(#[from] MistralError),

    /// Weather API call failed.
    #[error("Weather error: {0}")]
    Weather(#[from] WeatherError),

    /// News search API call failed.
    #[error("News error: {0}")]
    News(#[from] NewsError),

    /// Disease classifier call failed.
    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),

    /// The LLM replied, but the reply failed contract validation.
    #[error("Low-confidence model output: {0}")]
    LowConfidence(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller identity missing or not allowed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Short error string carried in the envelope's `error` field.
    fn envelope_error(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Llm(_) => "LLM service unavailable".to_string(),
            Self::Weather(_) => "Weather service unavailable".to_string(),
            Self::News(_) => "Failed to fetch news".to_string(),
            Self::Detection(_) => "Disease detection service unavailable".to_string(),
            Self::LowConfidence(_) => "Model response failed validation".to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::RateLimited => "Too many requests".to_string(),
        }
    }

    /// Optional human-readable note for the envelope's `message` field.
    ///
    /// Internal details stay out; the note tells the caller what to do next.
    fn envelope_message(&self) -> Option<String> {
        match self {
            Self::Llm(_) | Self::Weather(_) | Self::News(_) | Self::Detection(_) => {
                Some("Please try again later".to_string())
            }
            Self::LowConfidence(_) => {
                Some("The model returned data we could not validate; retry the request".to_string())
            }
            Self::RateLimited => Some("Slow down and retry shortly".to_string()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Database(_)
                | Self::Internal(_)
                | Self::Llm(_)
                | Self::Weather(_)
                | Self::News(_)
                | Self::Detection(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Llm(_)
            | Self::Weather(_)
            | Self::News(_)
            | Self::Detection(_)
            | Self::LowConfidence(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        };

        let mut body = ApiResponse::<()>::error(self.envelope_error());
        body.message = self.envelope_message();

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this once the caller identity is known to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}
