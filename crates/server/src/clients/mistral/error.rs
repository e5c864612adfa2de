//! Error types for the Mistral API client.

use thiserror::Error;

/// Errors that can occur when interacting with the Mistral API.
#[derive(Debug, Error)]
pub enum MistralError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error.
    #[error("API error ({error_type}): {message}")]
    Api {
        /// Error type from the API.
        error_type: String,
        /// Error message.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The model returned a response with no choices.
    #[error("empty completion")]
    EmptyCompletion,
}

/// API error response body.
///
/// Mistral returns a flat object: `{"object": "error", "message": ..., "type": ...}`.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Error message.
    pub message: String,
    /// Error type.
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mistral_error_display() {
        let err = MistralError::RateLimited(60);
        assert_eq!(err.to_string(), "rate limited, retry after 60 seconds");

        let err = MistralError::Api {
            error_type: "invalid_request_error".to_string(),
            message: "Invalid model".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (invalid_request_error): Invalid model"
        );
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "object": "error",
            "message": "Unauthorized",
            "type": "invalid_request_error",
            "param": null,
            "code": null
        }"#;

        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.message, "Unauthorized");
        assert_eq!(
            response.error_type.as_deref(),
            Some("invalid_request_error")
        );
    }
}
