//! Mistral API client for chat completions.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::MistralConfig;

use super::error::{ApiErrorResponse, MistralError};
use super::types::{ChatMessage, ChatRequest, ChatResponse};

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Mistral API client.
///
/// Provides chat completions for the advisory endpoints. One client is
/// shared across all handlers; it is cheaply cloneable.
#[derive(Clone)]
pub struct MistralClient {
    inner: Arc<MistralClientInner>,
}

struct MistralClientInner {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl MistralClient {
    /// Create a new Mistral client.
    ///
    /// # Arguments
    ///
    /// * `config` - Mistral API configuration containing API key and model
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &MistralConfig) -> Self {
        let api_key = config.api_key.expose_secret();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .expect("Invalid API key for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(MistralClientInner {
                client,
                endpoint: format!("{}{CHAT_COMPLETIONS_PATH}", config.base_url),
                model: config.model.clone(),
            }),
        }
    }

    /// Send a chat request and get the complete response.
    ///
    /// # Arguments
    ///
    /// * `messages` - Conversation messages, system prompt first
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, messages), fields(model = %self.inner.model))]
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> Result<ChatResponse, MistralError> {
        let request = ChatRequest {
            model: self.inner.model.clone(),
            messages,
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            temperature: None,
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Send a chat request and return just the generated text.
    ///
    /// # Errors
    ///
    /// Returns `MistralError::EmptyCompletion` if the model produced no
    /// choices, or any error from [`Self::chat`].
    pub async fn chat_text(&self, messages: Vec<ChatMessage>) -> Result<String, MistralError> {
        let response = self.chat(messages).await?;
        response
            .text()
            .map(ToOwned::to_owned)
            .ok_or(MistralError::EmptyCompletion)
    }

    /// Handle a response, successful or not.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<ChatResponse, MistralError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| MistralError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(self.handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> MistralError {
        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return MistralError::RateLimited(retry_after);
        }

        // Check for unauthorized
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return MistralError::Unauthorized("Invalid API key".to_string());
        }

        // Try to parse the API error body
        match response.text().await {
            Ok(body) => {
                if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                    MistralError::Api {
                        error_type: api_error
                            .error_type
                            .unwrap_or_else(|| "unknown".to_string()),
                        message: api_error.message,
                    }
                } else {
                    MistralError::Api {
                        error_type: "unknown".to_string(),
                        message: body,
                    }
                }
            }
            Err(e) => MistralError::Http(e),
        }
    }
}
