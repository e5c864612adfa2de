//! SerpAPI (Google News engine) client for the agriculture feed.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use agrisetu_core::LanguageCode;

use crate::config::NewsConfig;

/// Search query pinned for the feed.
const QUERY: &str = "agriculture";

/// Region bias for results (gl parameter).
const REGION: &str = "in";

/// Errors that can occur when interacting with the news API.
#[derive(Debug, Error)]
pub enum NewsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Subset of the search response we read.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    /// Headline entries; absent when the engine found nothing.
    #[serde(default)]
    news_results: Vec<serde_json::Value>,
}

/// Client for the SerpAPI Google News engine.
#[derive(Clone)]
pub struct NewsClient {
    inner: Arc<NewsClientInner>,
}

struct NewsClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsClient {
    /// Create a new news client.
    #[must_use]
    pub fn new(config: &NewsConfig) -> Self {
        Self {
            inner: Arc::new(NewsClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }

    /// Fetch agriculture headlines in the given interface language.
    ///
    /// Headline entries are passed through as raw JSON; the route layer
    /// owns pagination and the envelope. An absent result list is an empty
    /// feed, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body isn't JSON.
    #[instrument(skip(self), fields(language = %language))]
    pub async fn agriculture_headlines(
        &self,
        language: &LanguageCode,
    ) -> Result<Vec<serde_json::Value>, NewsError> {
        let url = format!(
            "{}/search.json?engine=google_news&q={QUERY}&gl={REGION}&hl={}&api_key={}",
            self.inner.base_url,
            language.as_str(),
            self.inner.api_key
        );

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NewsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| NewsError::Parse(e.to_string()))?;

        Ok(body.news_results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_with_results() {
        let json = r#"{
            "search_metadata": {"status": "Success"},
            "news_results": [
                {"position": 1, "title": "Monsoon outlook improves"},
                {"position": 2, "title": "Fertilizer subsidy revised"}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.news_results.len(), 2);
    }

    #[test]
    fn test_search_response_without_results() {
        // The engine omits news_results entirely for empty feeds
        let json = r#"{"search_metadata": {"status": "Success"}}"#;
        let response: SearchResponse = serde_json::from_str(json).expect("deserialize");
        assert!(response.news_results.is_empty());
    }
}
