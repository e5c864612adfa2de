//! Disease classifier client.
//!
//! The classifier is a hosted vision model with a single endpoint:
//! `POST /predict` with an image URL, answering a disease label.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::config::DetectionConfig;

/// Errors that can occur when interacting with the classifier.
#[derive(Debug, Error)]
pub enum DetectionError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Classifier returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    image_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    prediction: String,
}

/// Client for the hosted disease classifier.
#[derive(Clone)]
pub struct DetectionClient {
    inner: Arc<DetectionClientInner>,
}

struct DetectionClientInner {
    client: reqwest::Client,
    endpoint: String,
}

impl DetectionClient {
    /// Create a new classifier client.
    #[must_use]
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            inner: Arc::new(DetectionClientInner {
                client: reqwest::Client::new(),
                endpoint: format!("{}/predict", config.base_url),
            }),
        }
    }

    /// Classify the plant disease shown in an image.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no
    /// prediction.
    #[instrument(skip(self))]
    pub async fn predict(&self, image_url: &str) -> Result<String, DetectionError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&PredictRequest { image_url })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DetectionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: PredictResponse = response
            .json()
            .await
            .map_err(|e| DetectionError::Parse(e.to_string()))?;

        Ok(body.prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_request_shape() {
        let request = PredictRequest {
            image_url: "https://img.example.com/leaf.jpg",
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["image_url"], "https://img.example.com/leaf.jpg");
    }

    #[test]
    fn test_predict_response_shape() {
        let json = r#"{"prediction": "Tomato___Late_blight", "confidence": 0.94}"#;
        let body: PredictResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(body.prediction, "Tomato___Late_blight");
    }
}
