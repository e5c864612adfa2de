//! weatherapi.com client.
//!
//! Forecast responses are passed through to the frontend unmodified, so the
//! full payload stays `serde_json::Value`; only the advisory flows parse a
//! typed snapshot out of the current-conditions endpoint. Forecasts are
//! cached with `moka` (5-minute TTL) keyed by rounded coordinates.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::WeatherConfig;

/// Forecast horizon requested from the upstream API.
const FORECAST_DAYS: u8 = 7;

/// Errors that can occur when interacting with the weather API.
#[derive(Debug, Error)]
pub enum WeatherError {
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

/// Typed subset of the current-conditions response used by advisory prompts.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherSnapshot {
    /// Current conditions.
    pub current: CurrentConditions,
}

/// Current weather conditions.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in Celsius.
    pub temp_c: f64,
    /// Condition description.
    pub condition: Condition,
}

/// Weather condition description.
#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    /// Human-readable condition text (e.g., "Partly cloudy").
    pub text: String,
}

impl WeatherSnapshot {
    /// One-line summary for prompt interpolation.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{}, {}°C", self.current.condition.text, self.current.temp_c)
    }
}

/// Client for weatherapi.com.
#[derive(Clone)]
pub struct WeatherClient {
    inner: Arc<WeatherClientInner>,
}

struct WeatherClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    forecast_cache: Cache<String, Arc<serde_json::Value>>,
}

impl WeatherClient {
    /// Create a new weather client.
    #[must_use]
    pub fn new(config: &WeatherConfig) -> Self {
        let forecast_cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(WeatherClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                api_key: config.api_key.expose_secret().to_string(),
                forecast_cache,
            }),
        }
    }

    /// Fetch a 7-day forecast with alerts for a coordinate pair.
    ///
    /// The raw upstream payload is returned as-is; repeated requests for the
    /// same (rounded) coordinates within 5 minutes are served from cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the body isn't JSON.
    #[instrument(skip(self))]
    pub async fn forecast(&self, lat: f64, lon: f64) -> Result<serde_json::Value, WeatherError> {
        let cache_key = format!("forecast:{lat:.4},{lon:.4}");

        // Check cache
        if let Some(cached) = self.inner.forecast_cache.get(&cache_key).await {
            debug!("Cache hit for forecast");
            return Ok((*cached).clone());
        }

        let url = format!(
            "{}/v1/forecast.json?key={}&q={lat},{lon}&days={FORECAST_DAYS}&aqi=no&alerts=yes",
            self.inner.base_url, self.inner.api_key
        );

        let body = self.get_json(&url).await?;

        // Cache the result
        self.inner
            .forecast_cache
            .insert(cache_key, Arc::new(body.clone()))
            .await;

        Ok(body)
    }

    /// Fetch current conditions as a typed snapshot.
    ///
    /// Advisory callers treat failures as "weather data unavailable" and
    /// carry on, so this is not cached; forecasts carry the traffic.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the subset can't be parsed.
    #[instrument(skip(self))]
    pub async fn current(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!(
            "{}/v1/current.json?key={}&q={lat},{lon}&aqi=no",
            self.inner.base_url, self.inner.api_key
        );

        let body = self.get_json(&url).await?;
        serde_json::from_value(body).map_err(|e| WeatherError::Parse(e.to_string()))
    }

    /// GET a URL and return its JSON body, mapping error statuses.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, WeatherError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))
    }
}
