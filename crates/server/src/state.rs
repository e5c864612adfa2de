//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::clients::{
    DetectionClient, MistralClient, NewsClient, TranslationClient, WeatherClient,
};
use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections, configuration, and the
/// third-party service clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    mistral: MistralClient,
    weather: WeatherClient,
    news: NewsClient,
    translation: TranslationClient,
    detection: DetectionClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let mistral = MistralClient::new(&config.mistral);
        let weather = WeatherClient::new(&config.weather);
        let news = NewsClient::new(&config.news);
        let translation = TranslationClient::new(&config.translate);
        let detection = DetectionClient::new(&config.detection);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                mistral,
                weather,
                news,
                translation,
                detection,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Mistral client.
    #[must_use]
    pub fn mistral(&self) -> &MistralClient {
        &self.inner.mistral
    }

    /// Get a reference to the weather client.
    #[must_use]
    pub fn weather(&self) -> &WeatherClient {
        &self.inner.weather
    }

    /// Get a reference to the news client.
    #[must_use]
    pub fn news(&self) -> &NewsClient {
        &self.inner.news
    }

    /// Get a reference to the translation client.
    #[must_use]
    pub fn translation(&self) -> &TranslationClient {
        &self.inner.translation
    }

    /// Get a reference to the disease classifier client.
    #[must_use]
    pub fn detection(&self) -> &DetectionClient {
        &self.inner.detection
    }
}
