//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `AGRISETU_DATABASE_URL` - `PostgreSQL` connection string
//! - `MISTRAL_API_KEY` - LLM provider API key
//! - `WEATHER_API_KEY` - weatherapi.com API key
//! - `NEWS_API_KEY` - SerpAPI key for the news feed
//!
//! ## Optional
//! - `AGRISETU_HOST` - Bind address (default: 127.0.0.1)
//! - `AGRISETU_PORT` - Listen port (default: 8000)
//! - `MISTRAL_MODEL` - Model name (default: mistral-large-latest)
//! - `MISTRAL_BASE_URL` - LLM API base URL (default: https://api.mistral.ai)
//! - `WEATHER_BASE_URL` - Weather API base URL (default: http://api.weatherapi.com)
//! - `NEWS_BASE_URL` - News search base URL (default: https://serpapi.com)
//! - `DETECTION_BASE_URL` - Disease classifier base URL (default: https://agrisetu.onrender.com)
//! - `LIBRETRANSLATE_BASE_URL` / `MYMEMORY_BASE_URL` / `LINGVA_BASE_URL` -
//!   translation provider base URLs (defaults: the public instances)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// LLM provider configuration
    pub mistral: MistralConfig,
    /// Weather API configuration
    pub weather: WeatherConfig,
    /// News search API configuration
    pub news: NewsConfig,
    /// Disease classifier configuration
    pub detection: DetectionConfig,
    /// Translation provider configuration
    pub translate: TranslateConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// LLM provider (Mistral chat completions) configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct MistralConfig {
    /// API base URL (e.g., https://api.mistral.ai)
    pub base_url: String,
    /// Model name (e.g., mistral-large-latest)
    pub model: String,
    /// API key
    pub api_key: SecretString,
}

impl std::fmt::Debug for MistralConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MistralConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// weatherapi.com configuration.
#[derive(Clone)]
pub struct WeatherConfig {
    /// API base URL (e.g., http://api.weatherapi.com)
    pub base_url: String,
    /// API key
    pub api_key: SecretString,
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// SerpAPI (Google News engine) configuration.
#[derive(Clone)]
pub struct NewsConfig {
    /// API base URL (e.g., https://serpapi.com)
    pub base_url: String,
    /// API key
    pub api_key: SecretString,
}

impl std::fmt::Debug for NewsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Disease classifier endpoint configuration.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Classifier base URL; the model is served at `POST {base_url}/predict`.
    pub base_url: String,
}

/// Translation provider base URLs.
///
/// Three independent public providers, tried in this order. All are
/// keyless, so there is nothing to redact here.
#[derive(Debug, Clone)]
pub struct TranslateConfig {
    /// LibreTranslate instance base URL
    pub libretranslate_base_url: String,
    /// MyMemory base URL
    pub mymemory_base_url: String,
    /// Lingva base URL
    pub lingva_base_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("AGRISETU_DATABASE_URL")?;
        let host = get_env_or_default("AGRISETU_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("AGRISETU_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("AGRISETU_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("AGRISETU_PORT".to_string(), e.to_string()))?;

        let mistral = MistralConfig::from_env()?;
        let weather = WeatherConfig::from_env()?;
        let news = NewsConfig::from_env()?;
        let detection = DetectionConfig::from_env();
        let translate = TranslateConfig::from_env();

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            mistral,
            weather,
            news,
            detection,
            translate,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl MistralConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_env_or_default("MISTRAL_BASE_URL", "https://api.mistral.ai"),
            model: get_env_or_default("MISTRAL_MODEL", "mistral-large-latest"),
            api_key: get_validated_secret("MISTRAL_API_KEY")?,
        })
    }
}

impl WeatherConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_env_or_default("WEATHER_BASE_URL", "http://api.weatherapi.com"),
            api_key: get_validated_secret("WEATHER_API_KEY")?,
        })
    }
}

impl NewsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_env_or_default("NEWS_BASE_URL", "https://serpapi.com"),
            api_key: get_validated_secret("NEWS_API_KEY")?,
        })
    }
}

impl DetectionConfig {
    fn from_env() -> Self {
        Self {
            base_url: get_env_or_default("DETECTION_BASE_URL", "https://agrisetu.onrender.com"),
        }
    }
}

impl TranslateConfig {
    fn from_env() -> Self {
        Self {
            libretranslate_base_url: get_env_or_default(
                "LIBRETRANSLATE_BASE_URL",
                "https://libretranslate.de",
            ),
            mymemory_base_url: get_env_or_default(
                "MYMEMORY_BASE_URL",
                "https://api.mymemory.translated.net",
            ),
            lingva_base_url: get_env_or_default("LINGVA_BASE_URL", "https://lingva.ml"),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    // Try primary key first (e.g., AGRISETU_DATABASE_URL)
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    // Fallback to generic DATABASE_URL (set by managed postgres attach)
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the real key from the provider dashboard."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
