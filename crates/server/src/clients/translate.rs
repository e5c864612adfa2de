//! Multi-provider translation client.
//!
//! Three free public providers are tried in a fixed order; the first
//! non-empty result wins. None of them is reliable on its own, which is
//! the whole reason this chain exists.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{instrument, warn};

use agrisetu_core::LanguageCode;

use crate::config::TranslateConfig;

/// Confidence reported for chain translations.
///
/// The free providers don't report one; this is the historical constant the
/// frontend displays.
const CHAIN_CONFIDENCE: f32 = 0.9;

/// Errors that can occur during translation.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Every provider in the chain failed.
    #[error("all translation services failed")]
    AllProvidersFailed,

    /// A single provider call failed (internal, drives the chain).
    #[error("provider error: {0}")]
    Provider(String),
}

/// Which provider produced a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    LibreTranslate,
    MyMemory,
    Lingva,
}

impl Provider {
    /// Provider name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LibreTranslate => "libretranslate",
            Self::MyMemory => "mymemory",
            Self::Lingva => "lingva",
        }
    }
}

/// A successful translation and its provenance.
#[derive(Debug, Clone)]
pub struct Translation {
    /// Translated text.
    pub text: String,
    /// Provider that produced it.
    pub provider: Provider,
    /// Reported confidence (constant for the free chain).
    pub confidence: f32,
}

/// A supported language entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    /// ISO 639-1 code.
    pub code: String,
    /// English name.
    pub name: String,
}

/// Built-in language list served when the provider's list is unreachable.
const FALLBACK_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("hi", "Hindi"),
    ("bn", "Bengali"),
    ("te", "Telugu"),
    ("ta", "Tamil"),
    ("mr", "Marathi"),
    ("gu", "Gujarati"),
    ("kn", "Kannada"),
    ("ml", "Malayalam"),
    ("pa", "Punjabi"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("ar", "Arabic"),
];

// =============================================================================
// Provider response shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct LibreTranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: Option<MyMemoryData>,
}

#[derive(Debug, Deserialize)]
struct MyMemoryData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LingvaResponse {
    translation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LibreLanguage {
    code: String,
    name: String,
}

/// Pull the translated text out of a provider body, rejecting empties.
fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

// =============================================================================
// Client
// =============================================================================

/// Client for the translation fallback chain.
#[derive(Clone)]
pub struct TranslationClient {
    inner: Arc<TranslationClientInner>,
}

struct TranslationClientInner {
    client: reqwest::Client,
    config: TranslateConfig,
}

impl TranslationClient {
    /// Create a new translation client.
    #[must_use]
    pub fn new(config: &TranslateConfig) -> Self {
        Self {
            inner: Arc::new(TranslationClientInner {
                client: reqwest::Client::new(),
                config: config.clone(),
            }),
        }
    }

    /// Translate English text to the target language.
    ///
    /// Tries LibreTranslate, then MyMemory, then Lingva; first non-empty
    /// result wins. Provider failures are logged and swallowed until the
    /// chain is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `TranslateError::AllProvidersFailed` when no provider
    /// produced a usable result.
    #[instrument(skip(self, text), fields(target = %target))]
    pub async fn translate(
        &self,
        text: &str,
        target: &LanguageCode,
    ) -> Result<Translation, TranslateError> {
        match self.libretranslate(text, target).await {
            Ok(translated) => {
                return Ok(Translation {
                    text: translated,
                    provider: Provider::LibreTranslate,
                    confidence: CHAIN_CONFIDENCE,
                });
            }
            Err(e) => warn!(provider = "libretranslate", error = %e, "provider failed, trying next"),
        }

        match self.mymemory(text, target).await {
            Ok(translated) => {
                return Ok(Translation {
                    text: translated,
                    provider: Provider::MyMemory,
                    confidence: CHAIN_CONFIDENCE,
                });
            }
            Err(e) => warn!(provider = "mymemory", error = %e, "provider failed, trying next"),
        }

        match self.lingva(text, target).await {
            Ok(translated) => Ok(Translation {
                text: translated,
                provider: Provider::Lingva,
                confidence: CHAIN_CONFIDENCE,
            }),
            Err(e) => {
                warn!(provider = "lingva", error = %e, "provider failed");
                Err(TranslateError::AllProvidersFailed)
            }
        }
    }

    /// Fetch the supported language list.
    ///
    /// Served from LibreTranslate when reachable, otherwise from the
    /// built-in fallback list. Never fails.
    #[instrument(skip(self))]
    pub async fn languages(&self) -> Vec<Language> {
        match self.libretranslate_languages().await {
            Ok(languages) if !languages.is_empty() => languages,
            Ok(_) | Err(_) => fallback_languages(),
        }
    }

    // =========================================================================
    // Providers
    // =========================================================================

    async fn libretranslate(
        &self,
        text: &str,
        target: &LanguageCode,
    ) -> Result<String, TranslateError> {
        let url = format!("{}/translate", self.inner.config.libretranslate_base_url);
        let body = serde_json::json!({
            "q": text,
            "source": "en",
            "target": target.as_str(),
            "format": "text",
        });

        let response = self
            .inner
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslateError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TranslateError::Provider(format!(
                "status {}",
                response.status()
            )));
        }

        let body: LibreTranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::Provider(e.to_string()))?;

        non_empty(body.translated_text)
            .ok_or_else(|| TranslateError::Provider("empty translation".to_string()))
    }

    async fn mymemory(&self, text: &str, target: &LanguageCode) -> Result<String, TranslateError> {
        let url = format!(
            "{}/get?q={}&langpair=en|{}",
            self.inner.config.mymemory_base_url,
            urlencoding::encode(text),
            target.as_str()
        );

        let response = self
            .inner
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TranslateError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TranslateError::Provider(format!(
                "status {}",
                response.status()
            )));
        }

        let body: MyMemoryResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::Provider(e.to_string()))?;

        non_empty(body.response_data.and_then(|d| d.translated_text))
            .ok_or_else(|| TranslateError::Provider("empty translation".to_string()))
    }

    async fn lingva(&self, text: &str, target: &LanguageCode) -> Result<String, TranslateError> {
        let url = format!(
            "{}/api/v1/en/{}/{}",
            self.inner.config.lingva_base_url,
            target.as_str(),
            urlencoding::encode(text)
        );

        let response = self
            .inner
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TranslateError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TranslateError::Provider(format!(
                "status {}",
                response.status()
            )));
        }

        let body: LingvaResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::Provider(e.to_string()))?;

        non_empty(body.translation)
            .ok_or_else(|| TranslateError::Provider("empty translation".to_string()))
    }

    async fn libretranslate_languages(&self) -> Result<Vec<Language>, TranslateError> {
        let url = format!("{}/languages", self.inner.config.libretranslate_base_url);

        let response = self
            .inner
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TranslateError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TranslateError::Provider(format!(
                "status {}",
                response.status()
            )));
        }

        let body: Vec<LibreLanguage> = response
            .json()
            .await
            .map_err(|e| TranslateError::Provider(e.to_string()))?;

        Ok(body
            .into_iter()
            .map(|l| Language {
                code: l.code,
                name: l.name,
            })
            .collect())
    }
}

/// The built-in language list as owned entries.
#[must_use]
pub fn fallback_languages() -> Vec<Language> {
    FALLBACK_LANGUAGES
        .iter()
        .map(|&(code, name)| Language {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect()
}
