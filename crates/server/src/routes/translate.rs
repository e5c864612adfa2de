//! Translation route handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use agrisetu_core::{ApiResponse, LanguageCode};

use crate::clients::translate::Language;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Translation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    /// English text to translate.
    pub text: String,
    /// Target language code.
    pub target_language: String,
}

/// Successful translation payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationData {
    pub translated_text: String,
    pub source_language: &'static str,
    pub target_language: LanguageCode,
    pub confidence: f32,
}

/// Failure payload carrying the untranslated input as a degraded fallback.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationFailure {
    pub success: bool,
    pub error: &'static str,
    pub message: &'static str,
    pub fallback_text: String,
}

/// Translate English text through the provider fallback chain.
#[instrument(skip(state, request))]
pub async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Response> {
    if request.text.trim().is_empty() || request.target_language.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Text and target language are required".to_string(),
        ));
    }

    let target = LanguageCode::parse(&request.target_language)
        .map_err(|e| AppError::BadRequest(format!("Invalid target language: {e}")))?;

    match state.translation().translate(&request.text, &target).await {
        Ok(translation) => {
            tracing::debug!(provider = translation.provider.as_str(), "translation served");
            let data = TranslationData {
                translated_text: translation.text,
                source_language: "en",
                target_language: target,
                confidence: translation.confidence,
            };
            Ok(Json(ApiResponse::ok(data)).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "translation chain exhausted");
            // Degraded fallback: echo the input so the frontend can still render
            let failure = TranslationFailure {
                success: false,
                error: "Translation service unavailable",
                message: "Please try again later or use the English version",
                fallback_text: request.text,
            };
            Ok((StatusCode::BAD_GATEWAY, Json(failure)).into_response())
        }
    }
}

/// List supported languages.
///
/// Never fails: the client substitutes its built-in list when the provider
/// is unreachable.
#[instrument(skip(state))]
pub async fn languages(State(state): State<AppState>) -> Json<ApiResponse<Vec<Language>>> {
    let languages = state.translation().languages().await;
    Json(ApiResponse::ok(languages))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_payload_shape() {
        let failure = TranslationFailure {
            success: false,
            error: "Translation service unavailable",
            message: "Please try again later or use the English version",
            fallback_text: "Hello farmer".to_string(),
        };

        let json = serde_json::to_value(&failure).expect("serialize");
        assert_eq!(json["success"], false);
        assert_eq!(json["fallbackText"], "Hello farmer");
    }

    #[test]
    fn test_translation_data_shape() {
        let data = TranslationData {
            translated_text: "नमस्ते किसान".to_string(),
            source_language: "en",
            target_language: LanguageCode::parse("hi").expect("parse"),
            confidence: 0.9,
        };

        let json = serde_json::to_value(&data).expect("serialize");
        assert_eq!(json["sourceLanguage"], "en");
        assert_eq!(json["targetLanguage"], "hi");
        assert_eq!(json["translatedText"], "नमस्ते किसान");
    }
}
