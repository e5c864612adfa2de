//! Speech route handlers.
//!
//! Recognition itself runs in the browser via the Web Speech API; the
//! server only acknowledges and serves the locale catalog.

use axum::Json;
use serde::Serialize;
use tracing::instrument;

use agrisetu_core::ApiResponse;

/// Acknowledgement payload for the recognize endpoint.
#[derive(Debug, Serialize)]
pub struct RecognitionAck {
    pub supported: bool,
    pub method: &'static str,
}

/// A speech locale entry.
#[derive(Debug, Clone, Serialize)]
pub struct SpeechLanguage {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

/// Locales the Web Speech API handles well for this audience.
const SPEECH_LANGUAGES: &[SpeechLanguage] = &[
    SpeechLanguage { code: "en-US", name: "English (US)", flag: "🇺🇸" },
    SpeechLanguage { code: "en-IN", name: "English (India)", flag: "🇮🇳" },
    SpeechLanguage { code: "hi-IN", name: "हिंदी (India)", flag: "🇮🇳" },
    SpeechLanguage { code: "bn-IN", name: "বাংলা (India)", flag: "🇮🇳" },
    SpeechLanguage { code: "te-IN", name: "తెలుగు (India)", flag: "🇮🇳" },
    SpeechLanguage { code: "ta-IN", name: "தமிழ் (India)", flag: "🇮🇳" },
    SpeechLanguage { code: "mr-IN", name: "मराठी (India)", flag: "🇮🇳" },
    SpeechLanguage { code: "gu-IN", name: "ગુજરાતી (India)", flag: "🇮🇳" },
    SpeechLanguage { code: "kn-IN", name: "ಕನ್ನಡ (India)", flag: "🇮🇳" },
    SpeechLanguage { code: "ml-IN", name: "മലയാളം (India)", flag: "🇮🇳" },
    SpeechLanguage { code: "pa-IN", name: "ਪੰਜਾਬੀ (India)", flag: "🇮🇳" },
    SpeechLanguage { code: "es-ES", name: "Español (Spain)", flag: "🇪🇸" },
    SpeechLanguage { code: "es-MX", name: "Español (Mexico)", flag: "🇲🇽" },
    SpeechLanguage { code: "fr-FR", name: "Français (France)", flag: "🇫🇷" },
    SpeechLanguage { code: "de-DE", name: "Deutsch (Germany)", flag: "🇩🇪" },
    SpeechLanguage { code: "zh-CN", name: "中文 (China)", flag: "🇨🇳" },
    SpeechLanguage { code: "ja-JP", name: "日本語 (Japan)", flag: "🇯🇵" },
    SpeechLanguage { code: "ko-KR", name: "한국어 (Korea)", flag: "🇰🇷" },
    SpeechLanguage { code: "ar-SA", name: "العربية (Saudi Arabia)", flag: "🇸🇦" },
];

/// Acknowledge a recognition request.
#[instrument]
pub async fn recognize() -> Json<ApiResponse<RecognitionAck>> {
    Json(ApiResponse::ok_with_message(
        RecognitionAck {
            supported: true,
            method: "Web Speech API",
        },
        "Speech recognition handled by frontend using Web Speech API",
    ))
}

/// List supported speech locales.
#[instrument]
pub async fn languages() -> Json<ApiResponse<Vec<SpeechLanguage>>> {
    Json(ApiResponse::ok(SPEECH_LANGUAGES.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_language_catalog() {
        assert_eq!(SPEECH_LANGUAGES.len(), 19);
        assert!(SPEECH_LANGUAGES.iter().any(|l| l.code == "hi-IN"));
        assert!(SPEECH_LANGUAGES.iter().any(|l| l.code == "en-US"));
    }

    #[test]
    fn test_locale_codes_are_bcp47_shaped() {
        for language in SPEECH_LANGUAGES {
            let mut parts = language.code.split('-');
            let primary = parts.next().unwrap_or_default();
            let region = parts.next().unwrap_or_default();
            assert_eq!(primary.len(), 2, "{}", language.code);
            assert_eq!(region.len(), 2, "{}", language.code);
        }
    }
}
