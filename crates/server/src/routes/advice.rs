//! Disease detection and chatbot route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use agrisetu_core::{ApiResponse, LanguageCode};

use crate::error::{AppError, Result};
use crate::models::conversation::ConversationLocation;
use crate::services::advice::{DiseaseAdvisor, DiseaseReport};
use crate::services::chatbot::{Chatbot, ChatbotReply, HistoryEntry};
use crate::state::AppState;

/// Disease detection request.
#[derive(Debug, Deserialize)]
pub struct DiseaseRequest {
    /// URL of the uploaded plant image.
    pub image_url: String,
}

/// Detect a plant disease from an image and advise on it.
#[instrument(skip(state, request))]
pub async fn disease_detection(
    State(state): State<AppState>,
    Json(request): Json<DiseaseRequest>,
) -> Result<Json<ApiResponse<DiseaseReport>>> {
    if request.image_url.trim().is_empty() {
        return Err(AppError::BadRequest("image_url is required".to_string()));
    }

    let advisor = DiseaseAdvisor::new(state.detection(), state.mistral());
    let report = advisor.analyze(&request.image_url).await?;

    Ok(Json(ApiResponse::ok(report)))
}

/// Chatbot request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotRequest {
    /// The user's message.
    pub message: String,
    /// Preferred reply language (default: en).
    pub user_language: Option<String>,
    /// Prior turns for context.
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
    /// Caller location for region-specific advice.
    pub location: Option<ConversationLocation>,
}

/// Answer an agricultural question.
#[instrument(skip(state, request))]
pub async fn chatbot(
    State(state): State<AppState>,
    Json(request): Json<ChatbotRequest>,
) -> Result<Json<ApiResponse<ChatbotReply>>> {
    if request.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message is required".to_string()));
    }

    let language = match request.user_language.as_deref() {
        None => LanguageCode::english(),
        Some(raw) => LanguageCode::parse(raw)
            .map_err(|e| AppError::BadRequest(format!("Invalid language: {e}")))?,
    };

    let chatbot = Chatbot::new(state.mistral());
    let reply = chatbot
        .respond(
            &request.message,
            &language,
            &request.conversation_history,
            request.location.as_ref(),
        )
        .await?;

    Ok(Json(ApiResponse::ok(reply)))
}
