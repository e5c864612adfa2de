//! Conversation CRUD route handlers.
//!
//! All routes are owner-scoped: the gateway-authenticated user only ever
//! sees their own conversations.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use agrisetu_core::{ApiResponse, ConversationId, LanguageCode, MessageRole};

use crate::db::ConversationRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::conversation::{Conversation, ConversationLocation, ConversationSummary, Message};
use crate::state::AppState;

/// Conversation creation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    /// Title; defaults until the first user message provides one.
    pub title: Option<String>,
    /// Preferred language (default: en).
    pub user_language: Option<String>,
    /// Location captured at conversation start.
    pub location: Option<ConversationLocation>,
}

/// Message append request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMessageRequest {
    /// Who said it.
    pub role: MessageRole,
    /// What was said.
    pub content: String,
    /// Language of the message (default: en).
    pub user_language: Option<String>,
}

/// Title update request.
#[derive(Debug, Deserialize)]
pub struct UpdateTitleRequest {
    pub title: String,
}

/// Message append response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedMessage {
    /// The stored message.
    pub message: Message,
    /// Conversation it was appended to.
    pub conversation_id: ConversationId,
}

fn parse_language(raw: Option<&str>) -> Result<LanguageCode> {
    match raw {
        None => Ok(LanguageCode::english()),
        Some(raw) => LanguageCode::parse(raw)
            .map_err(|e| AppError::BadRequest(format!("Invalid language: {e}"))),
    }
}

/// Create a conversation.
#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Json(request): Json<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Conversation>>)> {
    let language = parse_language(request.user_language.as_deref())?;

    let conversation = ConversationRepository::new(state.pool())
        .create(
            user_id,
            request.title.as_deref(),
            &language,
            request.location.as_ref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(conversation))))
}

/// List the caller's conversations, most recently updated first.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
) -> Result<Json<ApiResponse<Vec<ConversationSummary>>>> {
    let conversations = ConversationRepository::new(state.pool())
        .list_for_user(user_id)
        .await?;

    Ok(Json(ApiResponse::ok(conversations)))
}

/// Get one conversation with all its messages.
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Path(conversation_id): Path<ConversationId>,
) -> Result<Json<ApiResponse<Conversation>>> {
    let conversation = ConversationRepository::new(state.pool())
        .get(user_id, conversation_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Conversation".to_string()))?;

    Ok(Json(ApiResponse::ok(conversation)))
}

/// Append a message to a conversation.
#[instrument(skip(state, request))]
pub async fn add_message(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Path(conversation_id): Path<ConversationId>,
    Json(request): Json<AddMessageRequest>,
) -> Result<Json<ApiResponse<AddedMessage>>> {
    if request.content.trim().is_empty() {
        return Err(AppError::BadRequest("Message content is required".to_string()));
    }

    let language = parse_language(request.user_language.as_deref())?;

    let message = ConversationRepository::new(state.pool())
        .add_message(
            user_id,
            conversation_id,
            request.role,
            &request.content,
            &language,
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Conversation".to_string())
            }
            other => AppError::Database(other),
        })?;

    Ok(Json(ApiResponse::ok(AddedMessage {
        message,
        conversation_id,
    })))
}

/// Rename a conversation.
#[instrument(skip(state, request))]
pub async fn update_title(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Path(conversation_id): Path<ConversationId>,
    Json(request): Json<UpdateTitleRequest>,
) -> Result<Json<ApiResponse<Conversation>>> {
    if request.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }

    let conversation = ConversationRepository::new(state.pool())
        .update_title(user_id, conversation_id, request.title.trim())
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Conversation".to_string())
            }
            other => AppError::Database(other),
        })?;

    Ok(Json(ApiResponse::ok(conversation)))
}

/// Delete one conversation.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Path(conversation_id): Path<ConversationId>,
) -> Result<Json<ApiResponse<()>>> {
    let deleted = ConversationRepository::new(state.pool())
        .delete(user_id, conversation_id)
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Conversation".to_string()));
    }

    Ok(Json(ApiResponse::ok_with_message(
        (),
        "Conversation deleted successfully",
    )))
}

/// Delete all of the caller's conversations.
#[instrument(skip(state))]
pub async fn clear_all(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
) -> Result<Json<ApiResponse<()>>> {
    ConversationRepository::new(state.pool())
        .clear_for_user(user_id)
        .await?;

    Ok(Json(ApiResponse::ok_with_message(
        (),
        "All conversations cleared successfully",
    )))
}
