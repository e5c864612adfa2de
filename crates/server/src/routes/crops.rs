//! Crop recommendation route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use agrisetu_core::{ApiResponse, UserId};

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::services::LocationPayload;
use crate::services::chatbot::HistoryEntry;
use crate::services::recommend::{CropAdvisor, CropDetails, RecommendationReport, crop_reference};
use crate::state::AppState;

/// Crop recommendation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    /// Caller location; coordinates are required.
    pub location: Option<LocationPayload>,
    /// Prior chat turns for personalization.
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
}

/// Crop selection request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropSelectionRequest {
    /// Whatever the frontend's picker produced.
    pub selected_crops: serde_json::Value,
}

/// Crop selection echo payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropSelectionData {
    pub selected_crops: serde_json::Value,
    pub user_id: UserId,
}

/// Recommend crops for the caller's location and season.
#[instrument(skip(state, request))]
pub async fn recommendations(
    State(state): State<AppState>,
    RequireUser(_user_id): RequireUser,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<ApiResponse<RecommendationReport>>> {
    let location = request
        .location
        .and_then(LocationPayload::into_input)
        .ok_or_else(|| {
            AppError::BadRequest("Location coordinates (lat, lon) are required".to_string())
        })?;

    let advisor = CropAdvisor::new(state.mistral(), state.weather());
    let report = advisor
        .recommend(&location, &request.conversation_history)
        .await?;

    Ok(Json(ApiResponse::ok(report)))
}

/// Static reference entry for one crop.
#[instrument]
pub async fn details(Path(crop_name): Path<String>) -> Result<Json<ApiResponse<CropDetails>>> {
    let details = crop_reference(&crop_name)
        .ok_or_else(|| AppError::NotFound("Crop details".to_string()))?;

    Ok(Json(ApiResponse::ok(details)))
}

/// Save the caller's crop selection.
#[instrument(skip(request))]
pub async fn save_selection(
    RequireUser(user_id): RequireUser,
    Json(request): Json<CropSelectionRequest>,
) -> Result<Json<ApiResponse<CropSelectionData>>> {
    Ok(Json(ApiResponse::ok_with_message(
        CropSelectionData {
            selected_crops: request.selected_crops,
            user_id,
        },
        "Crop selection saved successfully",
    )))
}
