//! Pricing analytics route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use agrisetu_core::ApiResponse;

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::services::LocationPayload;
use crate::services::analytics::{CropPricingView, PricingAnalytics, TrendReport};
use crate::state::AppState;

/// Crop pricing request.
#[derive(Debug, Deserialize)]
pub struct CropPricingRequest {
    /// Caller location; coordinates are required.
    pub location: Option<LocationPayload>,
}

/// Price trend request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropTrendsRequest {
    /// Crop to analyze.
    pub crop_name: Option<String>,
    /// Optional location context.
    pub location: Option<LocationPayload>,
}

/// Produce the crop pricing analysis for the caller's region.
#[instrument(skip(state, request))]
pub async fn crop_pricing(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Json(request): Json<CropPricingRequest>,
) -> Result<Json<ApiResponse<CropPricingView>>> {
    let location = request
        .location
        .and_then(LocationPayload::into_input)
        .ok_or_else(|| {
            AppError::BadRequest("Location coordinates (lat, lon) are required".to_string())
        })?;

    let analytics = PricingAnalytics::new(state.pool(), state.mistral(), state.weather());
    let view = analytics.crop_pricing(user_id, &location).await?;

    Ok(Json(ApiResponse::ok(view)))
}

/// Produce a 12-month price-trend report for one crop.
#[instrument(skip(state, request))]
pub async fn crop_trends(
    State(state): State<AppState>,
    RequireUser(_user_id): RequireUser,
    Json(request): Json<CropTrendsRequest>,
) -> Result<Json<ApiResponse<TrendReport>>> {
    let crop_name = request
        .crop_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::BadRequest("Crop name is required".to_string()))?;

    let location = request.location.and_then(LocationPayload::into_input);

    let analytics = PricingAnalytics::new(state.pool(), state.mistral(), state.weather());
    let report = analytics.price_trends(crop_name, location.as_ref()).await?;

    Ok(Json(ApiResponse::ok(report)))
}
