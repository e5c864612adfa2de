//! Weather forecast route handler.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use agrisetu_core::ApiResponse;

use crate::error::Result;
use crate::state::AppState;

/// Coordinates for the forecast request.
#[derive(Debug, Deserialize)]
pub struct WeatherRequest {
    pub lat: f64,
    pub lon: f64,
}

/// Fetch the 7-day forecast with alerts for a coordinate pair.
///
/// The upstream payload is passed through unmodified inside the envelope.
#[instrument(skip(state))]
pub async fn forecast(
    State(state): State<AppState>,
    Json(request): Json<WeatherRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let forecast = state.weather().forecast(request.lat, request.lon).await?;

    Ok(Json(ApiResponse::ok_with_message(
        forecast,
        "weather forecasted successfully",
    )))
}
