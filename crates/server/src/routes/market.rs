//! Marketplace route handlers.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use agrisetu_core::{ApiResponse, MarketItemId};

use crate::db::{MarketRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::market::MarketItem;
use crate::models::user::{CartLine, CartLineDetail};
use crate::services::cart_assist::{CartAssistant, CartCommandAnalysis};
use crate::state::AppState;

/// Catalog item creation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_name: String,
    pub description: String,
    pub image_url: String,
    pub price: Decimal,
    pub category: String,
    pub quantity: i32,
}

/// Cart mutation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub item_id: MarketItemId,
}

/// Voice cart-command request.
#[derive(Debug, Deserialize)]
pub struct CartCommandRequest {
    pub transcript: String,
}

/// Voice cart-command response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCommandResponse {
    /// What the model made of the transcript.
    pub analysis: CartCommandAnalysis,
    /// The cart as it stands.
    pub current_cart: Vec<CartLine>,
}

/// Create a catalog item.
#[instrument(skip(state, request))]
pub async fn add_item(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<ApiResponse<MarketItem>>> {
    let text_fields = [
        &request.product_name,
        &request.description,
        &request.image_url,
        &request.category,
    ];
    if text_fields.iter().any(|field| field.trim().is_empty()) {
        return Err(AppError::BadRequest("no data found".to_string()));
    }
    if request.price <= Decimal::ZERO || request.quantity < 0 {
        return Err(AppError::BadRequest(
            "price and quantity must be positive".to_string(),
        ));
    }

    let item = MarketRepository::new(state.pool())
        .create(
            request.product_name.trim(),
            request.description.trim(),
            request.image_url.trim(),
            request.price,
            request.category.trim(),
            request.quantity,
        )
        .await?;

    Ok(Json(ApiResponse::ok(item)))
}

/// List the whole catalog.
#[instrument(skip(state))]
pub async fn get_all_items(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MarketItem>>>> {
    let items = MarketRepository::new(state.pool()).list_all().await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// Add one unit of an item to the caller's cart.
///
/// Adding an item that is already in the cart increments its quantity;
/// a duplicate line is impossible.
#[instrument(skip(state))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Json(request): Json<CartItemRequest>,
) -> Result<Json<ApiResponse<Vec<CartLine>>>> {
    let users = UserRepository::new(state.pool());

    if users.get_by_id(user_id).await?.is_none() {
        return Err(AppError::NotFound("User".to_string()));
    }

    let cart = users
        .add_to_cart(user_id, request.item_id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("Item".to_string()),
            other => AppError::Database(other),
        })?;

    Ok(Json(ApiResponse::ok(cart)))
}

/// Increment a cart line's quantity.
#[instrument(skip(state))]
pub async fn increase_quantity(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Json(request): Json<CartItemRequest>,
) -> Result<Json<ApiResponse<Vec<CartLine>>>> {
    let users = UserRepository::new(state.pool());

    users
        .increase_quantity(user_id, request.item_id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Cart item".to_string())
            }
            other => AppError::Database(other),
        })?;

    Ok(Json(ApiResponse::ok(users.get_cart(user_id).await?)))
}

/// Decrement a cart line's quantity, removing it at zero.
#[instrument(skip(state))]
pub async fn decrease_quantity(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Json(request): Json<CartItemRequest>,
) -> Result<Json<ApiResponse<Vec<CartLine>>>> {
    let users = UserRepository::new(state.pool());

    users
        .decrease_quantity(user_id, request.item_id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Cart item".to_string())
            }
            other => AppError::Database(other),
        })?;

    Ok(Json(ApiResponse::ok(users.get_cart(user_id).await?)))
}

/// Get the caller's cart joined with item details.
#[instrument(skip(state))]
pub async fn cart_details(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
) -> Result<Json<ApiResponse<Vec<CartLineDetail>>>> {
    let details = UserRepository::new(state.pool())
        .cart_details(user_id)
        .await?;

    Ok(Json(ApiResponse::ok(details)))
}

/// Classify a voice cart command.
#[instrument(skip(state, request))]
pub async fn cart_command(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    Json(request): Json<CartCommandRequest>,
) -> Result<Json<ApiResponse<CartCommandResponse>>> {
    if request.transcript.trim().is_empty() {
        return Err(AppError::BadRequest("Transcript is required".to_string()));
    }

    let users = UserRepository::new(state.pool());
    if users.get_by_id(user_id).await?.is_none() {
        return Err(AppError::NotFound("User".to_string()));
    }

    let analysis = CartAssistant::new(state.mistral())
        .analyze(&request.transcript)
        .await?;
    let current_cart = users.get_cart(user_id).await?;

    Ok(Json(ApiResponse::ok(CartCommandResponse {
        analysis,
        current_cart,
    })))
}
