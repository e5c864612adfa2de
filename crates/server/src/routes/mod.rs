//! HTTP route handlers for the API server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness check
//! GET  /health/ready                        - Readiness check (database)
//!
//! # News & weather
//! GET  /api/v1/news/agriculture             - Paginated agriculture headlines
//! POST /api/v1/weather                      - 7-day forecast passthrough
//!
//! # Advisory (LLM-backed, strict rate limit)
//! POST /api/v1/disease-detection            - Classifier + advice
//! POST /api/v1/agricultural-chatbot         - Kisaan Guru chatbot
//! POST /api/v1/crop-recommendations         - Seasonal crop recommendations
//! POST /api/v1/analytics/crop-pricing       - Crop pricing analysis
//! POST /api/v1/analytics/crop-trends        - 12-month price trends
//! POST /api/v1/market/cart-command          - Voice cart-command classification
//!
//! # Translation
//! POST /api/v1/translate                    - Provider fallback chain
//! GET  /api/v1/languages                    - Supported languages
//!
//! # Conversations (owner-scoped)
//! POST   /api/v1/conversations              - Create
//! GET    /api/v1/conversations              - List summaries
//! GET    /api/v1/conversations/{id}         - Get with messages
//! POST   /api/v1/conversations/{id}/messages - Append message
//! PUT    /api/v1/conversations/{id}/title   - Rename
//! DELETE /api/v1/conversations/{id}         - Delete one
//! DELETE /api/v1/conversations              - Clear all
//!
//! # Speech
//! POST /api/v1/speech/recognize             - Web Speech API acknowledgement
//! GET  /api/v1/speech/languages             - Speech locale catalog
//!
//! # Market
//! POST /api/v1/market/additem               - Create catalog item
//! GET  /api/v1/market/getallitems           - Full catalog
//! POST /api/v1/market/addtocart             - Upsert-increment a cart line
//! PUT  /api/v1/market/increasequantity      - +1 on a cart line
//! PUT  /api/v1/market/decreasequantity      - -1 on a cart line (removes at 0)
//! GET  /api/v1/market/cart-details          - Cart joined with item details
//!
//! # Crops
//! GET  /api/v1/crops/{cropName}             - Static crop reference
//! POST /api/v1/crop-selection               - Save selection
//! ```

pub mod advice;
pub mod analytics;
pub mod conversations;
pub mod crops;
pub mod market;
pub mod news;
pub mod speech;
pub mod translate;
pub mod weather;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::{api_rate_limiter, llm_rate_limiter};
use crate::state::AppState;

/// Create the conversation routes router.
pub fn conversation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(conversations::create)
                .get(conversations::list)
                .delete(conversations::clear_all),
        )
        .route(
            "/{conversation_id}",
            get(conversations::get).delete(conversations::delete),
        )
        .route(
            "/{conversation_id}/messages",
            post(conversations::add_message),
        )
        .route(
            "/{conversation_id}/title",
            put(conversations::update_title),
        )
}

/// Create the market routes router (CRUD surface).
pub fn market_routes() -> Router<AppState> {
    Router::new()
        .route("/additem", post(market::add_item))
        .route("/getallitems", get(market::get_all_items))
        .route("/addtocart", post(market::add_to_cart))
        .route("/increasequantity", put(market::increase_quantity))
        .route("/decreasequantity", put(market::decrease_quantity))
        .route("/cart-details", get(market::cart_details))
}

/// Routes that fan out to the metered LLM API; strictly rate limited.
fn llm_routes() -> Router<AppState> {
    Router::new()
        .route("/disease-detection", post(advice::disease_detection))
        .route("/agricultural-chatbot", post(advice::chatbot))
        .route("/crop-recommendations", post(crops::recommendations))
        .route("/analytics/crop-pricing", post(analytics::crop_pricing))
        .route("/analytics/crop-trends", post(analytics::crop_trends))
        .route("/market/cart-command", post(market::cart_command))
        .layer(llm_rate_limiter())
}

/// Everything else under /api/v1.
fn general_routes() -> Router<AppState> {
    Router::new()
        .route("/news/agriculture", get(news::agriculture))
        .route("/weather", post(weather::forecast))
        .route("/translate", post(translate::translate))
        .route("/languages", get(translate::languages))
        .nest("/conversations", conversation_routes())
        .route("/speech/recognize", post(speech::recognize))
        .route("/speech/languages", get(speech::languages))
        .nest("/market", market_routes())
        .route("/crops/{crop_name}", get(crops::details))
        .route("/crop-selection", post(crops::save_selection))
        .layer(api_rate_limiter())
}

/// Create all routes for the API server.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api/v1", general_routes().merge(llm_routes()))
}
