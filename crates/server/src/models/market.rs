//! Marketplace catalog domain types.

use rust_decimal::Decimal;
use serde::Serialize;

use agrisetu_core::MarketItemId;

/// A marketplace catalog entry.
///
/// Items have no owner; carts reference them weakly by ID.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketItem {
    /// Unique item ID.
    pub id: MarketItemId,
    /// Product name.
    pub product_name: String,
    /// Product description.
    pub description: String,
    /// Product image URL.
    pub image_url: String,
    /// Unit price.
    pub price: Decimal,
    /// Catalog category (e.g., "seeds", "tools").
    pub category: String,
    /// Units in stock.
    pub quantity: i32,
}
