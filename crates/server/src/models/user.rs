//! User and cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use agrisetu_core::{MarketItemId, UserId};

/// An AgriSetu user (domain type).
///
/// Credentials live with the fronting gateway; this row is the profile the
/// API owns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address (unique).
    pub email: String,
    /// Avatar image URL, if set.
    pub avatar_url: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A cart line: one (user, market item) pair with a quantity.
///
/// The `(user_id, market_item_id)` pair is unique, so adding an item that
/// is already in the cart increments `quantity` instead of inserting a
/// second row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// The referenced catalog item.
    pub item_id: MarketItemId,
    /// Units of the item in the cart, always >= 1.
    pub quantity: i32,
}

/// A cart line joined with its catalog item details.
///
/// Item references are weak: a line whose item has been deleted from the
/// catalog is dropped by the join rather than surfaced half-empty.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineDetail {
    /// The referenced catalog item.
    pub item_id: MarketItemId,
    /// Units of the item in the cart.
    pub quantity: i32,
    /// Catalog name of the item.
    pub product_name: String,
    /// Catalog description.
    pub description: String,
    /// Catalog image URL.
    pub image_url: String,
    /// Unit price.
    pub price: Decimal,
    /// Catalog category.
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_line_wire_names() {
        let line = CartLine {
            item_id: MarketItemId::new(3),
            quantity: 2,
        };
        let json = serde_json::to_value(&line).expect("serialize");
        assert_eq!(json["itemId"], 3);
        assert_eq!(json["quantity"], 2);
    }

    #[test]
    fn test_user_serializes_optional_avatar() {
        let user = User {
            id: UserId::new(1),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            avatar_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).expect("serialize");
        assert_eq!(json["avatarUrl"], serde_json::Value::Null);
    }
}
