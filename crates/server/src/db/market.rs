//! Database operations for the marketplace catalog.

use rust_decimal::Decimal;
use sqlx::PgPool;

use agrisetu_core::MarketItemId;

use super::RepositoryError;
use crate::models::market::MarketItem;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct MarketItemRow {
    id: i32,
    product_name: String,
    description: String,
    image_url: String,
    price: Decimal,
    category: String,
    quantity: i32,
}

impl From<MarketItemRow> for MarketItem {
    fn from(row: MarketItemRow) -> Self {
        Self {
            id: MarketItemId::new(row.id),
            product_name: row.product_name,
            description: row.description,
            image_url: row.image_url,
            price: row.price,
            category: row.category,
            quantity: row.quantity,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for marketplace catalog operations.
pub struct MarketRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MarketRepository<'a> {
    /// Create a new market repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new catalog item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        product_name: &str,
        description: &str,
        image_url: &str,
        price: Decimal,
        category: &str,
        quantity: i32,
    ) -> Result<MarketItem, RepositoryError> {
        let row = sqlx::query_as::<_, MarketItemRow>(
            r"
            INSERT INTO market_item
                (product_name, description, image_url, price, category, quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, product_name, description, image_url, price, category, quantity
            ",
        )
        .bind(product_name)
        .bind(description)
        .bind(image_url)
        .bind(price)
        .bind(category)
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List the whole catalog, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<MarketItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, MarketItemRow>(
            r"
            SELECT id, product_name, description, image_url, price, category, quantity
            FROM market_item
            ORDER BY id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(MarketItem::from).collect())
    }
}
