//! User and cart repository for database operations.
//!
//! Queries use the runtime sqlx API with `FromRow` row structs; rows are
//! converted to domain types at the repository boundary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use agrisetu_core::{MarketItemId, UserId};

use super::RepositoryError;
use crate::models::user::{CartLine, CartLineDetail, User};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            name: row.name,
            email: row.email,
            avatar_url: row.avatar_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    market_item_id: i32,
    quantity: i32,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            item_id: MarketItemId::new(row.market_item_id),
            quantity: row.quantity,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CartLineDetailRow {
    market_item_id: i32,
    quantity: i32,
    product_name: String,
    description: String,
    image_url: String,
    price: Decimal,
    category: String,
}

impl From<CartLineDetailRow> for CartLineDetail {
    fn from(row: CartLineDetailRow) -> Self {
        Self {
            item_id: MarketItemId::new(row.market_item_id),
            quantity: row.quantity,
            product_name: row.product_name,
            description: row.description,
            image_url: row.image_url,
            price: row.price,
            category: row.category,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user and cart database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, avatar_url, created_at, updated_at
            FROM app_user
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// Get all cart lines for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_cart(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT market_item_id, quantity
            FROM cart_item
            WHERE user_id = $1
            ORDER BY added_at ASC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CartLine::from).collect())
    }

    /// Add one unit of an item to a user's cart.
    ///
    /// If the item is already in the cart its quantity is incremented by
    /// one; the unique `(user_id, market_item_id)` index makes a duplicate
    /// line impossible.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the catalog item does not
    /// exist, `RepositoryError::Database` for other database errors.
    pub async fn add_to_cart(
        &self,
        user_id: UserId,
        item_id: MarketItemId,
    ) -> Result<Vec<CartLine>, RepositoryError> {
        // Catalog references are weak (no FK), so check existence explicitly.
        let exists: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM market_item WHERE id = $1")
                .bind(item_id.as_i32())
                .fetch_optional(self.pool)
                .await?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query(
            r"
            INSERT INTO cart_item (user_id, market_item_id, quantity)
            VALUES ($1, $2, 1)
            ON CONFLICT (user_id, market_item_id)
            DO UPDATE SET quantity = cart_item.quantity + 1
            ",
        )
        .bind(user_id.as_i32())
        .bind(item_id.as_i32())
        .execute(self.pool)
        .await?;

        self.get_cart(user_id).await
    }

    /// Increment a cart line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist,
    /// `RepositoryError::Database` for other database errors.
    pub async fn increase_quantity(
        &self,
        user_id: UserId,
        item_id: MarketItemId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cart_item
            SET quantity = quantity + 1
            WHERE user_id = $1 AND market_item_id = $2
            ",
        )
        .bind(user_id.as_i32())
        .bind(item_id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Decrement a cart line's quantity by one, removing the line when it
    /// reaches zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist,
    /// `RepositoryError::Database` for other database errors.
    pub async fn decrease_quantity(
        &self,
        user_id: UserId,
        item_id: MarketItemId,
    ) -> Result<(), RepositoryError> {
        let updated = sqlx::query(
            r"
            UPDATE cart_item
            SET quantity = quantity - 1
            WHERE user_id = $1 AND market_item_id = $2 AND quantity > 1
            ",
        )
        .bind(user_id.as_i32())
        .bind(item_id.as_i32())
        .execute(self.pool)
        .await?;

        if updated.rows_affected() > 0 {
            return Ok(());
        }

        let deleted = sqlx::query(
            r"
            DELETE FROM cart_item
            WHERE user_id = $1 AND market_item_id = $2
            ",
        )
        .bind(user_id.as_i32())
        .bind(item_id.as_i32())
        .execute(self.pool)
        .await?;

        if deleted.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Get a user's cart lines joined with catalog item details.
    ///
    /// Lines whose item no longer exists in the catalog are omitted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn cart_details(
        &self,
        user_id: UserId,
    ) -> Result<Vec<CartLineDetail>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineDetailRow>(
            r"
            SELECT c.market_item_id, c.quantity,
                   m.product_name, m.description, m.image_url, m.price, m.category
            FROM cart_item c
            JOIN market_item m ON m.id = c.market_item_id
            WHERE c.user_id = $1
            ORDER BY c.added_at ASC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CartLineDetail::from).collect())
    }
}
