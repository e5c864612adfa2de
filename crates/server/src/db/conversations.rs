//! Database operations for conversations and messages.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use agrisetu_core::{ConversationId, LanguageCode, MessageId, MessageRole, UserId};

use super::RepositoryError;
use crate::models::conversation::{Conversation, ConversationLocation, ConversationSummary, Message};

/// Titles derived from the first user message are cut at this length.
const MAX_TITLE_LENGTH: usize = 50;

/// Default title until the first user message arrives.
const DEFAULT_TITLE: &str = "New conversation";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ConversationRow {
    id: i32,
    user_id: i32,
    title: String,
    user_language: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConversationRow {
    fn into_conversation(self, messages: Vec<Message>) -> Result<Conversation, RepositoryError> {
        let user_language = LanguageCode::parse(&self.user_language).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid language code in database: {e}"))
        })?;

        let location = ConversationLocation {
            latitude: self.latitude,
            longitude: self.longitude,
            city: self.city,
            state: self.state,
            country: self.country,
        };

        Ok(Conversation {
            id: ConversationId::new(self.id),
            user_id: UserId::new(self.user_id),
            title: self.title,
            user_language,
            location: if location.is_empty() {
                None
            } else {
                Some(location)
            },
            messages,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ConversationSummaryRow {
    id: i32,
    title: String,
    user_language: String,
    message_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ConversationSummaryRow> for ConversationSummary {
    type Error = RepositoryError;

    fn try_from(row: ConversationSummaryRow) -> Result<Self, Self::Error> {
        let user_language = LanguageCode::parse(&row.user_language).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid language code in database: {e}"))
        })?;

        Ok(Self {
            id: ConversationId::new(row.id),
            title: row.title,
            user_language,
            message_count: row.message_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i32,
    conversation_id: i32,
    role: MessageRole,
    content: String,
    user_language: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for Message {
    type Error = RepositoryError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let user_language = LanguageCode::parse(&row.user_language).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid language code in database: {e}"))
        })?;

        Ok(Self {
            id: MessageId::new(row.id),
            conversation_id: ConversationId::new(row.conversation_id),
            role: row.role,
            content: row.content,
            user_language,
            timestamp: row.created_at,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for conversation database operations.
///
/// Every method is scoped to the owning user: a conversation belonging to
/// someone else behaves exactly like one that doesn't exist.
pub struct ConversationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ConversationRepository<'a> {
    /// Create a new conversation repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new conversation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        title: Option<&str>,
        user_language: &LanguageCode,
        location: Option<&ConversationLocation>,
    ) -> Result<Conversation, RepositoryError> {
        let location = location.cloned().unwrap_or_default();

        let row = sqlx::query_as::<_, ConversationRow>(
            r"
            INSERT INTO conversation
                (user_id, title, user_language, latitude, longitude, city, state, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, title, user_language,
                      latitude, longitude, city, state, country,
                      created_at, updated_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(title.unwrap_or(DEFAULT_TITLE))
        .bind(user_language.as_str())
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(location.city)
        .bind(location.state)
        .bind(location.country)
        .fetch_one(self.pool)
        .await?;

        row.into_conversation(Vec::new())
    }

    /// List a user's conversations, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, ConversationSummaryRow>(
            r"
            SELECT c.id, c.title, c.user_language,
                   COUNT(m.id) AS message_count,
                   c.created_at, c.updated_at
            FROM conversation c
            LEFT JOIN message m ON m.conversation_id = c.id
            WHERE c.user_id = $1
            GROUP BY c.id
            ORDER BY c.updated_at DESC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a conversation with all its messages.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(
        &self,
        user_id: UserId,
        id: ConversationId,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r"
            SELECT id, user_id, title, user_language,
                   latitude, longitude, city, state, country,
                   created_at, updated_at
            FROM conversation
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let messages = self.get_messages(id).await?;
        Ok(Some(row.into_conversation(messages)?))
    }

    /// Get all messages in a conversation, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_messages(
        &self,
        conversation_id: ConversationId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r"
            SELECT id, conversation_id, role, content, user_language, created_at
            FROM message
            WHERE conversation_id = $1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(conversation_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Append a message to a conversation.
    ///
    /// Refreshes the conversation's `updated_at`, and derives the title from
    /// the content when this is the conversation's first user message.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the conversation doesn't exist
    /// (or is owned by someone else), `RepositoryError::Database` otherwise.
    pub async fn add_message(
        &self,
        user_id: UserId,
        conversation_id: ConversationId,
        role: MessageRole,
        content: &str,
        user_language: &LanguageCode,
    ) -> Result<Message, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let owned: Option<(i64,)> = sqlx::query_as(
            r"
            SELECT COUNT(m.id)
            FROM conversation c
            LEFT JOIN message m ON m.conversation_id = c.id
            WHERE c.id = $1 AND c.user_id = $2
            GROUP BY c.id
            ",
        )
        .bind(conversation_id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(&mut *tx)
        .await?;

        let Some((message_count,)) = owned else {
            return Err(RepositoryError::NotFound);
        };

        let row = sqlx::query_as::<_, MessageRow>(
            r"
            INSERT INTO message (conversation_id, role, content, user_language)
            VALUES ($1, $2, $3, $4)
            RETURNING id, conversation_id, role, content, user_language, created_at
            ",
        )
        .bind(conversation_id.as_i32())
        .bind(role)
        .bind(content)
        .bind(user_language.as_str())
        .fetch_one(&mut *tx)
        .await?;

        // First user message names the conversation.
        if role == MessageRole::User && message_count == 0 {
            let title = derive_title(content);
            sqlx::query(
                r"
                UPDATE conversation
                SET title = $1, updated_at = now()
                WHERE id = $2
                ",
            )
            .bind(title)
            .bind(conversation_id.as_i32())
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query("UPDATE conversation SET updated_at = now() WHERE id = $1")
                .bind(conversation_id.as_i32())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        row.try_into()
    }

    /// Rename a conversation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the conversation doesn't exist,
    /// `RepositoryError::Database` for other database errors.
    pub async fn update_title(
        &self,
        user_id: UserId,
        id: ConversationId,
        title: &str,
    ) -> Result<Conversation, RepositoryError> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r"
            UPDATE conversation
            SET title = $1, updated_at = now()
            WHERE id = $2 AND user_id = $3
            RETURNING id, user_id, title, user_language,
                      latitude, longitude, city, state, country,
                      created_at, updated_at
            ",
        )
        .bind(title)
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Err(RepositoryError::NotFound);
        };

        let messages = self.get_messages(id).await?;
        row.into_conversation(messages)
    }

    /// Delete a conversation and its messages.
    ///
    /// # Returns
    ///
    /// Returns `true` if the conversation was deleted, `false` if it
    /// didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        user_id: UserId,
        id: ConversationId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM conversation
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all of a user's conversations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear_for_user(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM conversation WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Fetch the concatenated message text of a user's most recent
    /// conversations, newest first.
    ///
    /// Used by the analytics interest miner; capped to `limit` conversations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_message_texts(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r"
            SELECT m.content
            FROM message m
            JOIN (
                SELECT id
                FROM conversation
                WHERE user_id = $1
                ORDER BY updated_at DESC
                LIMIT $2
            ) c ON c.id = m.conversation_id
            ORDER BY m.created_at ASC
            ",
        )
        .bind(user_id.as_i32())
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|(content,)| content).collect())
    }
}

/// Derive a conversation title from the first user message.
fn derive_title(message: &str) -> String {
    let trimmed = message.trim();
    if trimmed.chars().count() <= MAX_TITLE_LENGTH {
        return trimmed.to_string();
    }

    // Cut on a char boundary; byte-slicing would split multi-byte characters.
    let cut = trimmed
        .char_indices()
        .nth(MAX_TITLE_LENGTH)
        .map_or(trimmed.len(), |(idx, _)| idx);
    let truncated = trimmed.get(..cut).unwrap_or(trimmed);

    truncated.rfind(' ').map_or_else(
        || format!("{truncated}..."),
        |space_idx| {
            let head = truncated.get(..space_idx).unwrap_or(truncated);
            format!("{head}...")
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_title_short() {
        let title = derive_title("How do I treat wheat rust?");
        assert_eq!(title, "How do I treat wheat rust?");
    }

    #[test]
    fn test_derive_title_long() {
        let message = "This is a very long first message that should be truncated because it exceeds the maximum title length";
        let title = derive_title(message);
        assert!(title.chars().count() <= MAX_TITLE_LENGTH + 3);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_derive_title_trims_whitespace() {
        let title = derive_title("  Hello world  ");
        assert_eq!(title, "Hello world");
    }

    #[test]
    fn test_derive_title_multibyte_content() {
        // 60 Devanagari chars; must not panic on byte boundaries
        let message = "क".repeat(60);
        let title = derive_title(&message);
        assert!(title.ends_with("..."));
        assert!(title.chars().count() <= MAX_TITLE_LENGTH + 3);
    }

    #[test]
    fn test_derive_title_breaks_on_word() {
        let message = format!("{} tail", "word ".repeat(12));
        let title = derive_title(&message);
        assert!(title.ends_with("..."));
        assert!(!title.contains("tail"));
    }
}
