//! Conversation domain models for the chatbot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agrisetu_core::{ConversationId, LanguageCode, MessageId, MessageRole, UserId};

/// A chatbot conversation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Unique conversation ID.
    pub id: ConversationId,
    /// User who owns this conversation.
    pub user_id: UserId,
    /// Title, auto-derived from the first user message.
    pub title: String,
    /// Preferred language for this conversation.
    pub user_language: LanguageCode,
    /// Optional location captured when the conversation started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ConversationLocation>,
    /// Messages in chronological order.
    pub messages: Vec<Message>,
    /// When the conversation was created.
    pub created_at: DateTime<Utc>,
    /// When the conversation was last updated (refreshed on every mutation).
    pub updated_at: DateTime<Utc>,
}

/// Conversation list entry: everything but the messages themselves.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    /// Unique conversation ID.
    pub id: ConversationId,
    /// Title, auto-derived from the first user message.
    pub title: String,
    /// Preferred language for this conversation.
    pub user_language: LanguageCode,
    /// Number of messages in the conversation.
    pub message_count: i64,
    /// When the conversation was created.
    pub created_at: DateTime<Utc>,
    /// When the conversation was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A single message within a conversation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message ID.
    pub id: MessageId,
    /// Conversation this message belongs to.
    pub conversation_id: ConversationId,
    /// Who sent it.
    pub role: MessageRole,
    /// Message text.
    pub content: String,
    /// Language the message was written in.
    pub user_language: LanguageCode,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
}

/// Location metadata attached to a conversation.
///
/// Everything is optional; browsers deny geolocation more often than not.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl ConversationLocation {
    /// Whether any field is populated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.latitude.is_none()
            && self.longitude.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.country.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization() {
        let message = Message {
            id: MessageId::new(1),
            conversation_id: ConversationId::new(1),
            role: MessageRole::User,
            content: "How do I treat leaf rust?".to_string(),
            user_language: LanguageCode::english(),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&message).expect("serialize");
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("leaf rust"));
    }

    #[test]
    fn test_conversation_omits_empty_location() {
        let conversation = Conversation {
            id: ConversationId::new(1),
            user_id: UserId::new(1),
            title: "New conversation".to_string(),
            user_language: LanguageCode::english(),
            location: None,
            messages: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&conversation).expect("serialize");
        assert!(json.get("location").is_none());
    }

    #[test]
    fn test_location_is_empty() {
        assert!(ConversationLocation::default().is_empty());

        let with_city = ConversationLocation {
            city: Some("Pune".to_string()),
            ..Default::default()
        };
        assert!(!with_city.is_empty());
    }
}
