//! Message role enum for conversations.

use serde::{Deserialize, Serialize};

/// Role of a message within a conversation.
///
/// Conversations only store the two visible turns; system prompts are built
/// per-request by the server and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "message_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Wire name used by the LLM chat-completions API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(format!("unknown message role: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&MessageRole::Assistant).expect("serialize");
        assert_eq!(json, "\"assistant\"");

        let role: MessageRole = serde_json::from_str("\"user\"").expect("deserialize");
        assert_eq!(role, MessageRole::User);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("user".parse::<MessageRole>(), Ok(MessageRole::User));
        assert!("system".parse::<MessageRole>().is_err());
    }
}
