//! Voice cart-command classification.
//!
//! The market page lets users drive the cart by voice; the browser sends
//! the transcript here and the LLM decides whether it was a product search
//! or an answer to a previous question.

use serde::{Deserialize, Serialize};

use crate::clients::MistralClient;
use crate::clients::mistral::ChatMessage;
use crate::error::{AppError, Result};
use crate::services::extract;

/// The typed classification contract the model must satisfy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartCommandAnalysis {
    /// "search" or "response".
    #[serde(rename = "type")]
    pub kind: String,
    /// "search", "confirm" or "deny".
    pub action: String,
    /// Item name for search commands.
    #[serde(default)]
    pub item: Option<String>,
    /// Model's confidence, 0.0 to 1.0.
    pub confidence: f64,
}

/// Cart command classification service.
pub struct CartAssistant<'a> {
    mistral: &'a MistralClient,
}

impl<'a> CartAssistant<'a> {
    /// Create a new cart assistant.
    #[must_use]
    pub const fn new(mistral: &'a MistralClient) -> Self {
        Self { mistral }
    }

    /// Classify a voice transcript.
    ///
    /// # Errors
    ///
    /// Returns an error if the LLM call fails or its reply fails contract
    /// validation.
    pub async fn analyze(&self, transcript: &str) -> Result<CartCommandAnalysis> {
        let raw = self.mistral.chat_text(command_messages(transcript)).await?;
        extract::parse_contract(&raw).map_err(|e| AppError::LowConfidence(e.to_string()))
    }
}

/// Build the classification prompt.
fn command_messages(transcript: &str) -> Vec<ChatMessage> {
    let system = r#"You are a smart shopping assistant that helps users manage their shopping cart.
First, determine if this is a search command or a response to your previous question.

If it's a search command, extract the item name they're looking for.
If it's a response to your question (like "yes", "no", "yeah", "nope"), interpret their intent.

Return your analysis in this exact JSON format:
{
    "type": "search" | "response",
    "action": "search" | "confirm" | "deny",
    "item": "item name or null",
    "confidence": 0.0 to 1.0
}"#;

    vec![
        ChatMessage::system(system),
        ChatMessage::user(format!("User command: \"{transcript}\"")),
    ]
}
