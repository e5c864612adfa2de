//! Agricultural chatbot ("Kisaan Guru") orchestration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agrisetu_core::{LanguageCode, MessageRole};

use crate::clients::MistralClient;
use crate::clients::mistral::ChatMessage;
use crate::error::Result;
use crate::models::conversation::ConversationLocation;

/// How many history turns are replayed to the model.
const HISTORY_WINDOW: usize = 5;

/// A prior turn supplied by the client with its chat request.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    /// Who said it.
    pub role: MessageRole,
    /// What was said.
    pub content: String,
}

/// Chatbot reply payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotReply {
    /// The assistant's reply, stripped of markdown artifacts.
    pub response: String,
    /// When the reply was generated.
    pub timestamp: DateTime<Utc>,
    /// Language the caller asked for.
    pub user_language: LanguageCode,
}

/// Chatbot service.
pub struct Chatbot<'a> {
    mistral: &'a MistralClient,
}

impl<'a> Chatbot<'a> {
    /// Create a new chatbot service.
    #[must_use]
    pub const fn new(mistral: &'a MistralClient) -> Self {
        Self { mistral }
    }

    /// Answer a chat message.
    ///
    /// Builds the persona prompt, replays the last few history turns,
    /// invokes the model and strips markdown artifacts from the reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the LLM call fails.
    pub async fn respond(
        &self,
        message: &str,
        language: &LanguageCode,
        history: &[HistoryEntry],
        location: Option<&ConversationLocation>,
    ) -> Result<ChatbotReply> {
        let messages = build_chat_messages(message, language, history, location);
        let raw = self.mistral.chat_text(messages).await?;

        Ok(ChatbotReply {
            response: strip_markdown(&raw),
            timestamp: Utc::now(),
            user_language: language.clone(),
        })
    }
}

/// Assemble the full message list for the model.
#[must_use]
pub fn build_chat_messages(
    message: &str,
    language: &LanguageCode,
    history: &[HistoryEntry],
    location: Option<&ConversationLocation>,
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system_prompt(language, location))];

    let window_start = history.len().saturating_sub(HISTORY_WINDOW);
    for entry in history.get(window_start..).unwrap_or_default() {
        messages.push(match entry.role {
            MessageRole::User => ChatMessage::user(entry.content.clone()),
            MessageRole::Assistant => ChatMessage::assistant(entry.content.clone()),
        });
    }

    messages.push(ChatMessage::user(message));
    messages
}

/// Build the Kisaan Guru system prompt.
fn system_prompt(language: &LanguageCode, location: Option<&ConversationLocation>) -> String {
    let mut prompt = String::from(
        r#"You are an expert agricultural consultant named "Kisaan Guru" (Farmer's Teacher). You have decades of experience helping farmers across India and the world.

Your role is to:
- Provide practical, actionable farming advice
- Answer questions about crops, soil, weather, pests, and farming techniques
- Give responses in a warm, conversational, and human-like manner
- Keep responses concise but informative (2-4 sentences maximum)
- Respond in the user's preferred language when possible
- Never use markdown formatting, asterisks, or special characters
- Be encouraging and supportive, like talking to a friend
"#,
    );

    if let Some(location) = location {
        if let (Some(lat), Some(lon)) = (location.latitude, location.longitude) {
            prompt.push_str(&format!(
                "- The user is located at coordinates: {lat}, {lon}\n"
            ));
        }
        if let Some(city) = &location.city {
            prompt.push_str(&format!("- The user is in: {city}"));
            if let Some(state) = &location.state {
                prompt.push_str(&format!(", {state}"));
            }
            if let Some(country) = &location.country {
                prompt.push_str(&format!(", {country}"));
            }
            prompt.push('\n');
        }
    }

    prompt.push_str(
        "- Use location information when available to provide region-specific agricultural advice\n\
         - Consider local climate, soil conditions, and farming practices when giving recommendations\n\n",
    );

    prompt.push_str(&format!("Current user language: {language}\n"));
    if language.as_str() == "en" {
        prompt.push_str("Respond in English");
    } else {
        prompt.push_str("Respond in the user's preferred language");
    }

    prompt
}

/// Strip markdown artifacts from a model reply.
///
/// The persona prompt forbids formatting, but models emit it anyway.
#[must_use]
pub fn strip_markdown(text: &str) -> String {
    let mut cleaned = text.replace("**", "").replace(['*', '`'], "");

    // Drop heading markers at line starts
    cleaned = cleaned
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            trimmed
                .strip_prefix(|c| c == '#')
                .map_or(line, |_| trimmed.trim_start_matches('#').trim_start())
        })
        .collect::<Vec<_>>()
        .join("\n");

    // Collapse runs of 3+ newlines to a paragraph break
    while cleaned.contains("\n\n\n") {
        cleaned = cleaned.replace("\n\n\n", "\n\n");
    }

    cleaned.trim().to_string()
}
