//! Mistral chat-completions client.

mod client;
mod error;
mod types;

pub use client::MistralClient;
pub use error::MistralError;
pub use types::{ChatMessage, ChatRequest, ChatResponse, Choice, FinishReason, Usage};
