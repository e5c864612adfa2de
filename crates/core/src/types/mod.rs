//! Core types for AgriSetu.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod envelope;
pub mod id;
pub mod language;
pub mod role;
pub mod season;

pub use envelope::{ApiResponse, Pagination};
pub use id::*;
pub use language::{LanguageCode, LanguageCodeError};
pub use role::MessageRole;
pub use season::Season;
