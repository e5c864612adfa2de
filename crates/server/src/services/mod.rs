//! LLM orchestration services.
//!
//! Each service owns one advisory flow: building the prompt, invoking the
//! LLM client, and validating the reply against the typed contract the
//! frontend expects. Handlers stay thin; everything testable lives here.

pub mod advice;
pub mod analytics;
pub mod cart_assist;
pub mod chatbot;
pub mod extract;
pub mod recommend;

use serde::Deserialize;

/// Location payload accepted by the advisory endpoints.
///
/// Coordinates are required (the weather lookup needs them); the rest is
/// best-effort reverse-geocoding data from the browser.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationInput {
    pub lat: f64,
    pub lon: f64,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl LocationInput {
    /// Display name used in prompts, falling back to the country scope.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.city.as_deref().unwrap_or("India")
    }
}

/// Raw location payload as it arrives on the wire.
///
/// Requests routinely omit coordinates; the handlers turn this into a
/// validated [`LocationInput`] (or a 400) instead of letting body
/// deserialization fail with an unhelpful rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationPayload {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl LocationPayload {
    /// Validate into a [`LocationInput`]; `None` when coordinates are missing.
    #[must_use]
    pub fn into_input(self) -> Option<LocationInput> {
        let (lat, lon) = (self.lat?, self.lon?);
        Some(LocationInput {
            lat,
            lon,
            city: self.city,
            state: self.state,
            country: self.country,
        })
    }
}
