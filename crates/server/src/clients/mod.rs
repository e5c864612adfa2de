//! HTTP clients for the third-party services the API aggregates.
//!
//! Each client owns its `reqwest::Client` with per-service default headers
//! and exposes a typed error enum. Handlers never talk to the network
//! directly; they go through these.

pub mod detection;
pub mod mistral;
pub mod news;
pub mod translate;
pub mod weather;

pub use detection::DetectionClient;
pub use mistral::MistralClient;
pub use news::NewsClient;
pub use translate::TranslationClient;
pub use weather::WeatherClient;
