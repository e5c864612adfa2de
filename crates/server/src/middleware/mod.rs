//! HTTP middleware stack for the API server.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Rate limiting (governor; strict tier on LLM-backed routes)
//!
//! Identity is not a layer: owner-scoped handlers take the
//! [`identity::RequireUser`] extractor.

pub mod identity;
pub mod rate_limit;

pub use identity::{OptionalUser, RequireUser};
pub use rate_limit::{api_rate_limiter, llm_rate_limiter};
