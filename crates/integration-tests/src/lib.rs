//! Integration tests for AgriSetu.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p agrisetu-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `api_contract` - Envelope, pagination and error-status contracts
//! - `llm_contracts` - Model reply extraction against the typed contracts
//! - `advisory_flows` - Prompt assembly and history/interest handling
//!
//! These tests exercise the server crate's library surface without a live
//! database or any outbound network call.
