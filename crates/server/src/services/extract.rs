//! Strict extraction of JSON contracts from LLM replies.
//!
//! Models wrap JSON in code fences, sprinkle control characters, and leave
//! trailing commas. This module normalizes those artifacts and then parses
//! into the typed contract. Parsing is strict: a reply that doesn't satisfy
//! the contract is an error the caller must surface, never silently
//! replaced with example data.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from contract extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The reply contains no JSON object at all.
    #[error("no JSON object in model reply")]
    NoJsonObject,

    /// The JSON didn't match the expected contract.
    #[error("contract violation: {0}")]
    Contract(String),
}

/// Normalize an LLM reply so the embedded JSON can be parsed.
///
/// Steps, in order:
/// 1. Trim surrounding whitespace
/// 2. Strip Markdown code fences (```json ... ```)
/// 3. Drop ASCII/Latin-1 control characters (JSON strings escape theirs)
/// 4. Drop trailing commas before `}` or `]`
#[must_use]
pub fn clean_model_reply(raw: &str) -> String {
    let mut text = raw.trim().to_string();

    // Strip code fences
    text = text.replace("```json", "").replace("```", "");

    // Drop control characters
    text.retain(|c| !matches!(c, '\u{0000}'..='\u{001f}' | '\u{007f}'..='\u{009f}'));

    strip_trailing_commas(&text)
}

/// Remove commas that directly precede a closing bracket.
fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_comma = false;
    let mut pending_ws = String::new();

    for c in text.chars() {
        match c {
            ',' => {
                // Flush any previously held comma; hold this one
                if pending_comma {
                    out.push(',');
                    out.push_str(&pending_ws);
                    pending_ws.clear();
                }
                pending_comma = true;
            }
            c if c.is_whitespace() && pending_comma => pending_ws.push(c),
            '}' | ']' if pending_comma => {
                // The held comma was trailing; drop it, keep the whitespace
                out.push_str(&pending_ws);
                pending_ws.clear();
                pending_comma = false;
                out.push(c);
            }
            c => {
                if pending_comma {
                    out.push(',');
                    out.push_str(&pending_ws);
                    pending_ws.clear();
                    pending_comma = false;
                }
                out.push(c);
            }
        }
    }

    if pending_comma {
        out.push(',');
        out.push_str(&pending_ws);
    }

    out
}

/// Slice the first top-level JSON object out of a reply.
///
/// Models often surround the object with prose; everything before the first
/// `{` and after the last `}` is discarded.
#[must_use]
pub fn json_object_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    text.get(start..=end)
}

/// Parse a typed contract out of a raw LLM reply.
///
/// # Errors
///
/// Returns `ExtractError::NoJsonObject` when no object is present, or
/// `ExtractError::Contract` when the JSON doesn't deserialize into `T`.
pub fn parse_contract<T: DeserializeOwned>(raw: &str) -> Result<T, ExtractError> {
    let cleaned = clean_model_reply(raw);
    let candidate = json_object_slice(&cleaned).ok_or(ExtractError::NoJsonObject)?;

    serde_json::from_str(candidate).map_err(|e| ExtractError::Contract(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        score: i32,
    }

    #[test]
    fn test_parse_plain_json() {
        let parsed: Sample = parse_contract(r#"{"name": "Rice", "score": 3}"#).expect("parse");
        assert_eq!(
            parsed,
            Sample {
                name: "Rice".to_string(),
                score: 3
            }
        );
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"name\": \"Wheat\", \"score\": 5}\n```";
        let parsed: Sample = parse_contract(raw).expect("parse");
        assert_eq!(parsed.name, "Wheat");
    }

    #[test]
    fn test_parse_json_with_prose() {
        let raw = "Here is the data you asked for:\n{\"name\": \"Maize\", \"score\": 2}\nHope that helps!";
        let parsed: Sample = parse_contract(raw).expect("parse");
        assert_eq!(parsed.name, "Maize");
    }

    #[test]
    fn test_parse_json_with_trailing_comma() {
        let raw = r#"{"name": "Rice", "score": 3,}"#;
        let parsed: Sample = parse_contract(raw).expect("parse");
        assert_eq!(parsed.score, 3);
    }

    #[test]
    fn test_parse_json_with_control_chars() {
        let raw = "{\"name\": \"Rice\",\u{0007} \"score\": 3}";
        let parsed: Sample = parse_contract(raw).expect("parse");
        assert_eq!(parsed.name, "Rice");
    }

    #[test]
    fn test_no_json_object_is_error() {
        let result = parse_contract::<Sample>("I couldn't produce any data, sorry.");
        assert!(matches!(result, Err(ExtractError::NoJsonObject)));
    }

    #[test]
    fn test_contract_violation_is_error_not_fallback() {
        // Valid JSON, wrong shape: must be an error, never canned data
        let result = parse_contract::<Sample>(r#"{"title": "Rice"}"#);
        assert!(matches!(result, Err(ExtractError::Contract(_))));
    }

    #[test]
    fn test_strip_trailing_commas_nested() {
        let raw = r#"{"a": [1, 2, 3,], "b": {"c": 1,},}"#;
        let cleaned = strip_trailing_commas(raw);
        assert_eq!(cleaned, r#"{"a": [1, 2, 3], "b": {"c": 1}}"#);
    }

    #[test]
    fn test_strip_trailing_commas_keeps_real_commas() {
        let raw = r#"{"a": 1, "b": 2}"#;
        assert_eq!(strip_trailing_commas(raw), raw);
    }

    #[test]
    fn test_json_object_slice() {
        assert_eq!(json_object_slice("x {\"a\": 1} y"), Some("{\"a\": 1}"));
        assert_eq!(json_object_slice("no braces"), None);
        assert_eq!(json_object_slice("} reversed {"), None);
    }
}
