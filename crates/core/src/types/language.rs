//! Language code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`LanguageCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum LanguageCodeError {
    /// The input string is empty.
    #[error("language code cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("language code must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains characters outside `a-z`, `A-Z` and `-`.
    #[error("language code may only contain letters and hyphens")]
    InvalidCharacter,
}

/// A BCP 47-ish language tag as accepted by the translation providers.
///
/// The providers we call take either a bare ISO 639-1 code (`hi`, `ta`) or a
/// locale tag (`en-US`, `pa-IN`). Validation is deliberately structural, not
/// a registry lookup: unknown-but-well-formed codes are passed through so the
/// provider can decide whether it supports them.
///
/// ## Constraints
///
/// - Length: 1-16 characters
/// - Letters and hyphens only
///
/// ## Examples
///
/// ```
/// use agrisetu_core::LanguageCode;
///
/// // Valid codes
/// assert!(LanguageCode::parse("en").is_ok());
/// assert!(LanguageCode::parse("pa-IN").is_ok());
///
/// // Invalid codes
/// assert!(LanguageCode::parse("").is_err());      // empty
/// assert!(LanguageCode::parse("en_US").is_err()); // underscore
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Maximum length of a language tag we accept.
    pub const MAX_LENGTH: usize = 16;

    /// Parse a `LanguageCode` from a string.
    ///
    /// The whole tag is lowercased; the providers are case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is longer than 16 characters
    /// - Contains characters other than letters and hyphens
    pub fn parse(s: &str) -> Result<Self, LanguageCodeError> {
        if s.is_empty() {
            return Err(LanguageCodeError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(LanguageCodeError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s.chars().all(|c| c.is_ascii_alphabetic() || c == '-') {
            return Err(LanguageCodeError::InvalidCharacter);
        }

        Ok(Self(s.to_ascii_lowercase()))
    }

    /// English, the default language across the API surface.
    #[must_use]
    pub fn english() -> Self {
        Self("en".to_owned())
    }

    /// Get the language code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_code() {
        let code = LanguageCode::parse("hi").expect("parse");
        assert_eq!(code.as_str(), "hi");
    }

    #[test]
    fn test_parse_locale_tag() {
        let code = LanguageCode::parse("en-IN").expect("parse");
        assert_eq!(code.as_str(), "en-in");
    }

    #[test]
    fn test_parse_lowercases() {
        let code = LanguageCode::parse("TA").expect("parse");
        assert_eq!(code.as_str(), "ta");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            LanguageCode::parse(""),
            Err(LanguageCodeError::Empty)
        ));
    }

    #[test]
    fn test_parse_rejects_underscore() {
        assert!(matches!(
            LanguageCode::parse("en_US"),
            Err(LanguageCodeError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let long = "a".repeat(17);
        assert!(matches!(
            LanguageCode::parse(&long),
            Err(LanguageCodeError::TooLong { .. })
        ));
    }

    #[test]
    fn test_default_is_english() {
        assert_eq!(LanguageCode::default().as_str(), "en");
    }

    #[test]
    fn test_serde_transparent() {
        let code = LanguageCode::parse("bn").expect("parse");
        let json = serde_json::to_string(&code).expect("serialize");
        assert_eq!(json, "\"bn\"");
    }
}
