//! Indian cropping seasons.

use serde::{Deserialize, Serialize};

/// A cropping season on the Indian agricultural calendar.
///
/// The mapping from calendar months follows the sowing windows used across
/// the advisory endpoints: April-June is the summer (zaid) window, July-
/// October is kharif, and November-March is rabi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Summer,
    Kharif,
    Rabi,
}

impl Season {
    /// Season for a 1-based calendar month.
    ///
    /// Months outside `1..=12` fall back to [`Season::Rabi`], matching the
    /// wrap-around arm of the month windows.
    #[must_use]
    pub const fn for_month(month: u32) -> Self {
        match month {
            4..=6 => Self::Summer,
            7..=10 => Self::Kharif,
            _ => Self::Rabi,
        }
    }

    /// Lowercase name as used in prompts and wire payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summer => "summer",
            Self::Kharif => "kharif",
            Self::Rabi => "rabi",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summer_window() {
        assert_eq!(Season::for_month(4), Season::Summer);
        assert_eq!(Season::for_month(5), Season::Summer);
        assert_eq!(Season::for_month(6), Season::Summer);
    }

    #[test]
    fn test_kharif_window() {
        assert_eq!(Season::for_month(7), Season::Kharif);
        assert_eq!(Season::for_month(10), Season::Kharif);
    }

    #[test]
    fn test_rabi_wraps_year_end() {
        assert_eq!(Season::for_month(11), Season::Rabi);
        assert_eq!(Season::for_month(12), Season::Rabi);
        assert_eq!(Season::for_month(1), Season::Rabi);
        assert_eq!(Season::for_month(3), Season::Rabi);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Season::Kharif).expect("serialize");
        assert_eq!(json, "\"kharif\"");
    }
}
