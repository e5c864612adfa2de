//! Crop recommendation orchestration.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use agrisetu_core::Season;

use crate::clients::mistral::ChatMessage;
use crate::clients::{MistralClient, WeatherClient};
use crate::error::{AppError, Result};
use crate::services::LocationInput;
use crate::services::chatbot::HistoryEntry;
use crate::services::extract;

/// Stock photo used when the model leaves a crop image empty.
const DEFAULT_CROP_IMAGE: &str =
    "https://images.unsplash.com/photo-1574323347407-f5e1ad6d020b?w=400&h=300&fit=crop&auto=format&q=60";

/// How many history entries feed the personalization context.
const CONTEXT_WINDOW: usize = 10;

// =============================================================================
// Contract types
// =============================================================================

/// The typed contract the model must satisfy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationReport {
    /// Recommended crops, 4-5 entries.
    pub recommendations: Vec<CropRecommendation>,
    /// Regional insights.
    pub insights: RecommendationInsights,
}

/// One recommended crop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRecommendation {
    /// Crop name.
    pub name: String,
    /// Illustration URL; filled with a stock photo when absent.
    #[serde(default)]
    pub image: Option<String>,
    /// High/Medium/Low suitability for the caller's region.
    pub suitability: String,
    /// Season the crop belongs to.
    pub season: String,
    /// Growing duration (e.g., "120-150 days").
    pub duration: String,
    /// Why this crop.
    pub benefits: String,
    /// Growing tips.
    pub growing_tips: Vec<String>,
    /// Expected yield (e.g., "4-6 tons/hectare").
    pub expected_yield: String,
    /// Market price band (e.g., "₹1800-2200/quintal").
    pub market_price: String,
    /// High/Medium/Low water requirement.
    pub water_requirement: String,
    /// Preferred soil type.
    pub soil_type: String,
}

/// Regional insights accompanying the recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationInsights {
    /// Season the advice targets.
    pub current_season: String,
    /// Region name.
    pub region: String,
    /// Weather condition used.
    pub weather_condition: String,
    /// Advice derived from the caller's chat history.
    pub personalized_advice: String,
    /// General best practices.
    pub best_practices: Vec<String>,
}

// =============================================================================
// Static crop reference
// =============================================================================

/// A static crop reference entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropDetails {
    pub name: &'static str,
    pub scientific_name: &'static str,
    pub season: &'static str,
    pub duration: &'static str,
    pub water_requirement: &'static str,
    pub soil_type: &'static str,
    pub expected_yield: &'static str,
    pub market_price: &'static str,
    pub benefits: &'static str,
    pub challenges: &'static str,
    pub growing_tips: &'static [&'static str],
}

/// Look up the static reference entry for a crop.
#[must_use]
pub fn crop_reference(crop_key: &str) -> Option<CropDetails> {
    match crop_key.to_lowercase().as_str() {
        "rice" => Some(CropDetails {
            name: "Rice",
            scientific_name: "Oryza sativa",
            season: "kharif",
            duration: "120-150 days",
            water_requirement: "High",
            soil_type: "Clay loam",
            expected_yield: "4-6 tons per hectare",
            market_price: "₹1800-2200 per quintal",
            benefits: "Staple food crop with consistent market demand",
            challenges: "Water intensive, pest management required",
            growing_tips: &[
                "Plant during monsoon season",
                "Maintain water levels in fields",
                "Use certified seeds",
                "Apply fertilizers as per soil test",
            ],
        }),
        "wheat" => Some(CropDetails {
            name: "Wheat",
            scientific_name: "Triticum aestivum",
            season: "rabi",
            duration: "120-140 days",
            water_requirement: "Medium",
            soil_type: "Loamy",
            expected_yield: "3-5 tons per hectare",
            market_price: "₹2000-2400 per quintal",
            benefits: "High market demand, good storage life",
            challenges: "Temperature sensitive, requires timely sowing",
            growing_tips: &[
                "Sow in November-December",
                "Ensure proper irrigation",
                "Monitor for rust diseases",
                "Harvest at right maturity",
            ],
        }),
        "maize" => Some(CropDetails {
            name: "Maize",
            scientific_name: "Zea mays",
            season: "kharif",
            duration: "90-120 days",
            water_requirement: "Medium",
            soil_type: "Well-drained loam",
            expected_yield: "5-7 tons per hectare",
            market_price: "₹1900-2300 per quintal",
            benefits: "Versatile crop with food, feed and industrial demand",
            challenges: "Drainage sensitive, stem borer pressure",
            growing_tips: &[
                "Plant after monsoon onset",
                "Ensure good drainage",
                "Scout for stem borers weekly",
                "Keep adequate plant spacing",
            ],
        }),
        _ => None,
    }
}

// =============================================================================
// Service
// =============================================================================

/// Crop recommendation service.
pub struct CropAdvisor<'a> {
    mistral: &'a MistralClient,
    weather: &'a WeatherClient,
}

impl<'a> CropAdvisor<'a> {
    /// Create a new crop advisor.
    #[must_use]
    pub const fn new(mistral: &'a MistralClient, weather: &'a WeatherClient) -> Self {
        Self { mistral, weather }
    }

    /// Recommend crops for a location.
    ///
    /// Combines the current season, a best-effort weather snapshot and the
    /// caller's chat history into the prompt, then validates the model's
    /// JSON against [`RecommendationReport`].
    ///
    /// # Errors
    ///
    /// Returns an error if the LLM call fails or its reply fails contract
    /// validation.
    pub async fn recommend(
        &self,
        location: &LocationInput,
        history: &[HistoryEntry],
    ) -> Result<RecommendationReport> {
        let season = Season::for_month(Utc::now().month());

        // Weather is nice-to-have; advice still works without it
        let weather_summary = self
            .weather
            .current(location.lat, location.lon)
            .await
            .map(|snapshot| snapshot.summary())
            .ok();

        let messages = recommendation_messages(
            location,
            season,
            weather_summary.as_deref(),
            &chat_context(history),
        );

        let raw = self.mistral.chat_text(messages).await?;
        let mut report: RecommendationReport = extract::parse_contract(&raw)
            .map_err(|e| AppError::LowConfidence(e.to_string()))?;

        fill_default_images(&mut report);
        Ok(report)
    }
}

/// Flatten chat history into a context line for the prompt.
#[must_use]
pub fn chat_context(history: &[HistoryEntry]) -> String {
    if history.is_empty() {
        return "No previous farming discussions".to_string();
    }

    let window_start = history.len().saturating_sub(CONTEXT_WINDOW);
    history
        .get(window_start..)
        .unwrap_or_default()
        .iter()
        .map(|entry| entry.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Give every recommendation an image.
pub fn fill_default_images(report: &mut RecommendationReport) {
    for crop in &mut report.recommendations {
        let missing = crop.image.as_deref().is_none_or(|url| url.trim().is_empty());
        if missing {
            crop.image = Some(DEFAULT_CROP_IMAGE.to_string());
        }
    }
}

/// Build the recommendation prompt.
fn recommendation_messages(
    location: &LocationInput,
    season: Season,
    weather_summary: Option<&str>,
    chat_context: &str,
) -> Vec<ChatMessage> {
    let location_context = format!(
        "Location: {}, {} ({}, {})",
        location.display_name(),
        location.state.as_deref().unwrap_or_default(),
        location.lat,
        location.lon
    );
    let weather_context = weather_summary.map_or_else(
        || "Weather data unavailable".to_string(),
        |summary| format!("Current weather: {summary}"),
    );

    let system = r#"You are an expert agricultural consultant. Based on the user's location, current weather, season, and farming chat history, recommend 4-5 most suitable crops.

Return ONLY a valid JSON response with this exact structure:
{
  "recommendations": [
    {
      "name": "Crop Name",
      "image": "https://example.com/crop-image.jpg",
      "suitability": "High/Medium/Low",
      "season": "kharif/rabi/summer",
      "duration": "X-Y days",
      "benefits": "Brief benefit description",
      "growingTips": ["Tip 1", "Tip 2", "Tip 3"],
      "expectedYield": "X-Y tons/hectare",
      "marketPrice": "₹X-Y/quintal",
      "waterRequirement": "High/Medium/Low",
      "soilType": "Preferred soil type"
    }
  ],
  "insights": {
    "currentSeason": "season",
    "region": "region name",
    "weatherCondition": "current weather",
    "personalizedAdvice": "Based on chat history insights",
    "bestPractices": ["Practice 1", "Practice 2", "Practice 3"]
  }
}"#;

    let user = format!(
        "Please recommend crops based on:\n\n{location_context}\nSeason: {season}\n{weather_context}\n\n\
         User's farming chat history context: {chat_context}\n\n\
         Provide personalized crop recommendations with crop images and detailed growing tips in JSON format."
    );

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrisetu_core::MessageRole;

    fn sample_location() -> LocationInput {
        LocationInput {
            lat: 18.52,
            lon: 73.86,
            city: Some("Pune".to_string()),
            state: Some("Maharashtra".to_string()),
            country: None,
        }
    }

    #[test]
    fn test_chat_context_empty_history() {
        assert_eq!(chat_context(&[]), "No previous farming discussions");
    }

    #[test]
    fn test_chat_context_windows_to_last_ten() {
        let history: Vec<HistoryEntry> = (0..15)
            .map(|i| HistoryEntry {
                role: MessageRole::User,
                content: format!("m{i}"),
            })
            .collect();

        let context = chat_context(&history);
        assert!(!context.contains("m4"));
        assert!(context.starts_with("m5"));
        assert!(context.ends_with("m14"));
    }

    #[test]
    fn test_recommendation_messages_include_context() {
        let messages = recommendation_messages(
            &sample_location(),
            Season::Kharif,
            Some("Sunny, 31°C"),
            "rice wheat",
        );

        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.contains("growingTips"));
        assert!(messages[1].content.contains("Pune"));
        assert!(messages[1].content.contains("Season: kharif"));
        assert!(messages[1].content.contains("Sunny, 31°C"));
    }

    #[test]
    fn test_recommendation_messages_without_weather() {
        let messages =
            recommendation_messages(&sample_location(), Season::Rabi, None, "context");
        assert!(messages[1].content.contains("Weather data unavailable"));
    }

    #[test]
    fn test_contract_parses_model_reply() {
        let raw = r#"```json
        {
          "recommendations": [{
            "name": "Rice",
            "image": "",
            "suitability": "High",
            "season": "kharif",
            "duration": "120-150 days",
            "benefits": "Staple crop",
            "growingTips": ["Plant during monsoon"],
            "expectedYield": "4-6 tons/hectare",
            "marketPrice": "₹1800-2200/quintal",
            "waterRequirement": "High",
            "soilType": "Clay loam"
          }],
          "insights": {
            "currentSeason": "kharif",
            "region": "Pune",
            "weatherCondition": "Sunny",
            "personalizedAdvice": "Focus on paddy",
            "bestPractices": ["Soil testing"]
          }
        }
        ```"#;

        let mut report: RecommendationReport =
            extract::parse_contract(raw).expect("contract should parse");
        fill_default_images(&mut report);

        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(
            report.recommendations[0].image.as_deref(),
            Some(DEFAULT_CROP_IMAGE)
        );
    }

    #[test]
    fn test_crop_reference_known_crops() {
        assert!(crop_reference("rice").is_some());
        assert!(crop_reference("Wheat").is_some());
        assert!(crop_reference("MAIZE").is_some());
        assert!(crop_reference("dragonfruit").is_none());
    }

    #[test]
    fn test_fill_default_images_keeps_existing() {
        let mut report = RecommendationReport {
            recommendations: vec![CropRecommendation {
                name: "Rice".to_string(),
                image: Some("https://example.com/rice.jpg".to_string()),
                suitability: "High".to_string(),
                season: "kharif".to_string(),
                duration: "120 days".to_string(),
                benefits: "Staple".to_string(),
                growing_tips: vec![],
                expected_yield: "4-6".to_string(),
                market_price: "₹1800".to_string(),
                water_requirement: "High".to_string(),
                soil_type: "Clay".to_string(),
            }],
            insights: RecommendationInsights {
                current_season: "kharif".to_string(),
                region: "Pune".to_string(),
                weather_condition: "Sunny".to_string(),
                personalized_advice: "..".to_string(),
                best_practices: vec![],
            },
        };

        fill_default_images(&mut report);
        assert_eq!(
            report.recommendations[0].image.as_deref(),
            Some("https://example.com/rice.jpg")
        );
    }
}
