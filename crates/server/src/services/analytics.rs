//! Crop pricing analytics and price-trend orchestration.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use agrisetu_core::{Season, UserId};

use crate::clients::mistral::ChatMessage;
use crate::clients::{MistralClient, WeatherClient};
use crate::db::ConversationRepository;
use crate::error::{AppError, Result};
use crate::services::LocationInput;
use crate::services::extract;

/// How many recent conversations are mined for interests.
const INTEREST_CONVERSATIONS: i64 = 10;

/// How much recent-topic text is carried into the prompt.
const TOPIC_WINDOW_CHARS: usize = 500;

/// Crop keywords scanned for in chat history.
const CROP_KEYWORDS: &[&str] = &[
    "rice", "wheat", "maize", "corn", "cotton", "sugarcane", "soybean", "tomato", "potato",
    "onion", "garlic", "chili", "pepper", "cabbage", "cauliflower", "broccoli", "spinach",
    "lettuce", "carrot", "radish", "beans", "peas", "lentils", "chickpea", "groundnut",
    "sunflower", "mustard", "sesame", "barley", "millet", "jowar", "bajra",
];

// =============================================================================
// Interest mining
// =============================================================================

/// What a user's chat history says about their farming interests.
#[derive(Debug, Clone, Default)]
pub struct FarmingInterests {
    /// Total messages scanned.
    pub total_messages: usize,
    /// Crop keywords that appeared.
    pub crop_interests: Vec<&'static str>,
    /// Leading slice of the concatenated history.
    pub recent_topics: String,
}

/// Scan chat history for crop keywords.
#[must_use]
pub fn mine_interests(texts: &[String]) -> FarmingInterests {
    let combined = texts.join(" ").to_lowercase();

    let crop_interests = CROP_KEYWORDS
        .iter()
        .copied()
        .filter(|crop| combined.contains(crop))
        .collect();

    // Cut on a char boundary; history can be any script
    let cut = combined
        .char_indices()
        .nth(TOPIC_WINDOW_CHARS)
        .map_or(combined.len(), |(idx, _)| idx);
    let recent_topics = combined.get(..cut).unwrap_or(&combined).to_string();

    FarmingInterests {
        total_messages: texts.len(),
        crop_interests,
        recent_topics,
    }
}

// =============================================================================
// Pricing contract
// =============================================================================

/// The typed pricing contract the model must satisfy.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingReport {
    /// Per-crop pricing rows. Models sometimes answer `crops` instead.
    #[serde(alias = "crops")]
    pub pricing_analytics: Vec<CropPricing>,
    /// Market-level insights.
    pub market_insights: MarketInsights,
    /// Actionable recommendations.
    pub recommendations: PricingRecommendations,
}

/// Pricing row for one crop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropPricing {
    /// Crop name.
    pub name: String,
    /// Current price band in ₹/quintal.
    pub current_price: String,
    /// High/Medium/Low profitability.
    pub profitability: String,
    /// High/Medium/Low risk.
    pub risk_level: String,
    /// Direction of the price trend.
    pub price_trend: String,
    /// Demand level.
    pub demand: String,
}

/// Market-level insights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInsights {
    /// Seasonal advice line.
    pub seasonal_advice: String,
    /// Volatility level.
    pub price_volatility: String,
}

/// Recommendation block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRecommendations {
    /// Short-term actions.
    #[serde(default)]
    pub short_term: Vec<String>,
}

// =============================================================================
// Frontend contract
// =============================================================================

/// The reshaped payload the analytics page consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropPricingView {
    /// Per-crop pricing rows.
    pub crops: Vec<CropPricing>,
    /// One-line market outlook.
    pub market_outlook: String,
    /// One-line weather/volatility note.
    pub weather_impact: String,
    /// Region label.
    pub region: String,
    /// Season the analysis targets.
    pub current_season: Season,
    /// Enumerated recommendations.
    pub recommendations: Vec<RecommendationView>,
}

/// One enumerated recommendation row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationView {
    /// Row label.
    pub crop: String,
    /// The advice itself.
    pub reason: String,
}

/// Reshape the model contract into the frontend contract.
#[must_use]
pub fn to_pricing_view(
    report: PricingReport,
    location: &LocationInput,
    season: Season,
) -> CropPricingView {
    let recommendations = report
        .recommendations
        .short_term
        .into_iter()
        .enumerate()
        .map(|(index, reason)| RecommendationView {
            crop: format!("Recommendation {}", index + 1),
            reason,
        })
        .collect();

    CropPricingView {
        crops: report.pricing_analytics,
        market_outlook: report.market_insights.seasonal_advice,
        weather_impact: report.market_insights.price_volatility,
        region: format!("{} - Agricultural Zone", region_label(location)),
        current_season: season,
        recommendations,
    }
}

fn region_label(location: &LocationInput) -> &str {
    location.city.as_deref().unwrap_or("Your area")
}

// =============================================================================
// Trend contract
// =============================================================================

/// Historical price-trend contract for one crop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    /// Crop the report covers.
    pub crop_name: String,
    /// Location context.
    pub location: String,
    /// Monthly price points, most recent year.
    pub price_history: Vec<PricePoint>,
    /// Narrative analysis.
    pub analysis: TrendAnalysis,
}

/// One monthly price observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    /// Month label (e.g., "July 2026").
    pub month: String,
    /// Price in ₹/quintal.
    pub price: f64,
    /// up/down/stable.
    pub trend: String,
}

/// Narrative analysis block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    /// Average price across the year.
    pub average_price: f64,
    /// High/Medium/Low volatility.
    pub price_volatility: String,
    /// Seasonal pattern description.
    pub seasonal_pattern: String,
    /// Market factors moving the price.
    pub market_factors: Vec<String>,
    /// 3-month forecast.
    pub forecast: String,
}

// =============================================================================
// Service
// =============================================================================

/// Pricing analytics service.
pub struct PricingAnalytics<'a> {
    pool: &'a PgPool,
    mistral: &'a MistralClient,
    weather: &'a WeatherClient,
}

impl<'a> PricingAnalytics<'a> {
    /// Create a new analytics service.
    #[must_use]
    pub const fn new(
        pool: &'a PgPool,
        mistral: &'a MistralClient,
        weather: &'a WeatherClient,
    ) -> Self {
        Self {
            pool,
            mistral,
            weather,
        }
    }

    /// Produce the crop pricing analysis for a location.
    ///
    /// # Errors
    ///
    /// Returns an error if the LLM call fails or its reply fails contract
    /// validation.
    pub async fn crop_pricing(
        &self,
        user_id: UserId,
        location: &LocationInput,
    ) -> Result<CropPricingView> {
        let season = Season::for_month(Utc::now().month());

        // Best-effort context; neither failure blocks the analysis
        let weather_summary = self
            .weather
            .current(location.lat, location.lon)
            .await
            .map(|snapshot| snapshot.summary())
            .ok();
        let interests = match ConversationRepository::new(self.pool)
            .recent_message_texts(user_id, INTEREST_CONVERSATIONS)
            .await
        {
            Ok(texts) => mine_interests(&texts),
            Err(e) => {
                tracing::warn!(error = %e, "interest mining failed, continuing without");
                FarmingInterests::default()
            }
        };

        let messages = pricing_messages(location, season, &interests, weather_summary.as_deref());
        let raw = self.mistral.chat_text(messages).await?;

        let report: PricingReport = extract::parse_contract(&raw)
            .map_err(|e| AppError::LowConfidence(e.to_string()))?;

        Ok(to_pricing_view(report, location, season))
    }

    /// Produce a 12-month price-trend report for one crop.
    ///
    /// # Errors
    ///
    /// Returns an error if the LLM call fails or its reply fails contract
    /// validation.
    pub async fn price_trends(
        &self,
        crop_name: &str,
        location: Option<&LocationInput>,
    ) -> Result<TrendReport> {
        let messages = trend_messages(crop_name, location);
        let raw = self.mistral.chat_text(messages).await?;

        extract::parse_contract(&raw).map_err(|e| AppError::LowConfidence(e.to_string()))
    }
}

/// Build the pricing prompt.
fn pricing_messages(
    location: &LocationInput,
    season: Season,
    interests: &FarmingInterests,
    weather_summary: Option<&str>,
) -> Vec<ChatMessage> {
    let system = format!(
        r#"Provide crop pricing for {} in {season} season. Return ONLY valid JSON:
{{
  "pricingAnalytics": [
    {{"name": "Rice", "currentPrice": "1800-2200", "profitability": "Medium", "riskLevel": "Low", "priceTrend": "Stable", "demand": "High"}},
    {{"name": "Wheat", "currentPrice": "2000-2400", "profitability": "High", "riskLevel": "Low", "priceTrend": "Rising", "demand": "High"}},
    {{"name": "Maize", "currentPrice": "1900-2300", "profitability": "High", "riskLevel": "Medium", "priceTrend": "Stable", "demand": "High"}}
  ],
  "marketInsights": {{"seasonalAdvice": "Focus on seasonal crops", "priceVolatility": "Medium"}},
  "recommendations": {{"shortTerm": ["Plant seasonal crops", "Monitor market prices", "Consider storage options"]}}
}}"#,
        location.display_name()
    );

    let mut user = "Get pricing data".to_string();
    if let Some(summary) = weather_summary {
        user.push_str(&format!(". Current weather: {summary}"));
    }
    if !interests.crop_interests.is_empty() {
        user.push_str(&format!(
            ". The farmer has discussed: {}",
            interests.crop_interests.join(", ")
        ));
    }

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Build the trend prompt.
fn trend_messages(crop_name: &str, location: Option<&LocationInput>) -> Vec<ChatMessage> {
    let system = r#"You are an expert agricultural market analyst. Provide historical price trend analysis for the requested crop in JSON format only.

IMPORTANT: Respond with ONLY a valid JSON object. No additional text or formatting.

JSON structure:
{
  "cropName": "Crop Name",
  "location": "Location details",
  "priceHistory": [
    {
      "month": "Month Year",
      "price": number,
      "trend": "up|down|stable"
    }
  ],
  "analysis": {
    "averagePrice": number,
    "priceVolatility": "High|Medium|Low",
    "seasonalPattern": "description",
    "marketFactors": ["factor1", "factor2"],
    "forecast": "3-month price forecast"
  }
}"#;

    let city = location.map_or("India", LocationInput::display_name);
    let state = location
        .and_then(|l| l.state.as_deref())
        .unwrap_or("General");

    let user = format!(
        "Provide detailed price trend analysis for: {crop_name}\n\n\
         Location: {city}, {state}\n\n\
         Include:\n\
         1. Monthly price data for the last 12 months\n\
         2. Price volatility analysis\n\
         3. Seasonal patterns\n\
         4. Key market factors affecting prices\n\
         5. 3-month price forecast\n\n\
         Use realistic Indian market prices in ₹ per quintal."
    );

    vec![ChatMessage::system(system.to_string()), ChatMessage::user(user)]
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_mine_interests_finds_crops() {
        let texts = vec![
            "When should I sow Rice this year?".to_string(),
            "Wheat prices look good".to_string(),
        ];
        let interests = mine_interests(&texts);

        assert_eq!(interests.total_messages, 2);
        assert!(interests.crop_interests.contains(&"rice"));
        assert!(interests.crop_interests.contains(&"wheat"));
        assert!(!interests.crop_interests.contains(&"cotton"));
    }

    #[test]
    fn test_mine_interests_empty_history() {
        let interests = mine_interests(&[]);
        assert_eq!(interests.total_messages, 0);
        assert!(interests.crop_interests.is_empty());
        assert!(interests.recent_topics.is_empty());
    }

    #[test]
    fn test_mine_interests_caps_topic_window() {
        let texts = vec!["word ".repeat(400)];
        let interests = mine_interests(&texts);
        assert!(interests.recent_topics.chars().count() <= TOPIC_WINDOW_CHARS);
    }

    #[test]
    fn test_pricing_contract_accepts_crops_alias() {
        let raw = r#"{
            "crops": [
                {"name": "Rice", "currentPrice": "1800-2200", "profitability": "Medium",
                 "riskLevel": "Low", "priceTrend": "Stable", "demand": "High"}
            ],
            "marketInsights": {"seasonalAdvice": "Go seasonal", "priceVolatility": "Medium"},
            "recommendations": {"shortTerm": ["Monitor prices"]}
        }"#;

        let report: PricingReport = extract::parse_contract(raw).expect("parse");
        assert_eq!(report.pricing_analytics.len(), 1);
    }

    #[test]
    fn test_to_pricing_view_shape() {
        let report = PricingReport {
            pricing_analytics: vec![CropPricing {
                name: "Rice".to_string(),
                current_price: "1800-2200".to_string(),
                profitability: "Medium".to_string(),
                risk_level: "Low".to_string(),
                price_trend: "Stable".to_string(),
                demand: "High".to_string(),
            }],
            market_insights: MarketInsights {
                seasonal_advice: "Focus on seasonal crops".to_string(),
                price_volatility: "Medium".to_string(),
            },
            recommendations: PricingRecommendations {
                short_term: vec!["Plant seasonal crops".to_string(), "Monitor".to_string()],
            },
        };

        let view = to_pricing_view(report, &sample_location(), Season::Kharif);

        assert_eq!(view.region, "Pune - Agricultural Zone");
        assert_eq!(view.market_outlook, "Focus on seasonal crops");
        assert_eq!(view.weather_impact, "Medium");
        assert_eq!(view.recommendations.len(), 2);
        assert_eq!(view.recommendations[0].crop, "Recommendation 1");
        assert_eq!(view.recommendations[1].reason, "Monitor");
    }

    #[test]
    fn test_to_pricing_view_without_city() {
        let location = LocationInput {
            lat: 0.0,
            lon: 0.0,
            city: None,
            state: None,
            country: None,
        };
        let report = PricingReport {
            pricing_analytics: vec![],
            market_insights: MarketInsights {
                seasonal_advice: "a".to_string(),
                price_volatility: "b".to_string(),
            },
            recommendations: PricingRecommendations { short_term: vec![] },
        };

        let view = to_pricing_view(report, &location, Season::Rabi);
        assert_eq!(view.region, "Your area - Agricultural Zone");
        assert!(view.recommendations.is_empty());
    }

    #[test]
    fn test_trend_contract_parses() {
        let raw = r#"{
            "cropName": "Wheat",
            "location": "Pune, Maharashtra",
            "priceHistory": [
                {"month": "July 2026", "price": 2150.0, "trend": "up"}
            ],
            "analysis": {
                "averagePrice": 2100.5,
                "priceVolatility": "Medium",
                "seasonalPattern": "Peaks before rabi sowing",
                "marketFactors": ["Export demand"],
                "forecast": "Stable with mild upside"
            }
        }"#;

        let report: TrendReport = extract::parse_contract(raw).expect("parse");
        assert_eq!(report.crop_name, "Wheat");
        assert_eq!(report.price_history.len(), 1);
        assert!((report.analysis.average_price - 2100.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pricing_messages_mention_interests() {
        let interests = FarmingInterests {
            total_messages: 4,
            crop_interests: vec!["rice", "cotton"],
            recent_topics: String::new(),
        };
        let messages =
            pricing_messages(&sample_location(), Season::Kharif, &interests, Some("Sunny, 31°C"));

        assert!(messages[0].content.contains("Pune"));
        assert!(messages[0].content.contains("kharif"));
        assert!(messages[1].content.contains("Sunny, 31°C"));
        assert!(messages[1].content.contains("rice, cotton"));
    }

    #[test]
    fn test_trend_messages_default_location() {
        let messages = trend_messages("Wheat", None);
        assert!(messages[1].content.contains("India, General"));
    }
}
