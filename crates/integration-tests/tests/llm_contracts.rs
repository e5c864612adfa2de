//! Model-reply extraction tests against the typed contracts.
//!
//! Replays the kinds of replies the model actually produces (fences, prose,
//! trailing commas, aliased keys) and verifies the strict pipeline either
//! yields the typed contract or fails loudly.

use agrisetu_server::services::analytics::{PricingReport, TrendReport};
use agrisetu_server::services::cart_assist::CartCommandAnalysis;
use agrisetu_server::services::extract::{ExtractError, parse_contract};
use agrisetu_server::services::recommend::RecommendationReport;

#[test]
fn test_recommendation_reply_with_fences_and_prose() {
    let raw = r#"Here are my recommendations:

```json
{
  "recommendations": [
    {
      "name": "Soybean",
      "image": "https://example.com/soybean.jpg",
      "suitability": "High",
      "season": "kharif",
      "duration": "90-110 days",
      "benefits": "Nitrogen fixing, strong oil demand",
      "growingTips": ["Inoculate seeds", "Avoid waterlogging"],
      "expectedYield": "2-3 tons/hectare",
      "marketPrice": "₹4200-4800/quintal",
      "waterRequirement": "Medium",
      "soilType": "Well-drained loam"
    },
    {
      "name": "Cotton",
      "suitability": "Medium",
      "season": "kharif",
      "duration": "150-180 days",
      "benefits": "Cash crop",
      "growingTips": ["Monitor bollworm"],
      "expectedYield": "1.5-2 tons/hectare",
      "marketPrice": "₹6000-7000/quintal",
      "waterRequirement": "Medium",
      "soilType": "Black cotton soil"
    }
  ],
  "insights": {
    "currentSeason": "kharif",
    "region": "Vidarbha",
    "weatherCondition": "Humid",
    "personalizedAdvice": "You asked about oilseeds before",
    "bestPractices": ["Crop rotation", "Soil testing"]
  }
}
```

Let me know if you need more detail."#;

    let report: RecommendationReport = parse_contract(raw).expect("contract should parse");
    assert_eq!(report.recommendations.len(), 2);
    // The second crop omitted its image; the contract tolerates that
    assert!(report.recommendations[1].image.is_none());
    assert_eq!(report.insights.region, "Vidarbha");
}

#[test]
fn test_pricing_reply_with_trailing_commas() {
    let raw = r#"{
        "pricingAnalytics": [
            {"name": "Rice", "currentPrice": "1800-2200", "profitability": "Medium",
             "riskLevel": "Low", "priceTrend": "Stable", "demand": "High",},
        ],
        "marketInsights": {"seasonalAdvice": "Focus on kharif crops", "priceVolatility": "Medium"},
        "recommendations": {"shortTerm": ["Monitor market prices",]},
    }"#;

    let report: PricingReport = parse_contract(raw).expect("contract should parse");
    assert_eq!(report.pricing_analytics.len(), 1);
    assert_eq!(report.pricing_analytics[0].name, "Rice");
}

#[test]
fn test_pricing_reply_with_crops_alias() {
    let raw = r#"{
        "crops": [
            {"name": "Wheat", "currentPrice": "2000-2400", "profitability": "High",
             "riskLevel": "Low", "priceTrend": "Rising", "demand": "High"}
        ],
        "marketInsights": {"seasonalAdvice": "Rabi sowing window", "priceVolatility": "Low"},
        "recommendations": {"shortTerm": []}
    }"#;

    let report: PricingReport = parse_contract(raw).expect("contract should parse");
    assert_eq!(report.pricing_analytics[0].name, "Wheat");
}

#[test]
fn test_trend_reply_full_year() {
    let months = (1..=12)
        .map(|m| format!(r#"{{"month": "2026-{m:02}", "price": {}, "trend": "stable"}}"#, 2000 + m))
        .collect::<Vec<_>>()
        .join(",");
    let raw = format!(
        r#"{{
            "cropName": "Maize",
            "location": "Nashik, Maharashtra",
            "priceHistory": [{months}],
            "analysis": {{
                "averagePrice": 2006.5,
                "priceVolatility": "Low",
                "seasonalPattern": "Flat with a harvest dip",
                "marketFactors": ["Feed demand", "Ethanol blending"],
                "forecast": "Mild rise into the festival season"
            }}
        }}"#
    );

    let report: TrendReport = parse_contract(&raw).expect("contract should parse");
    assert_eq!(report.price_history.len(), 12);
    assert_eq!(report.crop_name, "Maize");
}

#[test]
fn test_cart_command_reply_with_prose() {
    let raw = r#"Based on the transcript, here's my analysis:
{"type": "search", "action": "search", "item": "drip irrigation kit", "confidence": 0.92}"#;

    let analysis: CartCommandAnalysis = parse_contract(raw).expect("contract should parse");
    assert_eq!(analysis.action, "search");
    assert_eq!(analysis.item.as_deref(), Some("drip irrigation kit"));
}

// =============================================================================
// Failure paths stay failures
// =============================================================================

#[test]
fn test_prose_only_reply_is_rejected() {
    let raw = "I'm sorry, I can't provide pricing data right now.";
    let result: Result<PricingReport, _> = parse_contract(raw);
    assert!(matches!(result, Err(ExtractError::NoJsonObject)));
}

#[test]
fn test_wrong_shape_reply_is_rejected() {
    // Valid JSON that doesn't satisfy the contract must NOT be coerced
    let raw = r#"{"prices": {"rice": 2000}}"#;
    let result: Result<PricingReport, _> = parse_contract(raw);
    assert!(matches!(result, Err(ExtractError::Contract(_))));
}

#[test]
fn test_truncated_reply_is_rejected() {
    let raw = r#"{"recommendations": [{"name": "Rice", "suitability": "Hi"#;
    let result: Result<RecommendationReport, _> = parse_contract(raw);
    assert!(result.is_err());
}
