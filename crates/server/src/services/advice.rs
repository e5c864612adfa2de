//! Disease detection and advice orchestration.
//!
//! Two-step flow: the hosted classifier names the disease from an image,
//! then the LLM turns the label into short, practical guidance.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clients::mistral::ChatMessage;
use crate::clients::{DetectionClient, MistralClient};
use crate::error::Result;

/// Combined detection + advice payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseReport {
    /// Disease label from the classifier.
    pub disease: String,
    /// LLM-written guidance for the farmer.
    pub advice: String,
    /// When the report was generated.
    pub timestamp: DateTime<Utc>,
}

/// Disease advisory service.
pub struct DiseaseAdvisor<'a> {
    detection: &'a DetectionClient,
    mistral: &'a MistralClient,
}

impl<'a> DiseaseAdvisor<'a> {
    /// Create a new disease advisor.
    #[must_use]
    pub const fn new(detection: &'a DetectionClient, mistral: &'a MistralClient) -> Self {
        Self { detection, mistral }
    }

    /// Analyze the plant disease shown in an image.
    ///
    /// # Errors
    ///
    /// Returns an error if the classifier or the LLM call fails.
    pub async fn analyze(&self, image_url: &str) -> Result<DiseaseReport> {
        let disease = self.detection.predict(image_url).await?;
        let advice = self.mistral.chat_text(advice_messages(&disease)).await?;

        Ok(DiseaseReport {
            disease,
            advice,
            timestamp: Utc::now(),
        })
    }
}

/// Prompt asking for compact advice on a detected disease.
fn advice_messages(disease: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(
            "You are an expert agricultural assistant. Provide concise, practical advice \
             for farmers. Keep responses brief and to the point - maximum 3-4 sentences \
             per section.",
        ),
        ChatMessage::user(format!(
            "The detected plant disease is: {disease}. Please provide a SHORT response with:\n\
             1. Brief disease description (1-2 sentences)\n\
             2. Key symptoms (2-3 bullet points)\n\
             3. Quick treatment tips (2-3 bullet points)\n\
             4. Prevention (1-2 sentences)\n\
             Keep the total response under 150 words."
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advice_messages_shape() {
        let messages = advice_messages("Tomato___Late_blight");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[1].content.contains("Tomato___Late_blight"));
        assert!(messages[1].content.contains("under 150 words"));
    }
}
