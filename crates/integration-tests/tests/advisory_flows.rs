//! Prompt-assembly and context-handling tests for the advisory flows.

use agrisetu_core::{LanguageCode, MessageRole, Season};
use agrisetu_server::models::conversation::ConversationLocation;
use agrisetu_server::services::analytics::mine_interests;
use agrisetu_server::services::chatbot::{HistoryEntry, build_chat_messages, strip_markdown};
use agrisetu_server::services::recommend::{chat_context, crop_reference};

fn history(turns: &[(&str, MessageRole)]) -> Vec<HistoryEntry> {
    turns
        .iter()
        .map(|(content, role)| HistoryEntry {
            role: *role,
            content: (*content).to_string(),
        })
        .collect()
}

// =============================================================================
// Chatbot
// =============================================================================

#[test]
fn test_chatbot_message_assembly_roundtrip() {
    let history = history(&[
        ("My wheat leaves look yellow", MessageRole::User),
        ("Yellowing often points to nitrogen deficiency", MessageRole::Assistant),
    ]);
    let location = ConversationLocation {
        latitude: Some(30.9),
        longitude: Some(75.85),
        city: Some("Ludhiana".to_string()),
        state: Some("Punjab".to_string()),
        country: Some("India".to_string()),
    };

    let messages = build_chat_messages(
        "How much urea should I apply?",
        &LanguageCode::parse("hi").expect("parse"),
        &history,
        Some(&location),
    );

    // system + 2 history turns + the new message
    assert_eq!(messages.len(), 4);
    assert!(messages[0].content.contains("Kisaan Guru"));
    assert!(messages[0].content.contains("Ludhiana, Punjab, India"));
    assert_eq!(messages[1].role, "user");
    assert_eq!(messages[2].role, "assistant");
    assert_eq!(messages[3].content, "How much urea should I apply?");
}

#[test]
fn test_chatbot_history_window_is_five_turns() {
    let long_history: Vec<HistoryEntry> = (0..20)
        .map(|i| HistoryEntry {
            role: MessageRole::User,
            content: format!("question {i}"),
        })
        .collect();

    let messages = build_chat_messages("final", &LanguageCode::english(), &long_history, None);

    // system + 5 windowed turns + the new message
    assert_eq!(messages.len(), 7);
    assert_eq!(messages[1].content, "question 15");
}

#[test]
fn test_reply_cleanup_matches_persona_rules() {
    let raw = "## Treatment\n\n**Apply** *neem oil* weekly.\n\n\n\nUse `2ml` per litre.";
    let cleaned = strip_markdown(raw);

    assert!(!cleaned.contains('*'));
    assert!(!cleaned.contains('`'));
    assert!(!cleaned.contains('#'));
    assert!(!cleaned.contains("\n\n\n"));
    assert!(cleaned.contains("Apply neem oil weekly."));
}

// =============================================================================
// Personalization context
// =============================================================================

#[test]
fn test_interest_mining_feeds_recommendation_context() {
    let texts = vec![
        "Should I rotate rice with chickpea this rabi?".to_string(),
        "Cotton bollworm has been bad this year".to_string(),
    ];

    let interests = mine_interests(&texts);
    assert!(interests.crop_interests.contains(&"rice"));
    assert!(interests.crop_interests.contains(&"chickpea"));
    assert!(interests.crop_interests.contains(&"cotton"));
    assert_eq!(interests.total_messages, 2);
}

#[test]
fn test_chat_context_join_for_prompt() {
    let entries = history(&[
        ("thinking about groundnut", MessageRole::User),
        ("groundnut suits sandy loam", MessageRole::Assistant),
    ]);

    let context = chat_context(&entries);
    assert_eq!(context, "thinking about groundnut groundnut suits sandy loam");
}

// =============================================================================
// Season & static reference
// =============================================================================

#[test]
fn test_season_calendar_covers_all_months() {
    for month in 1..=12 {
        let season = Season::for_month(month);
        let expected = match month {
            4..=6 => Season::Summer,
            7..=10 => Season::Kharif,
            _ => Season::Rabi,
        };
        assert_eq!(season, expected, "month {month}");
    }
}

#[test]
fn test_crop_reference_entries_are_complete() {
    for key in ["rice", "wheat", "maize"] {
        let details = crop_reference(key).expect("known crop");
        assert!(!details.growing_tips.is_empty(), "{key}");
        assert!(details.market_price.contains('₹'), "{key}");
    }
}
