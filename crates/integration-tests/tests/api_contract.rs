//! Contract tests for the response envelope and error mapping.
//!
//! These verify the wire shapes the frontend depends on without requiring
//! a running server or database.

use axum::http::StatusCode;
use axum::response::IntoResponse;

use agrisetu_core::{ApiResponse, Pagination};
use agrisetu_server::error::AppError;

// =============================================================================
// Envelope
// =============================================================================

#[test]
fn test_success_envelope_contract() {
    let envelope = ApiResponse::ok(serde_json::json!({"disease": "rust"}));
    let json = serde_json::to_value(&envelope).expect("serialize");

    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["disease"], "rust");
    assert!(json.get("error").is_none());
}

#[test]
fn test_failure_envelope_contract() {
    let envelope = ApiResponse::<()>::error_with_message(
        "Translation service unavailable",
        "Please try again later or use the English version",
    );
    let json = serde_json::to_value(&envelope).expect("serialize");

    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Translation service unavailable");
    assert!(json.get("data").is_none());
}

#[test]
fn test_paginated_envelope_contract() {
    let items = vec![serde_json::json!({"title": "Monsoon update"})];
    let envelope = ApiResponse::paginated(
        items,
        Pagination::for_page(2, 10, 35, 10),
        "News fetched successfully",
    );
    let json = serde_json::to_value(&envelope).expect("serialize");

    assert_eq!(json["pagination"]["currentPage"], 2);
    assert_eq!(json["pagination"]["pageSize"], 10);
    assert_eq!(json["pagination"]["hasMore"], true);
}

#[test]
fn test_has_more_tracks_page_fill() {
    // hasMore is true iff the returned count equals the page size
    assert!(Pagination::for_page(1, 10, 100, 10).has_more);
    assert!(!Pagination::for_page(10, 10, 100, 7).has_more);
    assert!(!Pagination::for_page(1, 10, 0, 0).has_more);
}

// =============================================================================
// Error → status mapping
// =============================================================================

fn status_of(err: AppError) -> StatusCode {
    err.into_response().status()
}

#[test]
fn test_client_errors_map_to_4xx() {
    assert_eq!(
        status_of(AppError::BadRequest("Text and target language are required".into())),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_of(AppError::Unauthorized("Authentication required".into())),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        status_of(AppError::NotFound("Conversation".into())),
        StatusCode::NOT_FOUND
    );
    assert_eq!(status_of(AppError::RateLimited), StatusCode::TOO_MANY_REQUESTS);
}

#[test]
fn test_model_contract_violations_are_bad_gateway() {
    // Malformed LLM output surfaces as an explicit upstream error,
    // never a silently substituted canned payload
    assert_eq!(
        status_of(AppError::LowConfidence("missing field `recommendations`".into())),
        StatusCode::BAD_GATEWAY
    );
}

#[test]
fn test_internal_errors_are_500() {
    assert_eq!(
        status_of(AppError::Internal("pool exhausted".into())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
