//! The JSON response envelope shared by every endpoint.
//!
//! Every response body is `{"success": bool, ...}`: successful responses
//! carry `data` (and sometimes `message`), failures carry `error` (and
//! sometimes `message`). Frontends rely on this shape, so it lives in core
//! rather than per-route.

use serde::{Deserialize, Serialize};

/// Standard response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,
    /// Payload for successful responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Machine-readable-ish error description for failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Optional human-readable note, on success or failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Pagination metadata for list endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// Successful response wrapping `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            pagination: None,
        }
    }

    /// Successful response with an additional note.
    #[must_use]
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message.into()),
            pagination: None,
        }
    }

    /// Successful paginated response.
    #[must_use]
    pub fn paginated(data: T, pagination: Pagination, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message.into()),
            pagination: Some(pagination),
        }
    }

    /// Failed response with an error description.
    #[must_use]
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            pagination: None,
        }
    }

    /// Failed response with an error description and a note.
    #[must_use]
    pub fn error_with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: Some(message.into()),
            pagination: None,
        }
    }
}

/// Pagination metadata for list endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page index of this response.
    pub current_page: u32,
    /// Maximum items per page.
    pub page_size: u32,
    /// Total items reported by the upstream source.
    pub total_results: u32,
    /// Whether another page is likely available.
    ///
    /// True iff this page is full; the upstream feed has no reliable total,
    /// so a short page is the end-of-feed signal.
    pub has_more: bool,
}

impl Pagination {
    /// Build pagination metadata for one returned page.
    #[must_use]
    pub const fn for_page(current_page: u32, page_size: u32, total_results: u32, returned: u32) -> Self {
        Self {
            current_page,
            page_size,
            total_results,
            has_more: returned == page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_shape() {
        let resp = ApiResponse::ok(vec![1, 2, 3]);
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert!(json.get("error").is_none());
        assert!(json.get("pagination").is_none());
    }

    #[test]
    fn test_error_envelope_shape() {
        let resp = ApiResponse::<()>::error_with_message("Failed to fetch news", "upstream 500");
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Failed to fetch news");
        assert_eq!(json["message"], "upstream 500");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_pagination_has_more_full_page() {
        let p = Pagination::for_page(2, 10, 35, 10);
        assert!(p.has_more);
        assert_eq!(p.current_page, 2);
    }

    #[test]
    fn test_pagination_no_more_short_page() {
        let p = Pagination::for_page(4, 10, 35, 5);
        assert!(!p.has_more);
    }

    #[test]
    fn test_pagination_camel_case_wire_names() {
        let p = Pagination::for_page(1, 10, 10, 10);
        let json = serde_json::to_value(p).expect("serialize");
        assert!(json.get("currentPage").is_some());
        assert!(json.get("hasMore").is_some());
        assert!(json.get("totalResults").is_some());
    }
}
