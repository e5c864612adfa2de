//! Agriculture news route handlers.

use axum::{Json, extract::Query, extract::State};
use serde::Deserialize;
use tracing::instrument;

use agrisetu_core::{ApiResponse, LanguageCode, Pagination};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Headlines per page.
const PAGE_SIZE: usize = 10;

/// Query parameters for the news feed.
#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    /// Interface language for headlines (default: en).
    pub language: Option<String>,
    /// 1-based page index (default: 1).
    pub page: Option<u32>,
}

/// Fetch agriculture headlines, paginated.
#[instrument(skip(state))]
pub async fn agriculture(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>> {
    let language = match query.language.as_deref() {
        None => LanguageCode::english(),
        Some(raw) => LanguageCode::parse(raw)
            .map_err(|e| AppError::BadRequest(format!("Invalid language: {e}")))?,
    };
    let page = query.page.unwrap_or(1).max(1);

    let headlines = state.news().agriculture_headlines(&language).await?;

    let total = headlines.len();
    let items = page_slice(&headlines, page, PAGE_SIZE).to_vec();
    let returned = u32::try_from(items.len()).unwrap_or(0);
    let pagination = Pagination::for_page(
        page,
        u32::try_from(PAGE_SIZE).unwrap_or(u32::MAX),
        u32::try_from(total).unwrap_or(u32::MAX),
        returned,
    );

    let message = if total == 0 {
        "No news found"
    } else {
        "News fetched successfully"
    };

    Ok(Json(ApiResponse::paginated(items, pagination, message)))
}

/// Slice one page out of the full headline list.
fn page_slice(items: &[serde_json::Value], page: u32, page_size: usize) -> &[serde_json::Value] {
    let start = (page.saturating_sub(1) as usize).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    items.get(start..end).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headlines(n: usize) -> Vec<serde_json::Value> {
        (0..n).map(|i| serde_json::json!({"position": i})).collect()
    }

    #[test]
    fn test_page_slice_first_page() {
        let items = headlines(25);
        let page = page_slice(&items, 1, 10);
        assert_eq!(page.len(), 10);
        assert_eq!(page[0]["position"], 0);
    }

    #[test]
    fn test_page_slice_second_page() {
        let items = headlines(25);
        let page = page_slice(&items, 2, 10);
        assert_eq!(page.len(), 10);
        assert_eq!(page[0]["position"], 10);
    }

    #[test]
    fn test_page_slice_last_partial_page() {
        let items = headlines(25);
        let page = page_slice(&items, 3, 10);
        assert_eq!(page.len(), 5);
    }

    #[test]
    fn test_page_slice_beyond_end() {
        let items = headlines(25);
        assert!(page_slice(&items, 4, 10).is_empty());
        assert!(page_slice(&items, 100, 10).is_empty());
    }

    #[test]
    fn test_page_two_pagination_contract() {
        // A full second page must report currentPage 2 and hasMore
        let items = headlines(25);
        let page = page_slice(&items, 2, PAGE_SIZE);
        let pagination = Pagination::for_page(2, 10, 25, u32::try_from(page.len()).unwrap_or(0));

        assert_eq!(pagination.current_page, 2);
        assert!(pagination.has_more);

        let page = page_slice(&items, 3, PAGE_SIZE);
        let pagination = Pagination::for_page(3, 10, 25, u32::try_from(page.len()).unwrap_or(0));
        assert!(!pagination.has_more);
    }
}
