//! Caller identity extractors.
//!
//! Credential handling lives with the fronting gateway; by the time a
//! request reaches this service the gateway has authenticated it and set
//! `x-user-id`. These extractors read that header so owner-scoped handlers
//! can take a typed `UserId`.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

use agrisetu_core::{ApiResponse, UserId};

/// Header carrying the gateway-authenticated user ID.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor that requires a caller identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user_id): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {user_id}!")
/// }
/// ```
pub struct RequireUser(pub UserId);

/// Error returned when identity is required but missing or malformed.
pub struct IdentityRejection;

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            axum::Json(ApiResponse::<()>::error("Authentication required")),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = extract_user_id(parts).ok_or(IdentityRejection)?;

        crate::error::set_sentry_user(&user_id);

        Ok(Self(user_id))
    }
}

/// Extractor that optionally gets the caller identity.
///
/// Unlike `RequireUser`, this does not reject the request when the header
/// is absent.
pub struct OptionalUser(pub Option<UserId>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(extract_user_id(parts)))
    }
}

/// Read and parse the identity header.
fn extract_user_id(parts: &Parts) -> Option<UserId> {
    parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i32>().ok())
        .map(UserId::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/conversations");
        if let Some(value) = value {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (parts, ()) = builder.body(()).expect("request").into_parts();
        parts
    }

    #[test]
    fn test_extract_user_id_present() {
        let parts = parts_with_header(Some("42"));
        assert_eq!(extract_user_id(&parts), Some(UserId::new(42)));
    }

    #[test]
    fn test_extract_user_id_missing() {
        let parts = parts_with_header(None);
        assert_eq!(extract_user_id(&parts), None);
    }

    #[test]
    fn test_extract_user_id_malformed() {
        let parts = parts_with_header(Some("not-a-number"));
        assert_eq!(extract_user_id(&parts), None);
    }

    #[test]
    fn test_extract_user_id_trims_whitespace() {
        let parts = parts_with_header(Some(" 7 "));
        assert_eq!(extract_user_id(&parts), Some(UserId::new(7)));
    }
}
