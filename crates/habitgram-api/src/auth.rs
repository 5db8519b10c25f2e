//! Request authentication helpers.
//!
//! User endpoints carry the opaque caller identity in an `x-telegram-id`
//! header (the mini-app frontend forwards it after platform init);
//! validating the platform's init-data signature is a transport concern
//! outside this crate. The cron endpoint uses a shared bearer secret.

use crate::ApiError;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use habitgram_core::UserId;

const CALLER_HEADER: &str = "x-telegram-id";

/// Extracts the caller identity, rejecting requests without one.
pub(crate) fn caller(headers: &HeaderMap) -> Result<UserId, ApiError> {
    let raw = headers
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    let id = raw
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest(format!("invalid {CALLER_HEADER} header")))?;
    Ok(UserId(id))
}

/// Verifies the cron bearer token.
pub(crate) fn check_cron_bearer(headers: &HeaderMap, secret: &str) -> Result<(), ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    match value.strip_prefix("Bearer ") {
        Some(token) if !secret.is_empty() && token == secret => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn caller_requires_the_identity_header() {
        let headers = HeaderMap::new();
        assert!(matches!(caller(&headers), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn caller_parses_a_numeric_identity() {
        let mut headers = HeaderMap::new();
        headers.insert(CALLER_HEADER, HeaderValue::from_static("12345"));
        assert_eq!(caller(&headers).unwrap(), UserId(12345));

        headers.insert(CALLER_HEADER, HeaderValue::from_static("not-a-number"));
        assert!(matches!(caller(&headers), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn cron_bearer_must_match_exactly() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer sekret-sekret"));
        assert!(check_cron_bearer(&headers, "sekret-sekret").is_ok());
        assert!(check_cron_bearer(&headers, "other").is_err());
        // An empty configured secret never authorizes.
        assert!(check_cron_bearer(&headers, "").is_err());
    }
}
