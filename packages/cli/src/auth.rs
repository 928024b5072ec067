// ABOUTME: Authentication guard for mutating API requests
// ABOUTME: Resolves an API token from the request headers into a Principal

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use crate::db::DbState;
use crate::error::AppError;

/// Alternative header name for API token
pub const API_TOKEN_HEADER: &str = "x-api-token";

/// Identity allowed to mutate resources
#[derive(Debug, Clone)]
pub struct Principal {
    pub token_id: String,
    pub name: String,
}

/// Token from `Authorization: Bearer <token>`, falling back to `X-API-Token`
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    bearer
        .or_else(|| {
            headers
                .get(API_TOKEN_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
        })
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

impl FromRequestParts<DbState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, db: &DbState) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path().to_string();

        let token = extract_token(&parts.headers).ok_or_else(|| {
            warn!(path = %path, "Missing API token");
            AppError::Unauthorized("Authentication required".to_string())
        })?;

        let token_info = db.token_storage.verify_token(&token).await.map_err(|e| {
            warn!(error = %e, "Token verification failed");
            AppError::Unauthorized("Invalid API token".to_string())
        })?;

        let Some(token_info) = token_info else {
            warn!(path = %path, "Invalid API token provided");
            return Err(AppError::Unauthorized("Invalid API token".to_string()));
        };

        if let Err(e) = db.token_storage.update_last_used(&token_info.id).await {
            // Log error but don't fail the request
            warn!(error = %e, "Failed to update token last_used timestamp");
        }

        debug!(path = %path, principal = %token_info.name, "API token validated");

        Ok(Principal {
            token_id: token_info.id,
            name: token_info.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_extract_api_token_header() {
        let mut headers = HeaderMap::new();
        headers.insert(API_TOKEN_HEADER, HeaderValue::from_static("xyz"));
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_bearer_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer first"));
        headers.insert(API_TOKEN_HEADER, HeaderValue::from_static("second"));
        assert_eq!(extract_token(&headers).as_deref(), Some("first"));
    }

    #[test]
    fn test_missing_or_malformed_token() {
        assert!(extract_token(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert!(extract_token(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert!(extract_token(&headers).is_none());
    }
}
