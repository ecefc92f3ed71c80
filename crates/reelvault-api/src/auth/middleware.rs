//! Bearer-token authentication middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use reelvault_core::AppError;

use crate::auth::models::AuthUser;
use crate::error::HttpAppError;
use crate::state::AppState;

/// Extract the bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::Unauthorized("Authorization header is not a bearer token".to_string())
        })
}

/// Validate the caller's bearer JWT and store the resolved identity in
/// request extensions for handlers to extract.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = match bearer_token(request.headers())
        .and_then(|token| state.jwt.validate_token(token))
    {
        Ok(claims) => claims,
        Err(err) => return HttpAppError::from(err).into_response(),
    };

    request
        .extensions_mut()
        .insert(AuthUser {
            user_id: claims.sub,
        });

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        let headers = headers_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_rejected() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert!(bearer_token(&headers).is_err());

        let headers = headers_with_auth("Bearer ");
        assert!(bearer_token(&headers).is_err());
    }
}
