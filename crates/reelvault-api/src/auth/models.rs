//! Authenticated-caller context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use reelvault_core::AppError;
use uuid::Uuid;

use crate::error::HttpAppError;

/// Caller identity resolved by the auth middleware and stored in request
/// extensions.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

// Extracted from request parts (rather than an Extension extractor) so it
// composes with Multipart in handler signatures.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().copied().ok_or_else(|| {
            HttpAppError::from(AppError::Unauthorized(
                "Missing authentication context".to_string(),
            ))
        })
    }
}
