//! Common utilities for multipart upload handlers.

use reelvault_core::AppError;

/// Normalize a MIME type by stripping parameters and case
/// (e.g. "VIDEO/MP4; codecs=avc1" -> "video/mp4").
pub(crate) fn normalize_media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_ascii_lowercase()
}

/// Map a multipart read failure to a client-visible bad request.
pub(crate) fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::InvalidInput(format!("Failed to read multipart form: {}", err))
}
