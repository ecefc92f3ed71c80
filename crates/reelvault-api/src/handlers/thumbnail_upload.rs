//! Thumbnail upload: a strict subset of the video pipeline with no
//! probe/remux stage. Bytes land in the local assets store and the resulting
//! asset URL is persisted directly (thumbnails are not presigned).

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use reelvault_core::models::VideoResponse;
use reelvault_core::AppError;
use reelvault_storage::keys;
use uuid::Uuid;

use crate::auth::models::AuthUser;
use crate::error::HttpAppError;
use crate::handlers::multipart::{multipart_error, normalize_media_type};
use crate::state::AppState;

/// Multipart form field carrying the thumbnail payload.
const THUMBNAIL_FIELD: &str = "thumbnail";
const ALLOWED_MEDIA_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

#[tracing::instrument(
    skip(state, multipart),
    fields(
        user_id = %auth.user_id,
        video_id = %video_id,
        operation = "upload_thumbnail"
    )
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(video_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = state
        .videos
        .get(video_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Video {} not found", video_id)))?;
    if video.owner_id != auth.user_id {
        return Err(AppError::Unauthorized("You are not the owner of this video".to_string()).into());
    }

    let (data, media_type) =
        receive_thumbnail(&mut multipart, state.config.max_thumbnail_size_bytes).await?;

    let name = keys::random_asset_name(&media_type);
    let url = state.assets.put_object(&name, data, &media_type).await?;

    let video = state.videos.set_thumbnail_url(video_id, url).await?;

    tracing::info!(asset = %name, "thumbnail upload complete");

    let response = state.video_response(video).await?;
    Ok(Json(response))
}

/// Pull the thumbnail part out of the multipart form. Thumbnails are small,
/// so the bytes are buffered in memory under their own ceiling.
async fn receive_thumbnail(
    multipart: &mut Multipart,
    max_size_bytes: usize,
) -> Result<(Vec<u8>, String), AppError> {
    let mut received: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }
        if received.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Multiple '{}' fields are not allowed",
                THUMBNAIL_FIELD
            )));
        }

        let content_type = field.content_type().map(normalize_media_type).ok_or_else(|| {
            AppError::InvalidInput("Missing Content-Type for the thumbnail part".to_string())
        })?;
        if !ALLOWED_MEDIA_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::InvalidInput(
                "Invalid media type. Must be a jpeg/png image".to_string(),
            ));
        }

        let data = field.bytes().await.map_err(multipart_error)?;
        if data.len() > max_size_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Thumbnail exceeds maximum allowed size of {} MB",
                max_size_bytes / 1024 / 1024
            )));
        }

        received = Some((data.to_vec(), content_type));
    }

    received.ok_or_else(|| {
        AppError::InvalidInput(format!("Missing form file field '{}'", THUMBNAIL_FIELD))
    })
}
