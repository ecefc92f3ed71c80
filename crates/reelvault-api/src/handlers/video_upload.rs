//! Video upload pipeline: receive, classify, remux, publish, persist.
//!
//! Stage order matters: ownership is checked before any file I/O; the probe
//! and remux run against request-scoped temp files; the metadata record is
//! only touched after the object store has accepted the remuxed bytes. A
//! failure after publish but before persist leaves an unreferenced object
//! behind (accepted, uncompensated).

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use reelvault_core::models::{StorageRef, VideoResponse};
use reelvault_core::AppError;
use reelvault_storage::keys;
use tempfile::{NamedTempFile, TempPath};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::auth::models::AuthUser;
use crate::error::HttpAppError;
use crate::handlers::multipart::{multipart_error, normalize_media_type};
use crate::state::AppState;

/// Multipart form field carrying the video payload.
const VIDEO_FIELD: &str = "video";
/// The single accepted upload media type.
const VIDEO_MEDIA_TYPE: &str = "video/mp4";

#[tracing::instrument(
    skip(state, multipart),
    fields(
        user_id = %auth.user_id,
        video_id = %video_id,
        operation = "upload_video"
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(video_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    // Admission: resolve the record and enforce ownership before any file I/O.
    let video = state
        .videos
        .get(video_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Video {} not found", video_id)))?;
    if video.owner_id != auth.user_id {
        return Err(AppError::Unauthorized("You are not the owner of this video".to_string()).into());
    }

    // Receive: copy the uploaded part into a request-scoped temp file.
    // The guard deletes it on every exit path.
    let (upload, media_type) = receive_video(&mut multipart).await?;

    // Classify: aspect ratio decides the storage key prefix, nothing more.
    let geometry = state.tools.probe(upload.path()).await?;
    let ratio = geometry.aspect_ratio();

    // Remux: rewrite the container for progressive playback into a second
    // temp file; the remux never touches its input in place.
    let remuxed = state.tools.remux_faststart(upload.path()).await?;
    let remuxed = TempPath::from_path(remuxed);

    // Publish: fresh random key under the classification prefix, tagged with
    // the upload's media type.
    let key = keys::prefixed_key(ratio.key_prefix(), &keys::random_asset_name(&media_type));
    let data = tokio::fs::read(&remuxed).await.map_err(AppError::from)?;
    let size_bytes = data.len();
    state.storage.put_object(&key, data, &media_type).await?;

    // Persist: record where the object lives. This is the only record
    // mutation the pipeline performs, and it happens only after the object
    // store accepted the bytes.
    let stored = StorageRef::new(state.storage.bucket(), &key);
    let video = state
        .videos
        .set_video_url(video_id, stored.to_string())
        .await?;

    tracing::info!(
        key = %key,
        ratio = %ratio,
        size_bytes,
        "video upload published and persisted"
    );

    // Respond with a freshly presigned URL; the raw bucket,key reference
    // never leaves the server.
    let response = state.video_response(video).await?;
    Ok(Json(response))
}

/// Pull the video part out of the multipart form and spool it to a temp file.
/// The part's declared content type must be exactly `video/mp4` (parameters
/// stripped); anything else is rejected before a byte is written.
async fn receive_video(multipart: &mut Multipart) -> Result<(NamedTempFile, String), AppError> {
    let mut received: Option<(NamedTempFile, String)> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }
        if received.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Multiple '{}' fields are not allowed",
                VIDEO_FIELD
            )));
        }

        let content_type = field.content_type().map(normalize_media_type).ok_or_else(|| {
            AppError::InvalidInput("Missing Content-Type for the video part".to_string())
        })?;
        if content_type != VIDEO_MEDIA_TYPE {
            return Err(AppError::InvalidInput(
                "Invalid media type. Must be an mp4 video".to_string(),
            ));
        }

        let temp = tempfile::Builder::new()
            .prefix("reelvault-upload-")
            .suffix(".mp4")
            .tempfile()?;
        let mut file = tokio::fs::File::create(temp.path()).await?;

        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        file.sync_all().await?;

        received = Some((temp, content_type));
    }

    received.ok_or_else(|| {
        AppError::InvalidInput(format!("Missing form file field '{}'", VIDEO_FIELD))
    })
}
