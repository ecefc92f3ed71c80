//! Application state shared across handlers.

use std::sync::Arc;

use reelvault_core::models::{StorageRef, Video, VideoResponse};
use reelvault_core::{AppError, Config};
use reelvault_db::VideoStore;
use reelvault_processing::MediaToolchain;
use reelvault_storage::ObjectStorage;

use crate::auth::jwt::JwtService;

/// Shared application state. Every external collaborator sits behind a trait
/// object so tests can substitute fakes at the seams.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Metadata store for video records.
    pub videos: Arc<dyn VideoStore>,
    /// Object store holding published video content.
    pub storage: Arc<dyn ObjectStorage>,
    /// Local asset store for thumbnails, served under /assets.
    pub assets: Arc<dyn ObjectStorage>,
    /// External media tools (probe, remux).
    pub tools: Arc<dyn MediaToolchain>,
    pub jwt: JwtService,
}

impl AppState {
    /// Build the API representation of a record, exchanging a stored
    /// `bucket,key` reference for a freshly presigned URL. Values that are
    /// not in composite form pass through untouched.
    pub async fn video_response(&self, video: Video) -> Result<VideoResponse, AppError> {
        let mut response = VideoResponse::from(video);

        if let Some(stored) = response.video_url.as_deref().and_then(StorageRef::parse) {
            let url = self
                .storage
                .presigned_get_url(&stored.key, self.config.presign_expiry())
                .await
                .map_err(AppError::from)?;
            response.video_url = Some(url);
        }

        Ok(response)
    }
}
