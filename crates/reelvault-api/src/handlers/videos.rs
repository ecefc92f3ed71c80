//! Video record endpoints: create a draft, fetch one, list the caller's.
//!
//! Read paths never return the stored `bucket,key` reference; a fresh
//! presigned URL is issued on every read.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use reelvault_core::models::VideoResponse;
use reelvault_core::AppError;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::models::AuthUser;
use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[tracing::instrument(
    skip(state, request),
    fields(user_id = %auth.user_id, operation = "create_video")
)]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(request): Json<CreateVideoRequest>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title must not be empty".to_string()).into());
    }

    let video = state
        .videos
        .create(auth.user_id, request.title, request.description)
        .await?;

    Ok(Json(VideoResponse::from(video)))
}

#[tracing::instrument(
    skip(state),
    fields(user_id = %auth.user_id, video_id = %id, operation = "get_video")
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = state
        .videos
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
    if video.owner_id != auth.user_id {
        return Err(AppError::Unauthorized("You are not the owner of this video".to_string()).into());
    }

    Ok(Json(state.video_response(video).await?))
}

#[tracing::instrument(
    skip(state),
    fields(user_id = %auth.user_id, operation = "list_videos")
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let videos = state.videos.list_by_owner(auth.user_id).await?;

    let mut responses = Vec::with_capacity(videos.len());
    for video in videos {
        responses.push(state.video_response(video).await?);
    }

    Ok(Json(responses))
}
