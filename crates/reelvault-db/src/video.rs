//! Video metadata repository: reads and partial mutations on the videos table.
//!
//! The upload pipeline only ever writes `video_url`, and only after a
//! successful publish; everything else on the record is owned by the create
//! endpoint and the thumbnail handler.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reelvault_core::models::Video;
use reelvault_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const VIDEO_COLUMNS: &str =
    "id, owner_id, title, description, thumbnail_url, video_url, created_at, updated_at";

/// Row type for the videos table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct VideoRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoRow {
    pub fn into_video(self) -> Video {
        Video {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            thumbnail_url: self.thumbnail_url,
            video_url: self.video_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Metadata-store boundary for video records.
///
/// The trait seam exists so the HTTP surface can be exercised without a
/// running Postgres; the production implementation is [PgVideoStore].
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Insert a draft record (no video or thumbnail yet) owned by `owner_id`.
    async fn create(
        &self,
        owner_id: Uuid,
        title: String,
        description: Option<String>,
    ) -> Result<Video, AppError>;

    /// Fetch a record by id.
    async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// List records owned by `owner_id`, newest first.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Video>, AppError>;

    /// Record the stored-object reference for a published video.
    async fn set_video_url(&self, id: Uuid, video_url: String) -> Result<Video, AppError>;

    /// Record the asset URL for an uploaded thumbnail.
    async fn set_thumbnail_url(&self, id: Uuid, thumbnail_url: String) -> Result<Video, AppError>;
}

/// Postgres-backed video store.
#[derive(Clone)]
pub struct PgVideoStore {
    pool: PgPool,
}

impl PgVideoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for PgVideoStore {
    #[tracing::instrument(skip(self), fields(db.table = "videos"))]
    async fn create(
        &self,
        owner_id: Uuid,
        title: String,
        description: Option<String>,
    ) -> Result<Video, AppError> {
        let row: VideoRow = sqlx::query_as::<Postgres, VideoRow>(&format!(
            r#"
            INSERT INTO videos (id, owner_id, title, description)
            VALUES ($1, $2, $3, $4)
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&title)
        .bind(&description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into_video())
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let row: Option<VideoRow> = sqlx::query_as::<Postgres, VideoRow>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(VideoRow::into_video))
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.owner_id = %owner_id))]
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Video>, AppError> {
        let rows: Vec<VideoRow> = sqlx::query_as::<Postgres, VideoRow>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE owner_id = $1 ORDER BY created_at DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(VideoRow::into_video).collect())
    }

    #[tracing::instrument(skip(self, video_url), fields(db.table = "videos", db.record_id = %id))]
    async fn set_video_url(&self, id: Uuid, video_url: String) -> Result<Video, AppError> {
        let row: Option<VideoRow> = sqlx::query_as::<Postgres, VideoRow>(&format!(
            r#"
            UPDATE videos
            SET video_url = $2, updated_at = now()
            WHERE id = $1
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&video_url)
        .fetch_optional(&self.pool)
        .await?;
        row.map(VideoRow::into_video)
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    #[tracing::instrument(skip(self, thumbnail_url), fields(db.table = "videos", db.record_id = %id))]
    async fn set_thumbnail_url(&self, id: Uuid, thumbnail_url: String) -> Result<Video, AppError> {
        let row: Option<VideoRow> = sqlx::query_as::<Postgres, VideoRow>(&format!(
            r#"
            UPDATE videos
            SET thumbnail_url = $2, updated_at = now()
            WHERE id = $1
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&thumbnail_url)
        .fetch_optional(&self.pool)
        .await?;
        row.map(VideoRow::into_video)
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }
}
