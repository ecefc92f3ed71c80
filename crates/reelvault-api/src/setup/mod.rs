//! Application initialization: database pool, storage backends, toolchain,
//! and the router.

pub mod routes;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use reelvault_core::Config;
use reelvault_db::{PgVideoStore, VideoStore};
use reelvault_processing::{FfmpegToolchain, MediaToolchain};
use reelvault_storage::{LocalStorage, ObjectStorage, S3Storage};
use sqlx::postgres::PgPoolOptions;

use crate::auth::jwt::JwtService;
use crate::state::AppState;

pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let videos: Arc<dyn VideoStore> = Arc::new(PgVideoStore::new(pool));

    let storage: Arc<dyn ObjectStorage> = Arc::new(
        S3Storage::new(
            config.s3_bucket.clone(),
            config.s3_region.clone(),
            config.s3_endpoint.clone(),
        )
        .await
        .context("Failed to configure S3 storage")?,
    );

    let assets: Arc<dyn ObjectStorage> = Arc::new(
        LocalStorage::new(config.assets_dir.clone(), config.assets_base_url.clone())
            .await
            .context("Failed to prepare assets directory")?,
    );

    let tools: Arc<dyn MediaToolchain> = Arc::new(FfmpegToolchain::new(
        config.ffprobe_path.clone(),
        config.ffmpeg_path.clone(),
        config.tool_timeout(),
    ));

    let jwt = JwtService::new(config.jwt_secret.clone(), config.jwt_expiry_hours);

    let state = Arc::new(AppState {
        config,
        videos,
        storage,
        assets,
        tools,
        jwt,
    });

    let router = routes::build_router(state.clone())?;

    Ok((state, router))
}
