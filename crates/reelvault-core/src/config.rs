//! Configuration module
//!
//! Environment-driven configuration for the API server: database, auth,
//! object storage, media tools, and upload limits.

use std::env;
use std::time::Duration;

use anyhow::Context;

const DEFAULT_SERVER_PORT: u16 = 8091;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 120;
/// Upload ceiling for a single video body (1 GiB).
const DEFAULT_MAX_VIDEO_SIZE_BYTES: usize = 1 << 30;
/// Upload ceiling for a thumbnail image (10 MiB).
const DEFAULT_MAX_THUMBNAIL_SIZE_BYTES: usize = 10 << 20;
/// Presigned GET URLs are valid for five minutes from issuance.
const DEFAULT_PRESIGN_EXPIRY_SECS: u64 = 300;

/// Application configuration, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,

    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,

    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,

    pub s3_bucket: String,
    pub s3_region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub s3_endpoint: Option<String>,

    /// Local directory for thumbnail assets, served under /assets.
    pub assets_dir: String,
    /// Public base URL of the assets mount.
    pub assets_base_url: String,

    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub tool_timeout_secs: u64,

    pub max_video_size_bytes: usize,
    pub max_thumbnail_size_bytes: usize,
    pub presign_expiry_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let server_port = env_parsed("SERVER_PORT", DEFAULT_SERVER_PORT)?;
        let assets_base_url = env::var("ASSETS_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}/assets", server_port));

        Ok(Config {
            server_port,
            cors_origins: env_list("CORS_ORIGINS", "*"),
            environment: env_or("ENVIRONMENT", "development"),

            database_url: env_required("DATABASE_URL")?,
            db_max_connections: env_parsed("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            db_timeout_seconds: env_parsed("DB_TIMEOUT_SECONDS", DEFAULT_DB_TIMEOUT_SECS)?,

            jwt_secret: env_required("JWT_SECRET")?,
            jwt_expiry_hours: env_parsed("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS)?,

            s3_bucket: env_required("S3_BUCKET")?,
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .context("S3_REGION or AWS_REGION must be set")?,
            s3_endpoint: env::var("S3_ENDPOINT").ok(),

            assets_dir: env_or("ASSETS_DIR", "./assets"),
            assets_base_url,

            ffmpeg_path: env_or("FFMPEG_PATH", "ffmpeg"),
            ffprobe_path: env_or("FFPROBE_PATH", "ffprobe"),
            tool_timeout_secs: env_parsed("TOOL_TIMEOUT_SECS", DEFAULT_TOOL_TIMEOUT_SECS)?,

            max_video_size_bytes: env_parsed("MAX_VIDEO_SIZE_BYTES", DEFAULT_MAX_VIDEO_SIZE_BYTES)?,
            max_thumbnail_size_bytes: env_parsed(
                "MAX_THUMBNAIL_SIZE_BYTES",
                DEFAULT_MAX_THUMBNAIL_SIZE_BYTES,
            )?,
            presign_expiry_secs: env_parsed("PRESIGN_EXPIRY_SECS", DEFAULT_PRESIGN_EXPIRY_SECS)?,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    pub fn presign_expiry(&self) -> Duration {
        Duration::from_secs(self.presign_expiry_secs)
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_required(key: &str) -> Result<String, anyhow::Error> {
    env::var(key).with_context(|| format!("{} must be set", key))
}

fn env_list(key: &str, default: &str) -> Vec<String> {
    env_or(key, default)
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env_parsed<T>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} is not a valid value", key)),
        Err(_) => Ok(default),
    }
}
