//! Test helpers: in-memory fakes for the metadata store, object store, and
//! media toolchain, plus a router factory wired up like production.
#![allow(dead_code)] // shared across test binaries; not every binary uses every helper

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use reelvault_api::auth::jwt::JwtService;
use reelvault_api::setup::routes::build_router;
use reelvault_api::state::AppState;
use reelvault_core::models::Video;
use reelvault_core::{AppError, Config};
use reelvault_db::VideoStore;
use reelvault_processing::{MediaToolchain, StreamGeometry, ToolError};
use reelvault_storage::{LocalStorage, ObjectStorage, StorageError, StorageResult};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_BUCKET: &str = "test-bucket";
pub const TEST_JWT_SECRET: &str = "test-secret-used-only-in-tests";

// ----- Fake metadata store -----

#[derive(Default)]
pub struct FakeVideoStore {
    videos: Mutex<HashMap<Uuid, Video>>,
}

impl FakeVideoStore {
    /// Seed a draft record owned by `owner_id` and return it.
    pub fn seed_draft(&self, owner_id: Uuid) -> Video {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            owner_id,
            title: "test video".to_string(),
            description: None,
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        };
        self.videos.lock().unwrap().insert(video.id, video.clone());
        video
    }

    /// Seed a record that already has a stored object reference.
    pub fn seed_published(&self, owner_id: Uuid, video_url: &str) -> Video {
        let mut video = self.seed_draft(owner_id);
        video.video_url = Some(video_url.to_string());
        self.videos.lock().unwrap().insert(video.id, video.clone());
        video
    }

    pub fn stored(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl VideoStore for FakeVideoStore {
    async fn create(
        &self,
        owner_id: Uuid,
        title: String,
        description: Option<String>,
    ) -> Result<Video, AppError> {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            owner_id,
            title,
            description,
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        };
        self.videos.lock().unwrap().insert(video.id, video.clone());
        Ok(video)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.videos.lock().unwrap().get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Video>, AppError> {
        let mut videos: Vec<Video> = self
            .videos
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.owner_id == owner_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }

    async fn set_video_url(&self, id: Uuid, video_url: String) -> Result<Video, AppError> {
        let mut videos = self.videos.lock().unwrap();
        let video = videos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
        video.video_url = Some(video_url);
        video.updated_at = Utc::now();
        Ok(video.clone())
    }

    async fn set_thumbnail_url(&self, id: Uuid, thumbnail_url: String) -> Result<Video, AppError> {
        let mut videos = self.videos.lock().unwrap();
        let video = videos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
        video.thumbnail_url = Some(thumbnail_url);
        video.updated_at = Utc::now();
        Ok(video.clone())
    }
}

// ----- Fake object store -----

#[derive(Default)]
pub struct FakeObjectStorage {
    pub puts: Mutex<Vec<(String, Vec<u8>, String)>>,
    pub fail_puts: AtomicBool,
}

impl FakeObjectStorage {
    pub fn put_count(&self) -> usize {
        self.puts.lock().unwrap().len()
    }

    pub fn single_put(&self) -> (String, Vec<u8>, String) {
        let puts = self.puts.lock().unwrap();
        assert_eq!(puts.len(), 1, "expected exactly one published object");
        puts[0].clone()
    }
}

#[async_trait]
impl ObjectStorage for FakeObjectStorage {
    fn bucket(&self) -> &str {
        TEST_BUCKET
    }

    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("injected failure".to_string()));
        }
        self.puts
            .lock()
            .unwrap()
            .push((key.to_string(), data, content_type.to_string()));
        Ok(format!("https://{}.example/{}", TEST_BUCKET, key))
    }

    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        Ok(format!(
            "https://signed.example/{}/{}?expires={}",
            TEST_BUCKET,
            key,
            expires_in.as_secs()
        ))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.puts.lock().unwrap().iter().any(|(k, _, _)| k == key))
    }

    async fn delete(&self, _key: &str) -> StorageResult<()> {
        Ok(())
    }
}

// ----- Fake media toolchain -----

/// Configurable toolchain fake. Records the paths it was handed so tests can
/// assert request-scoped temp files were cleaned up afterwards.
pub struct FakeToolchain {
    pub geometry: Option<StreamGeometry>,
    pub fail_remux: bool,
    pub probe_calls: AtomicUsize,
    pub remux_calls: AtomicUsize,
    pub probe_inputs: Mutex<Vec<PathBuf>>,
    pub remux_outputs: Mutex<Vec<PathBuf>>,
}

impl FakeToolchain {
    pub fn with_geometry(width: i64, height: i64) -> Self {
        Self {
            geometry: Some(StreamGeometry { width, height }),
            ..Self::failing_probe()
        }
    }

    pub fn failing_probe() -> Self {
        Self {
            geometry: None,
            fail_remux: false,
            probe_calls: AtomicUsize::new(0),
            remux_calls: AtomicUsize::new(0),
            probe_inputs: Mutex::new(Vec::new()),
            remux_outputs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_remux(width: i64, height: i64) -> Self {
        Self {
            fail_remux: true,
            ..Self::with_geometry(width, height)
        }
    }
}

#[async_trait]
impl MediaToolchain for FakeToolchain {
    async fn probe(&self, input: &Path) -> Result<StreamGeometry, ToolError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.probe_inputs.lock().unwrap().push(input.to_path_buf());
        self.geometry.ok_or(ToolError::NoVideoStream)
    }

    async fn remux_faststart(&self, input: &Path) -> Result<PathBuf, ToolError> {
        self.remux_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_remux {
            return Err(ToolError::EmptyOutput {
                path: input.to_path_buf(),
            });
        }
        let mut name = input.as_os_str().to_os_string();
        name.push(".faststart.mp4");
        let output = PathBuf::from(name);
        let data = tokio::fs::read(input).await?;
        tokio::fs::write(&output, data).await?;
        self.remux_outputs.lock().unwrap().push(output.clone());
        Ok(output)
    }
}

// ----- Test application -----

pub struct TestApp {
    pub router: Router,
    pub videos: Arc<FakeVideoStore>,
    pub storage: Arc<FakeObjectStorage>,
    pub tools: Arc<FakeToolchain>,
    pub jwt: JwtService,
    pub assets_dir: TempDir,
}

impl TestApp {
    pub fn token_for(&self, user_id: Uuid) -> String {
        self.jwt.create_token(user_id).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

fn test_config(assets_dir: &Path, max_video_size_bytes: usize) -> Config {
    Config {
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        db_timeout_seconds: 5,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiry_hours: 24,
        s3_bucket: TEST_BUCKET.to_string(),
        s3_region: "us-east-1".to_string(),
        s3_endpoint: None,
        assets_dir: assets_dir.to_string_lossy().into_owned(),
        assets_base_url: "http://localhost:8091/assets".to_string(),
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        tool_timeout_secs: 30,
        max_video_size_bytes,
        max_thumbnail_size_bytes: 10 << 20,
        presign_expiry_secs: 300,
    }
}

pub async fn setup_test_app(tools: FakeToolchain) -> TestApp {
    setup_test_app_with_limit(tools, 1 << 30).await
}

pub async fn setup_test_app_with_limit(
    tools: FakeToolchain,
    max_video_size_bytes: usize,
) -> TestApp {
    let assets_dir = tempfile::tempdir().expect("Failed to create assets directory");
    let config = test_config(assets_dir.path(), max_video_size_bytes);

    let videos = Arc::new(FakeVideoStore::default());
    let storage = Arc::new(FakeObjectStorage::default());
    let tools = Arc::new(tools);
    let assets: Arc<dyn ObjectStorage> = Arc::new(
        LocalStorage::new(assets_dir.path(), config.assets_base_url.clone())
            .await
            .expect("Failed to create local assets storage"),
    );
    let jwt = JwtService::new(config.jwt_secret.clone(), config.jwt_expiry_hours);

    let state = Arc::new(AppState {
        config,
        videos: videos.clone(),
        storage: storage.clone(),
        assets,
        tools: tools.clone(),
        jwt: jwt.clone(),
    });

    let router = build_router(state).expect("Failed to build router");

    TestApp {
        router,
        videos,
        storage,
        tools,
        jwt,
        assets_dir,
    }
}

// ----- Request construction -----

const BOUNDARY: &str = "reelvault-test-boundary";

/// Build a single-part multipart/form-data body. Returns (content-type
/// header value, body bytes).
pub fn multipart_body(
    field_name: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field_name}\"; \
             filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

pub fn upload_request(
    video_id: &str,
    token: &str,
    field_name: &str,
    part_content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let (content_type, body) = multipart_body(field_name, "upload.mp4", part_content_type, data);
    Request::builder()
        .method("POST")
        .uri(format!("/api/v0/videos/{}/video", video_id))
        .header("Authorization", format!("Bearer {}", token))
        .header("Content-Type", content_type)
        .header("Content-Length", body.len())
        .body(Body::from(body))
        .unwrap()
}

pub async fn response_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
