//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use reelvault_core::Config;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::middleware::auth_middleware;
use crate::handlers;
use crate::state::AppState;

/// Headroom on top of the video size ceiling for multipart framing.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Server-level concurrency cap to protect against resource exhaustion
/// under extreme load.
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Setup all application routes
pub fn build_router(state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(&state.config)?;

    // Public routes (no authentication required)
    let public_routes: Router<Arc<AppState>> =
        Router::new().route("/healthz", get(handlers::health::healthz));

    // Protected routes (require authentication)
    let protected_routes: Router<Arc<AppState>> = Router::new()
        .route(
            "/api/v0/videos",
            post(handlers::videos::create_video).get(handlers::videos::list_videos),
        )
        .route("/api/v0/videos/{id}", get(handlers::videos::get_video))
        .route(
            "/api/v0/videos/{id}/video",
            post(handlers::video_upload::upload_video),
        )
        .route(
            "/api/v0/videos/{id}/thumbnail",
            post(handlers::thumbnail_upload::upload_thumbnail),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Thumbnail assets are served straight from the local assets directory.
    let assets_routes: Router<Arc<AppState>> =
        Router::new().nest_service("/assets", ServeDir::new(&state.config.assets_dir));

    let app = public_routes
        .merge(protected_routes)
        .merge(assets_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(RequestBodyLimitLayer::new(
            state.config.max_video_size_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(DefaultBodyLimit::disable())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .map(|origin| {
                origin
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", origin))
            })
            .collect::<Result<_, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
