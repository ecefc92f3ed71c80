//! Reelvault API Library
//!
//! This crate provides the HTTP API handlers, middleware, and application setup.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
