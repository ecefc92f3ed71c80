//! Reelvault DB Library
//!
//! Metadata-store boundary: the `VideoStore` trait and its Postgres
//! implementation. Schema lives in the workspace `migrations/` directory.

pub mod video;

pub use video::{PgVideoStore, VideoStore};
