//! Reelvault Processing Library
//!
//! External media tool invocation (ffprobe stream inspection, ffmpeg
//! fast-start remux) behind the [MediaToolchain] trait, plus aspect-ratio
//! classification of probed stream geometry.

pub mod error;
pub mod geometry;
pub mod toolchain;

// Re-export commonly used types
pub use error::ToolError;
pub use geometry::{AspectRatio, StreamGeometry};
pub use toolchain::{FfmpegToolchain, MediaToolchain};
