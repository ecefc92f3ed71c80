//! Stream geometry and aspect-ratio classification.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Deserialize;

use crate::error::ToolError;

/// Pixel dimensions of a media file's video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamGeometry {
    pub width: i64,
    pub height: i64,
}

impl StreamGeometry {
    pub fn aspect_ratio(&self) -> AspectRatio {
        AspectRatio::classify(self.width, self.height)
    }
}

/// Aspect-ratio classification used for storage key layout. Advisory only:
/// it decides where the object lands, never whether the file is playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Landscape,
    Portrait,
    Other,
}

impl AspectRatio {
    /// Classify by exact integer-ratio match: `width == 16 * height / 9` is
    /// 16:9, `height == 16 * width / 9` is 9:16, anything else is other.
    pub fn classify(width: i64, height: i64) -> Self {
        if width == 16 * height / 9 {
            AspectRatio::Landscape
        } else if height == 16 * width / 9 {
            AspectRatio::Portrait
        } else {
            AspectRatio::Other
        }
    }

    /// Storage key prefix for this classification.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "landscape",
            AspectRatio::Portrait => "portrait",
            AspectRatio::Other => "other",
        }
    }
}

impl Display for AspectRatio {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AspectRatio::Landscape => write!(f, "16:9"),
            AspectRatio::Portrait => write!(f, "9:16"),
            AspectRatio::Other => write!(f, "other"),
        }
    }
}

/// ffprobe `-show_streams` JSON document. Only the fields the classifier
/// needs are modeled; everything else is ignored.
#[derive(Debug, Deserialize)]
struct ProbeDocument {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<i64>,
    height: Option<i64>,
}

/// Parse ffprobe stdout and extract the geometry of the first video stream
/// that carries pixel dimensions. An empty or video-less stream list is a
/// probe failure, not a classification.
pub fn parse_stream_geometry(stdout: &[u8]) -> Result<StreamGeometry, ToolError> {
    let document: ProbeDocument = serde_json::from_slice(stdout)?;

    document
        .streams
        .iter()
        .filter(|stream| stream.codec_type.as_deref() == Some("video"))
        .find_map(|stream| match (stream.width, stream.height) {
            (Some(width), Some(height)) if width > 0 && height > 0 => {
                Some(StreamGeometry { width, height })
            }
            _ => None,
        })
        .ok_or(ToolError::NoVideoStream)
}
