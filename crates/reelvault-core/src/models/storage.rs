//! Stored-object references.
//!
//! A `StorageRef` records *where* a published object lives (bucket + key),
//! not a dereferenceable URL. It is what gets persisted in `videos.video_url`;
//! read paths exchange it for a fresh presigned URL on every request.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Composite bucket/key reference, serialized as `bucket,key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRef {
    pub bucket: String,
    pub key: String,
}

impl StorageRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        StorageRef {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse a stored `bucket,key` composite. Returns `None` for values that
    /// are not in composite form (e.g. a legacy plain URL), so callers can
    /// pass those through untouched.
    pub fn parse(value: &str) -> Option<StorageRef> {
        let (bucket, key) = value.split_once(',')?;
        if bucket.is_empty() || key.is_empty() {
            return None;
        }
        Some(StorageRef::new(bucket, key))
    }
}

impl Display for StorageRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{},{}", self.bucket, self.key)
    }
}
