//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait that all storage backends must
//! implement.

use async_trait::async_trait;
use reelvault_core::AppError;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Both backends (S3, local filesystem) implement this trait so the upload
/// pipeline and the thumbnail handler work against the same seam, and tests
/// can substitute a fake.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store identifier recorded in persisted object references
    /// (the bucket name for S3).
    fn bucket(&self) -> &str;

    /// Put an object under `key` with the given content type, overwriting any
    /// existing object at that key. Returns the backend's stable URL for the
    /// object (not a presigned URL).
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Generate a presigned/temporary URL for direct GET access, valid for
    /// exactly `expires_in` from issuance.
    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Delete an object by its key
    async fn delete(&self, key: &str) -> StorageResult<()>;
}
