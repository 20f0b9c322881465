//! Storage abstraction trait
//!
//! This module defines the Storage trait implemented by image persistence backends.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Listing failed: {0}")]
    ListFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Append-only store of processed images, addressed by derived filename.
///
/// Writing an existing name replaces it (last writer wins); there is no
/// delete operation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `filename` and return the path it landed at.
    async fn store(&self, filename: &str, data: &[u8]) -> StorageResult<PathBuf>;

    /// Read a stored file by exact name.
    async fn read(&self, filename: &str) -> StorageResult<Vec<u8>>;

    /// Every stored name starting with `prefix`, sorted lexicographically.
    async fn list_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>>;
}
