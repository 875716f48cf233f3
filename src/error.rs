// src/error.rs

//! Crate-wide error types
//!
//! One variant per failure stage. Item-level variants (catalog fetch,
//! artifact download) are logged and skipped by the sync loop; run-level
//! variants (config load, mirror-root creation, index generation) abort
//! the process with a non-zero exit.

use thiserror::Error;

/// Errors produced by mirror operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be read or parsed
    #[error("Failed to load configuration: {0}")]
    ConfigError(String),

    /// Catalog request failed (transport error or non-2xx response)
    #[error("Failed to fetch plugin catalog: {0}")]
    FetchError(String),

    /// Catalog response body could not be decoded
    #[error("Failed to decode catalog response: {0}")]
    DecodeError(String),

    /// Artifact download failed (transport error or non-2xx response)
    #[error("Failed to download artifact: {0}")]
    DownloadError(String),

    /// Metadata sidecar could not be encoded or written
    #[error("Failed to write artifact metadata: {0}")]
    MetadataWriteError(String),

    /// Metadata sidecar could not be read or parsed (fatal to index generation)
    #[error("Failed to read artifact metadata: {0}")]
    MetadataReadError(String),

    /// Filesystem operation failed
    #[error("I/O error: {0}")]
    IoError(String),

    /// Component construction failed (HTTP client, mirror root, listener)
    #[error("Initialization error: {0}")]
    InitError(String),
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
