//! Error types for SMP
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation. Transport operations on the playback controller never
//! surface these to callers; failures are logged and observed as state
//! transitions and events instead.

use thiserror::Error;

/// Main error type for SMP modules
#[derive(Error, Debug)]
pub enum Error {
    /// Transport call addressed an index outside the current catalog
    #[error("Invalid track index {index} (catalog has {len} tracks)")]
    InvalidIndex { index: usize, len: usize },

    /// Transport call requires a non-empty catalog
    #[error("Catalog is empty")]
    EmptyCatalog,

    /// Player resource could not be created for a track location
    #[error("Resource creation failed: {0}")]
    ResourceCreation(String),

    /// Asynchronous error reported by an active player resource
    #[error("Playback error: {0}")]
    Playback(String),

    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using the SMP Error
pub type Result<T> = std::result::Result<T, Error>;
