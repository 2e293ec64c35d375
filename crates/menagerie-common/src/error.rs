//! Common error types used throughout menagerie.
//!
//! This module provides a unified error type that covers the failure cases of
//! the record stores: validation, lookups that miss, storage failures, and a
//! durable file that cannot be parsed.

/// Common error type for menagerie.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required field or file was missing, or a value was malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested record or blob was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Writing, deleting, or serializing stored data failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The durable metadata file does not contain a valid record list.
    #[error("Corrupt metadata store {path}: {message}")]
    CorruptStore {
        /// Location of the durable file.
        path: String,
        /// Parser message.
        message: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new Validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a new CorruptStore error.
    pub fn corrupt_store(path: impl std::fmt::Display, message: impl std::fmt::Display) -> Self {
        Self::CorruptStore {
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    /// Map this error to an HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::NotFound(_) => 404,
            Error::Storage(_) => 500,
            Error::CorruptStore { .. } => 500,
            Error::Io(_) => 500,
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
