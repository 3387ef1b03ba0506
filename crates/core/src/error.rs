//! Error types for bb-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for bb-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bb-core operations
///
/// Every failure carries its context (bucket, key, prefix, or path) in the
/// message, baked in at the wrap site. There are no automatic retries; each
/// error is surfaced once to the immediate caller.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller passed an argument the operation rejects up front
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store/transport failure from the backing object store
    #[error("Storage error: {0}")]
    Storage(String),

    /// Local filesystem failure during download
    #[error("IO error: {0}")]
    Io(String),

    /// Credential resolution failure
    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,          // UsageError
            Error::InvalidArgument(_) => 2, // UsageError
            Error::Storage(_) => 3,         // StorageError
            Error::Auth(_) => 4,            // AuthError
            Error::NotFound(_) => 5,        // NotFound
            Error::Io(_) => 1,              // GeneralError
        }
    }
}
