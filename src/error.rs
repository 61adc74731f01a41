//! Error types and handling infrastructure for pagekit.
//!
//! Feature handlers never fail: a missing element silently disables the part of
//! the feature that needed it. Errors only surface from the edges of the crate
//! (stored preferences, configuration and fixture loading, script parsing, and
//! binding to the async runtime).

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for pagekit operations.
#[derive(Error, Debug)]
pub enum PageKitError {
    /// Reading or writing the preference file failed
    #[error("Storage operation failed: {message}")]
    StorageError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored preferences exist but could not be decoded
    #[error("Corrupt preference file: {path}")]
    CorruptStore { path: PathBuf },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Page fixture could not be parsed or references unknown nodes
    #[error("Invalid page fixture: {message}")]
    FixtureError { message: String },

    /// Event script could not be parsed or references unknown nodes
    #[error("Invalid event script: {message}")]
    ScriptError { message: String },

    /// Timers were requested outside of a tokio runtime
    #[error("No async runtime available: {message}")]
    RuntimeUnavailable { message: String },

    /// Generic error for cases not covered by specific variants
    #[error("Operation failed: {message}")]
    Other { message: String },
}

/// Standard Result type for pagekit operations.
pub type Result<T> = std::result::Result<T, PageKitError>;

impl PageKitError {
    /// Create a StorageError from an io::Error with additional context
    pub fn storage(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::StorageError {
            message: message.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn fixture(message: impl Into<String>) -> Self {
        Self::FixtureError {
            message: message.into(),
        }
    }

    pub fn script(message: impl Into<String>) -> Self {
        Self::ScriptError {
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::RuntimeUnavailable {
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for PageKitError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::StorageError {
                message: "File not found".to_string(),
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => Self::StorageError {
                message: "Permission denied".to_string(),
                source: err,
            },
            _ => Self::StorageError {
                message: "IO operation failed".to_string(),
                source: err,
            },
        }
    }
}
