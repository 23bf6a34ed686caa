//! Error types for keystone-core

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for keystone-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in keystone-core
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Configuration is missing or malformed
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error tied to a file on disk
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// File that was being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// TOML deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::de::Error),
}

impl Error {
    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates an I/O error that remembers which path failed.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
