//! Error handling for chunklog
//!
//! This module provides error types and result aliases for channel and
//! dispatcher operations.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring channels or writing log events
#[derive(Error, Debug)]
pub enum Error {
    /// Errors related to I/O operations (directory creation, append, read, write)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization of JSON documents
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Errors related to configuration, raised when a channel is constructed
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON log document exists but does not have the expected shape
    #[error("Malformed log document {path:?}: {message}")]
    Document {
        path: PathBuf,
        message: String,
    },

    /// One or more channels failed during a dispatch
    #[error("{} channel(s) failed: {}", .0.len(), FailureList(.0))]
    Dispatch(Vec<ChannelFailure>),
}

/// Result type for chunklog operations
pub type Result<T> = std::result::Result<T, Error>;

/// A failed channel write collected during a dispatch
#[derive(Debug)]
pub struct ChannelFailure {
    /// Name of the channel that failed
    pub channel: String,
    /// Error reported by the channel
    pub error: Error,
}

impl fmt::Display for ChannelFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.channel, self.error)
    }
}

struct FailureList<'a>(&'a [ChannelFailure]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new malformed document error
    pub fn document(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Document {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this is an I/O error
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Channel failures carried by a dispatch error, empty for every other kind
    pub fn failures(&self) -> &[ChannelFailure] {
        match self {
            Self::Dispatch(failures) => failures,
            _ => &[],
        }
    }

    /// Get a user-friendly suggestion for resolving the error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io(err) if err.kind() == io::ErrorKind::NotFound => Some(
                "The log directory or file does not exist and could not be created".to_string(),
            ),
            Self::Io(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                Some("Verify permissions on the log storage directory".to_string())
            }
            Self::Config(_) => {
                Some("Check the channel configuration passed at construction".to_string())
            }
            Self::Document { .. } => Some(
                "Move the malformed JSON log aside; a new document is created on the next write"
                    .to_string(),
            ),
            Self::Dispatch(failures) => failures.first().and_then(|f| f.error.suggestion()),
            _ => None,
        }
    }
}
