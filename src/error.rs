//! Error types for the tagging pipeline and its storage collaborators.
//!
//! Extraction and normalization never fail, so only infrastructure problems
//! (storage and the model endpoint) have error types here.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing the workspace's JSON documents and files.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file or directory could not be read or written.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing JSON document exists but does not parse.
    #[error("malformed JSON in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be serialized for writing.
    #[error("serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Tag names must be non-empty.
    #[error("tag name cannot be empty")]
    EmptyTagName,

    /// Document names must be plain file names.
    #[error("invalid document name: {0:?}")]
    InvalidDocumentName(String),

    /// The named document or output does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl StorageError {
    /// Wraps an `std::io::Error` with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors that can occur when calling the chat-completion endpoint.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("HTTP error: status {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body was not the expected JSON shape
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response carried no completion choices
    #[error("model response contained no choices")]
    EmptyChoices,

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ModelError {
    /// Classifies a transport error as a timeout or a generic network failure.
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

/// Error surfaced by a batch run. The batch stops at the first one.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("model call failed for {document}: {source}")]
    Model {
        document: String,
        #[source]
        source: ModelError,
    },
}
