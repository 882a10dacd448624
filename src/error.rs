//! Error types for lsp-digest.
//!
//! Every failure a source can hit is a variant of [`Error`]. The sources
//! never hand these to their caller: they are caught at the orchestrator
//! boundary, passed to a [`Reporter`](crate::host::Reporter) and turned into
//! an empty item batch.

use thiserror::Error;

use crate::client::ClientName;
use crate::host::HostKind;

/// A unified error type for the entire crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested client is not available on the running host.
    #[error("{client} is not supported on {host}")]
    UnsupportedClient {
        /// The requested client.
        client: ClientName,
        /// The host the request ran on.
        host: HostKind,
    },

    /// The requested location method is not one of the supported ones.
    #[error("unsupported method: {0:?}")]
    UnsupportedMethod(String),

    /// A client name that matches none of the known backends.
    #[error("unknown client: {0:?}")]
    UnknownClient(String),

    /// The host bridge failed or returned data in an unexpected shape.
    #[error("{subsystem}: {message}")]
    BackendQuery {
        /// Name of the subsystem the query was made for.
        subsystem: String,
        /// Description of the failure.
        message: String,
    },

    /// Raw backend data could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a [`Error::BackendQuery`] for the given subsystem.
    pub fn backend(subsystem: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BackendQuery {
            subsystem: subsystem.into(),
            message: message.into(),
        }
    }
}

/// A specialized Result type for lsp-digest operations.
pub type Result<T> = std::result::Result<T, Error>;
