//! Capabilities the sources consume from the host editor.
//!
//! The sources never talk to an editor or a language server themselves.
//! Everything they need from the outside world goes through two injected
//! capabilities:
//!
//! - [`HostBridge`] fetches raw backend state and resolves buffers to URIs
//! - [`Reporter`] receives the failures a source swallowed
//!
//! ```text
//! ┌─────────────┐  query_backend / query_locations  ┌──────────────┐
//! │   Source    │──────────────────────────────────►│  HostBridge  │
//! │ orchestrator│◄──────────────────────────────────│ (editor RPC) │
//! └──────┬──────┘        raw JSON values            └──────────────┘
//!        │ error / warn
//! ┌──────▼──────┐
//! │  Reporter   │
//! └─────────────┘
//! ```

pub mod snapshot;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use crate::client::ClientName;
use crate::config::Method;
use crate::error::{Error, Result};

pub use snapshot::SnapshotHost;

/// The editor the sources run inside.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostKind {
    /// Neovim.
    #[default]
    Nvim,
    /// Vim.
    Vim,
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Nvim => "nvim",
            Self::Vim => "vim",
        })
    }
}

/// A navigation request forwarded to every attached client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequest {
    /// The method to run.
    pub method: Method,
    /// Buffer holding the cursor.
    pub buf_nr: u32,
    /// Window holding the cursor.
    pub win_id: u32,
    /// Only meaningful for `textDocument/references`.
    pub include_declaration: bool,
}

/// One client's raw answer to a [`LocationRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    /// Identifier of the client that answered.
    pub source_id: String,
    /// The raw `result` member of the response.
    #[serde(default)]
    pub result: Value,
}

/// Bridge to the host editor.
///
/// Every method may fail; the sources log the failure and produce no items.
/// None of them is expected to hang, since the sources apply no timeout.
pub trait HostBridge: Send + Sync {
    /// Which editor this is.
    fn host_kind(&self) -> HostKind;

    /// Fetches the raw diagnostic state of one client.
    ///
    /// `buf_nr` is `None` for "every buffer". The shape of the returned
    /// value is whatever that client natively produces.
    fn query_backend(
        &self,
        client: ClientName,
        buf_nr: Option<u32>,
    ) -> impl Future<Output = Result<Value>> + Send;

    /// Resolves a buffer to the `file:` URI of the file it shows.
    fn resolve_file_uri(&self, buf_nr: u32) -> impl Future<Output = Result<String>> + Send;

    /// Runs a navigation request against every attached client.
    ///
    /// Returns `None` when no client could serve it.
    fn query_locations(
        &self,
        request: &LocationRequest,
    ) -> impl Future<Output = Result<Option<Vec<LocationResponse>>>> + Send;
}

/// Side channel for failures the sources do not propagate.
pub trait Reporter: Send + Sync {
    /// Reports a failure that emptied a result.
    fn error(&self, subsystem: &str, error: &Error);

    /// Reports a non-fatal problem.
    fn warn(&self, subsystem: &str, message: &str);
}

/// [`Reporter`] that forwards everything to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn error(&self, subsystem: &str, err: &Error) {
        error!(subsystem, error = %err, "source failed");
    }

    fn warn(&self, subsystem: &str, message: &str) {
        warn!(subsystem, "{message}");
    }
}
