//! Backend adapters.
//!
//! Each supported LSP client keeps diagnostics in its own shape. An adapter
//! turns one client's raw state into canonical [`Diagnostic`]s; the rest of
//! the crate never looks at a raw record.
//!
//! | Client     | Raw shape                                              |
//! |------------|--------------------------------------------------------|
//! | `nvim-lsp` | `vim.diagnostic` records, 0-based `lnum`/`col`         |
//! | `coc-nvim` | `diagnosticList` entries with a `location` and names   |
//! | `vim-lsp`  | `publishDiagnostics` notifications grouped by URI/server |
//!
//! Adding a client means adding a [`ClientName`] variant and one
//! [`DiagnosticAdapter`] implementation.

pub mod coc_nvim;
pub mod nvim_lsp;
pub mod vim_lsp;

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::host::HostKind;
use crate::lsp::Diagnostic;

pub use coc_nvim::CocNvim;
pub use nvim_lsp::NvimLsp;
pub use vim_lsp::VimLsp;

/// Supported LSP clients.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum ClientName {
    /// Neovim's built-in client.
    #[default]
    NvimLsp,
    /// coc.nvim.
    CocNvim,
    /// vim-lsp.
    VimLsp,
}

impl ClientName {
    /// Every supported client.
    pub const ALL: [Self; 3] = [Self::NvimLsp, Self::CocNvim, Self::VimLsp];

    /// The name used in parameters and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NvimLsp => "nvim-lsp",
            Self::CocNvim => "coc-nvim",
            Self::VimLsp => "vim-lsp",
        }
    }

    /// The adapter decoding this client's diagnostics.
    pub fn adapter(self) -> &'static dyn DiagnosticAdapter {
        match self {
            Self::NvimLsp => &NvimLsp,
            Self::CocNvim => &CocNvim,
            Self::VimLsp => &VimLsp,
        }
    }

    /// Fails with [`Error::UnsupportedClient`] when `host` cannot run this client.
    /// ## Errors
    pub fn ensure_supported(self, host: HostKind) -> Result<()> {
        match (self, host) {
            (Self::NvimLsp, HostKind::Vim) => Err(Error::UnsupportedClient { client: self, host }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|client| client.as_str() == s)
            .ok_or_else(|| Error::UnknownClient(s.to_string()))
    }
}

/// The buffer a scoped query was made for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferContext {
    /// Resolved buffer number, never the "current buffer" sentinel.
    pub buf_nr: u32,
    /// `file:` URI of the buffer, when the adapter asked for it.
    pub uri: Option<String>,
}

impl BufferContext {
    /// The buffer URI, or a backend error naming `client`.
    /// ## Errors
    pub fn require_uri(&self, client: ClientName) -> Result<&str> {
        self.uri.as_deref().ok_or_else(|| {
            Error::backend(client.as_str(), format!("buffer {} has no uri", self.buf_nr))
        })
    }
}

/// Decodes one client's raw diagnostic state.
///
/// Implementations are pure: all host interaction happens before
/// [`normalize`](DiagnosticAdapter::normalize) is called.
pub trait DiagnosticAdapter: Send + Sync {
    /// The client this adapter decodes.
    fn client(&self) -> ClientName;

    /// Whether a scoped query needs the buffer's URI in its [`BufferContext`].
    fn needs_uri(&self) -> bool {
        true
    }

    /// Converts a raw backend answer to canonical diagnostics.
    ///
    /// `scope` is `None` when the answer covers every buffer.
    ///
    /// # Errors
    ///
    /// Returns an error when `raw` does not have the client's shape.
    fn normalize(&self, raw: Value, scope: Option<&BufferContext>) -> Result<Vec<Diagnostic>>;
}
