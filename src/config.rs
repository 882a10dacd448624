//! Source parameters.
//!
//! These are the options a caller passes to a source: which client to read
//! diagnostics from, which buffers to look at, and which navigation method
//! to run. They are read from JSON so an editor plugin can hand them over
//! verbatim.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::ClientName;
use crate::error::{Error, Result};

/// Buffer number that stands for "the buffer the caller is in".
pub const CURRENT_BUFFER: u32 = 0;

/// Which buffers a diagnostics request covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum BufferScope {
    /// A single buffer.
    One(u32),
    /// Several buffers, queried in this order.
    Many(Vec<u32>),
}

impl BufferScope {
    /// Returns the buffer list with [`CURRENT_BUFFER`] replaced by `current`.
    pub fn resolve(&self, current: u32) -> Vec<u32> {
        let swap = |buf_nr: u32| {
            if buf_nr == CURRENT_BUFFER {
                current
            } else {
                buf_nr
            }
        };
        match self {
            Self::One(buf_nr) => vec![swap(*buf_nr)],
            Self::Many(buf_nrs) => buf_nrs.iter().copied().map(swap).collect(),
        }
    }
}

/// Navigation methods the locations source can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Method {
    /// `textDocument/declaration`
    #[serde(rename = "textDocument/declaration")]
    Declaration,
    /// `textDocument/definition`
    #[serde(rename = "textDocument/definition")]
    Definition,
    /// `textDocument/typeDefinition`
    #[serde(rename = "textDocument/typeDefinition")]
    TypeDefinition,
    /// `textDocument/implementation`
    #[serde(rename = "textDocument/implementation")]
    Implementation,
    /// `textDocument/references`
    #[serde(rename = "textDocument/references")]
    References,
}

impl Method {
    /// Every supported method.
    pub const ALL: [Self; 5] = [
        Self::Declaration,
        Self::Definition,
        Self::TypeDefinition,
        Self::Implementation,
        Self::References,
    ];

    /// The LSP method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Declaration => "textDocument/declaration",
            Self::Definition => "textDocument/definition",
            Self::TypeDefinition => "textDocument/typeDefinition",
            Self::Implementation => "textDocument/implementation",
            Self::References => "textDocument/references",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    /// Accepts both `textDocument/definition` and the bare `definition`.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.strip_prefix("textDocument/").unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().ends_with(&format!("/{name}")))
            .ok_or_else(|| Error::UnsupportedMethod(s.to_string()))
    }
}

/// Parameters recognized by the sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SourceParams {
    /// Client to read diagnostics from.
    #[serde(default)]
    #[schemars(description = "Client to read diagnostics from: nvim-lsp, coc-nvim or vim-lsp")]
    pub client_name: ClientName,
    /// Buffers to collect diagnostics for; `None` means every buffer.
    #[serde(default)]
    #[schemars(
        description = "null for every buffer, a buffer number, or a list of them (0 = current)"
    )]
    pub buffer: Option<BufferScope>,
    /// Navigation method for the locations source.
    #[serde(default)]
    #[schemars(description = "LSP method, e.g. textDocument/definition")]
    pub method: String,
    /// Include the declaration itself in reference results.
    #[serde(default = "default_include_declaration")]
    #[schemars(description = "Include the declaration in references (default: true)")]
    pub include_declaration: bool,
}

fn default_include_declaration() -> bool {
    true
}

impl Default for SourceParams {
    fn default() -> Self {
        Self {
            client_name: ClientName::default(),
            buffer: None,
            method: String::new(),
            include_declaration: default_include_declaration(),
        }
    }
}

impl SourceParams {
    /// Loads parameters from a JSON file.
    /// ## Errors
    /// Returns an error if the file cannot be read or holds invalid params.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid params in {}: {e}", path.display())))
    }

    /// JSON schema describing the parameters.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(SourceParams)
    }
}
