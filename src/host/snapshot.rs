//! A host bridge backed by a captured JSON snapshot.
//!
//! The snapshot stores what each backend answered, keyed the way the host
//! would ask for it:
//!
//! ```json
//! {
//!   "host": "nvim",
//!   "buffers": { "1": "file:///src/main.rs" },
//!   "backends": {
//!     "nvim-lsp": { "all": [], "1": [] },
//!     "vim-lsp": { "all": {}, "1": {} }
//!   },
//!   "locations": {
//!     "textDocument/definition": [{ "sourceId": "1", "result": null }]
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::client::ClientName;
use crate::error::{Error, Result};

use super::{HostBridge, HostKind, LocationRequest, LocationResponse};

const ALL_BUFFERS: &str = "all";

/// [`HostBridge`] answering from a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SnapshotHost {
    /// Editor the snapshot was captured in.
    #[serde(default)]
    pub host: HostKind,
    /// Buffer number to file URI.
    #[serde(default)]
    pub buffers: BTreeMap<u32, String>,
    /// Raw backend answers, keyed by client then by `"all"` or buffer number.
    #[serde(default)]
    pub backends: BTreeMap<ClientName, BTreeMap<String, Value>>,
    /// Raw navigation answers, keyed by method name.
    #[serde(default)]
    pub locations: BTreeMap<String, Vec<LocationResponse>>,
}

impl SnapshotHost {
    /// Reads a snapshot from a JSON file.
    /// ## Errors
    /// Returns an error if the file cannot be read or is not a snapshot.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a snapshot from a JSON string.
    /// ## Errors
    /// Returns an error if the JSON is not a snapshot.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

impl HostBridge for SnapshotHost {
    fn host_kind(&self) -> HostKind {
        self.host
    }

    async fn query_backend(&self, client: ClientName, buf_nr: Option<u32>) -> Result<Value> {
        // coc.nvim only ever hands out its full diagnostic list.
        let key = match (client, buf_nr) {
            (ClientName::CocNvim, _) | (_, None) => ALL_BUFFERS.to_string(),
            (_, Some(buf_nr)) => buf_nr.to_string(),
        };
        debug!(%client, key, "snapshot backend query");

        Ok(self
            .backends
            .get(&client)
            .and_then(|by_key| by_key.get(&key))
            .cloned()
            .unwrap_or(Value::Null))
    }

    async fn resolve_file_uri(&self, buf_nr: u32) -> Result<String> {
        self.buffers
            .get(&buf_nr)
            .cloned()
            .ok_or_else(|| Error::backend("buffers", format!("buffer {buf_nr} has no file")))
    }

    async fn query_locations(
        &self,
        request: &LocationRequest,
    ) -> Result<Option<Vec<LocationResponse>>> {
        Ok(self.locations.get(request.method.as_str()).cloned())
    }
}
