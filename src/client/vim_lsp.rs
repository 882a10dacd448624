//! vim-lsp (`lsp#internal#diagnostics#state#...`).
//!
//! vim-lsp stores the last `textDocument/publishDiagnostics` notification of
//! every server, grouped by document URI and server name. A scoped query
//! returns the per-server map of one URI; an unscoped one returns the whole
//! URI → server → notification tree.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::lsp::Diagnostic;
use crate::lsp::types::uri_to_path;

use super::{BufferContext, ClientName, DiagnosticAdapter};

#[derive(Debug, Deserialize)]
struct PublishParams {
    #[serde(default)]
    diagnostics: Vec<lsp_types::Diagnostic>,
}

/// A stored notification; `method` and `jsonrpc` are ignored.
#[derive(Debug, Deserialize)]
struct PublishNotification {
    params: PublishParams,
}

type ByServer = BTreeMap<String, PublishNotification>;

fn flatten_servers(
    by_server: ByServer,
    buf_nr: Option<u32>,
    path: &str,
) -> impl Iterator<Item = Diagnostic> + '_ {
    by_server
        .into_values()
        .flat_map(|notification| notification.params.diagnostics)
        .map(move |diagnostic| {
            Diagnostic::from_protocol(diagnostic)
                .with_buf_nr(buf_nr)
                .with_path(Some(path.to_string()))
        })
}

/// Adapter for vim-lsp.
#[derive(Debug, Clone, Copy, Default)]
pub struct VimLsp;

impl DiagnosticAdapter for VimLsp {
    fn client(&self) -> ClientName {
        ClientName::VimLsp
    }

    fn normalize(&self, raw: Value, scope: Option<&BufferContext>) -> Result<Vec<Diagnostic>> {
        if let Some(scope) = scope {
            let path = uri_to_path(scope.require_uri(self.client())?);
            let by_server: ByServer =
                serde_json::from_value::<Option<_>>(raw)?.unwrap_or_default();
            return Ok(flatten_servers(by_server, Some(scope.buf_nr), &path).collect());
        }

        let by_uri: BTreeMap<String, ByServer> =
            serde_json::from_value::<Option<_>>(raw)?.unwrap_or_default();
        let mut diagnostics = Vec::new();
        for (uri, by_server) in by_uri {
            let path = uri_to_path(&uri);
            diagnostics.extend(flatten_servers(by_server, None, &path));
        }
        Ok(diagnostics)
    }
}
