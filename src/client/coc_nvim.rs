//! coc.nvim (`CocAction('diagnosticList')`).
//!
//! coc.nvim always returns the diagnostics of every file it knows. A scoped
//! query keeps only the entries whose `location.uri` is the buffer's URI.

use lsp_types::{DiagnosticSeverity, NumberOrString, Range};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::lsp::Diagnostic;

use super::{BufferContext, ClientName, DiagnosticAdapter};

#[derive(Debug, Deserialize)]
struct CocLocation {
    uri: String,
    range: Range,
}

/// A `diagnosticList` entry. `lnum`/`col` and friends are 1-based
/// duplicates of `location.range` and are ignored.
#[derive(Debug, Deserialize)]
struct CocDiagnostic {
    file: String,
    location: CocLocation,
    severity: Option<String>,
    message: String,
    source: Option<String>,
    code: Option<NumberOrString>,
}

/// Maps a coc.nvim severity name to its protocol ordinal.
pub fn severity_from_name(name: &str) -> Option<DiagnosticSeverity> {
    match name {
        "Error" => Some(DiagnosticSeverity::ERROR),
        "Warning" => Some(DiagnosticSeverity::WARNING),
        "Info" | "Information" => Some(DiagnosticSeverity::INFORMATION),
        "Hint" => Some(DiagnosticSeverity::HINT),
        _ => None,
    }
}

impl CocDiagnostic {
    fn into_diagnostic(self, buf_nr: Option<u32>) -> Diagnostic {
        Diagnostic {
            range: self.location.range,
            severity: self.severity.as_deref().and_then(severity_from_name),
            code: self.code,
            code_description: None,
            source: self.source,
            message: self.message,
            tags: None,
            related_information: None,
            data: None,
            buf_nr,
            path: Some(self.file),
        }
    }
}

/// Adapter for coc.nvim.
#[derive(Debug, Clone, Copy, Default)]
pub struct CocNvim;

impl DiagnosticAdapter for CocNvim {
    fn client(&self) -> ClientName {
        ClientName::CocNvim
    }

    fn normalize(&self, raw: Value, scope: Option<&BufferContext>) -> Result<Vec<Diagnostic>> {
        let records: Vec<CocDiagnostic> =
            serde_json::from_value::<Option<_>>(raw)?.unwrap_or_default();

        let Some(scope) = scope else {
            return Ok(records
                .into_iter()
                .map(|record| record.into_diagnostic(None))
                .collect());
        };

        let uri = scope.require_uri(self.client())?;
        Ok(records
            .into_iter()
            .filter(|record| record.location.uri == uri)
            .map(|record| record.into_diagnostic(Some(scope.buf_nr)))
            .collect())
    }
}
