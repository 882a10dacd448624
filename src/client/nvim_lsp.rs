//! Neovim built-in client (`vim.diagnostic.get()`).

use lsp_types::{
    CodeDescription, DiagnosticRelatedInformation, DiagnosticSeverity, DiagnosticTag,
    NumberOrString, Position, Range,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::lsp::Diagnostic;

use super::{BufferContext, ClientName, DiagnosticAdapter};

/// A `vim.diagnostic` record. Positions are 0-based.
#[derive(Debug, Deserialize)]
struct NvimDiagnostic {
    bufnr: Option<u32>,
    lnum: u32,
    end_lnum: Option<u32>,
    col: u32,
    end_col: Option<u32>,
    severity: Option<DiagnosticSeverity>,
    message: String,
    source: Option<String>,
    code: Option<NumberOrString>,
    user_data: Option<Value>,
}

/// Protocol fields Neovim keeps only in `user_data.lsp`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LspExtras {
    code_description: Option<CodeDescription>,
    tags: Option<Vec<DiagnosticTag>>,
    related_information: Option<Vec<DiagnosticRelatedInformation>>,
    data: Option<Value>,
}

impl NvimDiagnostic {
    fn extras(&mut self) -> LspExtras {
        self.user_data
            .take()
            .and_then(|mut user_data| user_data.get_mut("lsp").map(Value::take))
            .and_then(|lsp| serde_json::from_value(lsp).ok())
            .unwrap_or_default()
    }

    fn into_diagnostic(mut self, scope: Option<&BufferContext>) -> Diagnostic {
        let extras = self.extras();
        let range = Range::new(
            Position::new(self.lnum, self.col),
            Position::new(
                self.end_lnum.unwrap_or(self.lnum),
                self.end_col.unwrap_or(self.col),
            ),
        );

        Diagnostic {
            range,
            severity: self.severity,
            code: self.code,
            code_description: extras.code_description,
            source: self.source,
            message: self.message,
            tags: extras.tags,
            related_information: extras.related_information,
            data: extras.data,
            buf_nr: self.bufnr.or(scope.map(|s| s.buf_nr)),
            path: None,
        }
    }
}

/// Adapter for Neovim's built-in client.
#[derive(Debug, Clone, Copy, Default)]
pub struct NvimLsp;

impl DiagnosticAdapter for NvimLsp {
    fn client(&self) -> ClientName {
        ClientName::NvimLsp
    }

    fn needs_uri(&self) -> bool {
        false
    }

    fn normalize(&self, raw: Value, scope: Option<&BufferContext>) -> Result<Vec<Diagnostic>> {
        let records: Option<Vec<NvimDiagnostic>> = serde_json::from_value(raw)?;
        Ok(records
            .unwrap_or_default()
            .into_iter()
            .map(|record| record.into_diagnostic(scope))
            .collect())
    }
}
