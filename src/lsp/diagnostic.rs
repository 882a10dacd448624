//! The canonical diagnostic record and its protocol sanitizer.

use lsp_types::{
    CodeDescription, DiagnosticRelatedInformation, DiagnosticSeverity, DiagnosticTag,
    NumberOrString, Range,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A diagnostic in canonical form.
///
/// This is the protocol `Diagnostic` plus the two fields the backends attach
/// to say which file it belongs to: `bufNr` and `path`. Unknown fields are
/// ignored on deserialization, which is where most backend pollution is
/// shed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// The range at which the message applies.
    pub range: Range,
    /// Severity ordinal (1 = Error .. 4 = Hint).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<DiagnosticSeverity>,
    /// The diagnostic's code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<NumberOrString>,
    /// Link to documentation for `code`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_description: Option<CodeDescription>,
    /// Name of the tool that produced the diagnostic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// The message. May span several lines.
    pub message: String,
    /// Additional metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<DiagnosticTag>>,
    /// Related locations, e.g. the other side of a conflict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_information: Option<Vec<DiagnosticRelatedInformation>>,
    /// Opaque data passed through from the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Editor buffer the diagnostic belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buf_nr: Option<u32>,
    /// Absolute path of the file the diagnostic belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic with only the required fields set.
    pub fn new(range: Range, message: impl Into<String>) -> Self {
        Self {
            range,
            severity: None,
            code: None,
            code_description: None,
            source: None,
            message: message.into(),
            tags: None,
            related_information: None,
            data: None,
            buf_nr: None,
            path: None,
        }
    }

    /// Wraps a protocol diagnostic with no buffer linkage.
    pub fn from_protocol(diagnostic: lsp_types::Diagnostic) -> Self {
        Self {
            range: diagnostic.range,
            severity: diagnostic.severity,
            code: diagnostic.code,
            code_description: diagnostic.code_description,
            source: diagnostic.source,
            message: diagnostic.message,
            tags: diagnostic.tags,
            related_information: diagnostic.related_information,
            data: diagnostic.data,
            buf_nr: None,
            path: None,
        }
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: DiagnosticSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Sets the buffer number.
    #[must_use]
    pub fn with_buf_nr(mut self, buf_nr: Option<u32>) -> Self {
        self.buf_nr = buf_nr;
        self
    }

    /// Sets the file path.
    #[must_use]
    pub fn with_path(mut self, path: Option<String>) -> Self {
        self.path = path;
        self
    }

    /// Returns the protocol-conformant view of this diagnostic.
    ///
    /// `bufNr` and `path` are dropped; everything else is kept as is.
    pub fn sanitize(&self) -> lsp_types::Diagnostic {
        self.clone().into()
    }

    /// Severity rank used for ordering, see [`severity_rank`].
    pub fn rank(&self) -> u8 {
        severity_rank(self.severity)
    }
}

impl From<Diagnostic> for lsp_types::Diagnostic {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            range: diagnostic.range,
            severity: diagnostic.severity,
            code: diagnostic.code,
            code_description: diagnostic.code_description,
            source: diagnostic.source,
            message: diagnostic.message,
            related_information: diagnostic.related_information,
            tags: diagnostic.tags,
            data: diagnostic.data,
        }
    }
}

/// Maps a severity to its ordinal, treating a missing severity as Error.
///
/// Values outside the protocol's 1..=4 sort after Hint.
pub fn severity_rank(severity: Option<DiagnosticSeverity>) -> u8 {
    match severity {
        None | Some(DiagnosticSeverity::ERROR) => 1,
        Some(DiagnosticSeverity::WARNING) => 2,
        Some(DiagnosticSeverity::INFORMATION) => 3,
        Some(DiagnosticSeverity::HINT) => 4,
        Some(_) => 5,
    }
}
