//! Display items and the builders turning records into them.

use serde::Serialize;

use crate::lsp::types::{from_lsp_position, uri_to_path};
use crate::lsp::{Diagnostic, Location};

/// Where selecting an item jumps to. Line and column are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionData {
    /// File to open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Buffer to switch to, when the file is already loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buf_nr: Option<u32>,
    /// 1-based line.
    pub line_nr: u32,
    /// 1-based column.
    pub col: u32,
}

/// A highlighted span inside an item's display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemHighlight {
    /// Highlight identifier.
    pub name: String,
    /// Highlight group to apply.
    pub hl_group: String,
    /// 1-based byte column the span starts at.
    pub col: u32,
    /// Span width in bytes.
    pub width: u32,
}

/// A display record handed to the list UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item<D> {
    /// Text used for matching and, without `display`, for showing.
    pub word: String,
    /// Text shown instead of `word`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Highlights over `display`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<ItemHighlight>,
    /// Jump target.
    pub action: ActionData,
    /// The record the item was built from.
    pub data: D,
}

impl<D> Item<D> {
    /// Replaces the data record, keeping everything else.
    pub fn map_data<E>(self, f: impl FnOnce(D) -> E) -> Item<E> {
        Item {
            word: self.word,
            display: self.display,
            highlights: self.highlights,
            action: self.action,
            data: f(self.data),
        }
    }
}

impl Item<Diagnostic> {
    /// Builds an item from a diagnostic.
    ///
    /// The word is the first line of the message.
    pub fn from_diagnostic(diagnostic: Diagnostic) -> Self {
        let word = diagnostic
            .message
            .split('\n')
            .next()
            .unwrap_or_default()
            .to_string();
        let (line_nr, col) = from_lsp_position(diagnostic.range.start);

        Self {
            word,
            display: None,
            highlights: Vec::new(),
            action: ActionData {
                path: diagnostic.path.clone(),
                buf_nr: diagnostic.buf_nr,
                line_nr,
                col,
            },
            data: diagnostic,
        }
    }

    /// Swaps the data for its protocol-conformant form.
    pub fn into_protocol(self) -> Item<lsp_types::Diagnostic> {
        self.map_data(Into::into)
    }
}

impl Item<Location> {
    /// Builds an item from a resolved location.
    ///
    /// `file:` URIs are shown as paths; other schemes are shown verbatim.
    pub fn from_location(location: Location) -> Self {
        let path = uri_to_path(&location.uri);
        let (line_nr, col) = from_lsp_position(location.range.start);

        Self {
            display: Some(format!("{path}:{line_nr}:{col}")),
            word: path.clone(),
            highlights: Vec::new(),
            action: ActionData {
                path: Some(path),
                buf_nr: None,
                line_nr,
                col,
            },
            data: location,
        }
    }
}
