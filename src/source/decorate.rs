//! Item decoration.
//!
//! Decorators add presentation (display text, highlights) to finished
//! items. They run after the items are built and before they are sorted;
//! the sources decorate every item of a batch concurrently.

use std::future::Future;

use crate::lsp::Diagnostic;

use super::item::{Item, ItemHighlight};

/// Adds presentation to a diagnostic item.
pub trait Decorator: Send + Sync {
    /// Returns the decorated item.
    fn decorate(&self, item: Item<Diagnostic>) -> impl Future<Output = Item<Diagnostic>> + Send;
}

/// Leaves items untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Undecorated;

impl Decorator for Undecorated {
    async fn decorate(&self, item: Item<Diagnostic>) -> Item<Diagnostic> {
        item
    }
}

const HIGHLIGHT_NAME: &str = "lsp-digest-severity";

/// Prefixes each item with a severity icon and highlights the icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityIcons {
    /// Icons for Error, Warning, Info and Hint, in that order.
    pub icons: [String; 4],
}

impl Default for SeverityIcons {
    fn default() -> Self {
        Self {
            icons: ["E", "W", "I", "H"].map(String::from),
        }
    }
}

impl SeverityIcons {
    /// Icon and highlight group for a severity rank (1..=4, larger clamps to Hint).
    fn for_rank(&self, rank: u8) -> (&str, &'static str) {
        match rank {
            1 => (&self.icons[0], "DiagnosticSignError"),
            2 => (&self.icons[1], "DiagnosticSignWarn"),
            3 => (&self.icons[2], "DiagnosticSignInfo"),
            _ => (&self.icons[3], "DiagnosticSignHint"),
        }
    }
}

impl Decorator for SeverityIcons {
    async fn decorate(&self, mut item: Item<Diagnostic>) -> Item<Diagnostic> {
        let (icon, hl_group) = self.for_rank(item.data.rank());
        let text = item.display.as_deref().unwrap_or(&item.word);
        let display = format!("{icon} {text}");

        item.highlights.push(ItemHighlight {
            name: HIGHLIGHT_NAME.to_string(),
            hl_group: hl_group.to_string(),
            col: 1,
            width: u32::try_from(icon.len()).unwrap_or(u32::MAX),
        });
        item.display = Some(display);
        item
    }
}
