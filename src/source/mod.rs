//! Item sources.
//!
//! A source turns one request into a stream of item batches:
//!
//! ```text
//! DiagnosticSource: scope ─► adapter per buffer ─► items ─► decorate ─► sort ─► batch
//! LocationSource:   method ─► query clients ─► resolve/filter ─► items ─► batch per client
//! ```
//!
//! Sources never fail. Errors go to the injected
//! [`Reporter`](crate::host::Reporter) and the stream yields an empty batch.

pub mod decorate;
pub mod diagnostic;
pub mod item;
pub mod location;
pub mod sort;

pub use decorate::{Decorator, SeverityIcons, Undecorated};
pub use diagnostic::DiagnosticSource;
pub use item::{ActionData, Item, ItemHighlight};
pub use location::LocationSource;

/// Where the request was made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceContext {
    /// Buffer the caller is in. Replaces the "current buffer" sentinel and
    /// is the focused buffer when sorting.
    pub buf_nr: u32,
    /// Window the caller is in.
    pub win_id: u32,
}
