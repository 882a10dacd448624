//! lsp-digest
//!
//! Normalizes the diagnostics and navigation results of Vim/Neovim LSP
//! clients into one canonical shape, then orders and packages them as list
//! items that jump to their target.
//!
//! # Overview
//!
//! This library provides:
//! - Adapters for three LSP clients (Neovim built-in, coc.nvim, vim-lsp)
//! - A canonical `Diagnostic` / `Location` model with a protocol sanitizer
//! - A diagnostic sorter that puts the focused buffer first
//! - Sources that stream ready-to-display item batches
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐  raw JSON   ┌──────────────────┐
//! │   HostBridge    │────────────►│ DiagnosticAdapter│ nvim-lsp / coc-nvim / vim-lsp
//! │ (editor bridge) │             └────────┬─────────┘
//! └────────┬────────┘                      │ Diagnostic
//!          │ Location | LocationLink ┌─────▼──────┐
//!          └────────────────────────►│    Item    │ word + action + data
//!                                    │  builder   │
//!                                    └─────┬──────┘
//!                                          │ decorate, sort
//!                                    ┌─────▼──────┐
//!                                    │   Source   │──► Stream<Vec<Item>>
//!                                    └────────────┘
//! ```
//!
//! # Modules
//!
//! - [`error`] - Error types for the entire crate
//! - [`config`] - Source parameters
//! - [`client`] - Backend adapters
//! - [`host`] - Host bridge and reporter capabilities
//! - [`lsp`] - Canonical records and location resolution
//! - [`source`] - Items, sorting and the two sources
//!
//! # Example
//!
//! ```ignore
//! use futures::StreamExt;
//! use lsp_digest::config::SourceParams;
//! use lsp_digest::host::SnapshotHost;
//! use lsp_digest::source::{DiagnosticSource, SourceContext};
//!
//! let host = SnapshotHost::from_file("snapshot.json".as_ref())?;
//! let source = DiagnosticSource::new(host);
//! let context = SourceContext { buf_nr: 1, win_id: 1000 };
//! let batches: Vec<_> = source.gather(SourceParams::default(), context).collect().await;
//! ```

// Enforce documentation and other quality attributes
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are too strict
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod client;
pub mod config;
pub mod error;
pub mod host;
pub mod lsp;
pub mod source;

// Re-export commonly used types at the crate root
pub use error::{Error, Result};
