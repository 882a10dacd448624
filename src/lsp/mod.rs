//! Canonical LSP-shaped records.
//!
//! Every backend speaks its own dialect of the Language Server Protocol data
//! model. This module holds the single shape everything is normalized into.
//!
//! # Architecture
//!
//! The LSP module is organized into:
//! - `diagnostic`: the canonical [`Diagnostic`] and its protocol sanitizer
//! - `location`: [`Location`]/[`LocationLink`] resolution and URI filtering
//! - `types`: position and URI conversions shared by the item builders

pub mod diagnostic;
pub mod location;
pub mod types;

pub use diagnostic::{Diagnostic, severity_rank};
pub use location::{Location, LocationLink, RawLocation, is_blocked_uri, resolve_locations};

// Protocol types used directly by the canonical records.
pub use lsp_types::{
    CodeDescription, DiagnosticRelatedInformation, DiagnosticSeverity, DiagnosticTag,
    NumberOrString, Position, Range,
};
