//! Location / LocationLink resolution.
//!
//! Navigation requests answer with either point locations or location
//! links, as a single value or as an array. [`resolve_locations`] flattens
//! every one of those shapes into plain [`Location`]s and drops the entries
//! whose URI is known to be unusable.

use std::sync::LazyLock;

use lsp_types::Range;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Result;

/// `deno:` virtual documents whose fragment starts with `^`, `~`, `<` or `=`
/// cannot be opened by the host editor.
static BLOCKED_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^deno:.*%23(?i:%5E|%7E|%3C|%3D)").expect("blocked uri pattern is valid")
});

/// A point location. The URI is kept verbatim, whatever its scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Document URI.
    pub uri: String,
    /// Range inside the document.
    pub range: Range,
}

/// A location link as returned by servers with `linkSupport`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationLink {
    /// Span of the origin of this link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_selection_range: Option<Range>,
    /// Target document URI.
    pub target_uri: String,
    /// Full range of the target, e.g. the whole function body. Some servers
    /// omit it or send `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_range: Option<Range>,
    /// The part of `target_range` to reveal, e.g. the function name.
    pub target_selection_range: Range,
}

/// One entry of a navigation response, in either wire shape.
///
/// The variants are told apart by the presence of `uri` vs `targetUri`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawLocation {
    /// `{uri, range}`
    Location(Location),
    /// `{targetUri, targetRange, targetSelectionRange}`
    Link(LocationLink),
}

impl RawLocation {
    /// Collapses either shape into a point location.
    pub fn resolve(self) -> Location {
        match self {
            Self::Location(location) => location,
            Self::Link(link) => Location {
                uri: link.target_uri,
                range: link.target_selection_range,
            },
        }
    }
}

/// A navigation result: one entry, many entries, or nothing. Entries are
/// kept raw so that one unrecognized entry does not sink its neighbours.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LocationResult {
    Many(Vec<Value>),
    One(Map<String, Value>),
}

/// Returns true for URIs that are dropped before reaching the item builder.
pub fn is_blocked_uri(uri: &str) -> bool {
    BLOCKED_URI.is_match(uri)
}

/// Resolves a raw navigation result into point locations.
///
/// Accepts `null`, a single `Location`/`LocationLink`, or an array mixing
/// both. Entries matching neither shape and blocked URIs are skipped.
///
/// # Errors
///
/// Returns an error when the result is not `null`, an object or an array.
pub fn resolve_locations(result: Value) -> Result<Vec<Location>> {
    let parsed: Option<LocationResult> = serde_json::from_value(result)?;
    let entries = match parsed {
        None => Vec::new(),
        Some(LocationResult::One(one)) => vec![Value::Object(one)],
        Some(LocationResult::Many(many)) => many,
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<RawLocation>(entry) {
            Ok(raw) => Some(raw.resolve()),
            Err(err) => {
                debug!(error = %err, "skipping unrecognized location entry");
                None
            }
        })
        .filter(|location| {
            let blocked = is_blocked_uri(&location.uri);
            if blocked {
                debug!(uri = %location.uri, "dropping blocked location");
            }
            !blocked
        })
        .collect())
}
