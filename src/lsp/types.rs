//! Position and URI conversions.

use lsp_types::{Position, Url};

/// Converts LSP 0-indexed position to user-facing 1-indexed position.
///
/// # Returns
///
/// Tuple of (line, column) both 1-indexed
pub fn from_lsp_position(position: Position) -> (u32, u32) {
    (
        position.line.saturating_add(1),
        position.character.saturating_add(1),
    )
}

/// Decodes a `file:` URI into a file-system path.
///
/// URIs of any other scheme (`deno:`, `jdt:`, ...) and strings that fail to
/// parse are returned unchanged, so a caller always gets something it can
/// display.
pub fn uri_to_path(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map_or_else(|()| uri.to_string(), |p| p.display().to_string()),
        _ => uri.to_string(),
    }
}
