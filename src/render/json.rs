//! JSON rendering for outline results.

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::DocumentResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with two-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline result to JSON. Non-ASCII text is written as is.
pub fn to_json(result: &DocumentResult, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(result),
        JsonFormat::Compact => serde_json::to_string(result),
    };

    json.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Render an outline result and write it to `path`.
pub fn write_json(result: &DocumentResult, path: impl AsRef<Path>, format: JsonFormat) -> Result<()> {
    let json = to_json(result, format)?;
    std::fs::write(path, json)?;
    Ok(())
}
