//! Format dispatch: decode raw file content into a top-level mapping.
//!
//! `json` and `yml` (alias `yaml`) are decoded by built-in parsers. Any other
//! format is offered to the registered fallback parsers in registration order;
//! the first to return a value wins. Whatever comes out must be a mapping, or
//! the file is rejected.

use std::path::Path;

use serde_json::Value;

use crate::error::PodfigError;
use crate::types::Record;

/// Fallback parser for formats without a built-in decoder.
///
/// Receives `(format, content)` and returns `None` to decline.
pub type FormatParser = Box<dyn Fn(&str, &str) -> Option<Value> + Send + Sync>;

/// Decode `content` as `format`. `path` is used for error context only.
pub fn parse(
    format: &str,
    content: &str,
    path: &Path,
    fallbacks: &[FormatParser],
) -> Result<Record, PodfigError> {
    let parse_error = |reason: String| PodfigError::Parse {
        path: path.to_path_buf(),
        format: format.to_string(),
        reason,
    };

    let value = match format {
        "json" => serde_json::from_str::<Value>(content).map_err(|e| parse_error(e.to_string()))?,
        "yml" | "yaml" => {
            serde_yaml::from_str::<Value>(content).map_err(|e| parse_error(e.to_string()))?
        }
        other => fallbacks
            .iter()
            .find_map(|parser| parser(other, content))
            .ok_or_else(|| PodfigError::NoParser {
                path: path.to_path_buf(),
                format: other.to_string(),
            })?,
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(PodfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Fallback parser for `toml` files, ready to hand to
/// [`PodfigBuilder::format_parser`](crate::PodfigBuilder::format_parser).
///
/// Declines any other format, and declines TOML that fails to parse.
pub fn parse_toml(format: &str, content: &str) -> Option<Value> {
    if format != "toml" {
        return None;
    }
    let table: toml::Table = toml::from_str(content).ok()?;
    serde_json::to_value(table).ok()
}
