//! Candidate file pattern generation.
//!
//! Every `(item type, format)` pair yields two patterns:
//!
//! - `<item_type>.<format>` directly under the base directory. Only the
//!   `pods` item type is root-eligible here, so a root-type directory is not
//!   littered with one bare file per item type.
//! - `<subdirectory>/<item_type>.<format>`, always root-eligible.
//!
//! Patterns are emitted item-type-major, then format, then bare before nested.
//! That order is part of the merge precedence: later patterns win, and every
//! `pods` file of a directory is merged before any `fields` file in it.

use tracing::debug;

use crate::types::{DEFAULT_SUBDIRECTORY, FilePattern, POD_ITEM_TYPE};

/// Generate candidate patterns.
///
/// An empty (or separator-only) `subdirectory` falls back to
/// [`DEFAULT_SUBDIRECTORY`]; nested patterns must never alias bare ones.
pub fn generate_patterns<'a, F, T>(formats: F, item_types: T, subdirectory: &str) -> Vec<FilePattern>
where
    F: IntoIterator<Item = &'a str>,
    T: IntoIterator<Item = &'a str>,
{
    let formats: Vec<&str> = formats.into_iter().collect();
    let subdirectory = match subdirectory.trim_matches('/') {
        "" => {
            debug!(subdirectory, "empty subdirectory, using the default");
            DEFAULT_SUBDIRECTORY
        }
        trimmed => trimmed,
    };
    let mut patterns = Vec::new();

    for item_type in item_types {
        for &format in &formats {
            let file_name = format!("{item_type}.{format}");

            patterns.push(FilePattern {
                format: format.to_string(),
                relative_path: file_name.clone(),
                item_type: item_type.to_string(),
                root_eligible: item_type == POD_ITEM_TYPE,
            });

            patterns.push(FilePattern {
                format: format.to_string(),
                relative_path: format!("{subdirectory}/{file_name}"),
                item_type: item_type.to_string(),
                root_eligible: true,
            });
        }
    }

    patterns
}
