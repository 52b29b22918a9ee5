//! Shared vocabulary: records, item kinds, and candidate file patterns.

use serde_json::{Map, Value};

/// An untyped key/value record as decoded from a config file.
pub type Record = Map<String, Value>;

/// The item type that may live directly under a root-type directory, and
/// whose files may declare sections for any other item type.
pub const POD_ITEM_TYPE: &str = "pods";

/// Default name of the subdirectory every item type is discoverable in.
pub const DEFAULT_SUBDIRECTORY: &str = "pods";

/// Formats registered out of the box.
pub const BUILTIN_FORMATS: [&str; 2] = ["json", "yml"];

/// Item types registered out of the box.
pub const BUILTIN_ITEM_TYPES: [&str; 5] = ["pods", "fields", "templates", "pages", "helpers"];

/// How a decoded section is merged, chosen from its item type identifier.
///
/// Unrecognized identifiers fall through to [`ItemKind::Custom`], so the set
/// of item types stays open at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind<'a> {
    Pods,
    Fields,
    Named(NamedKind),
    Custom(&'a str),
}

impl<'a> ItemKind<'a> {
    pub fn from_id(id: &'a str) -> Self {
        match id {
            "pods" => ItemKind::Pods,
            "fields" => ItemKind::Fields,
            "templates" => ItemKind::Named(NamedKind::Templates),
            "pages" => ItemKind::Named(NamedKind::Pages),
            "helpers" => ItemKind::Named(NamedKind::Helpers),
            other => ItemKind::Custom(other),
        }
    }
}

/// Item types stored in a flat `name -> record` mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedKind {
    Templates,
    Pages,
    Helpers,
}

impl NamedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NamedKind::Templates => "templates",
            NamedKind::Pages => "pages",
            NamedKind::Helpers => "helpers",
        }
    }
}

/// A candidate config file location relative to a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    /// Format identifier used to pick a parser.
    pub format: String,
    /// Path appended to the base directory, always `/`-separated.
    pub relative_path: String,
    /// Item type the file is discovered as. Restricts which sections it may declare.
    pub item_type: String,
    /// Whether the pattern is honored directly under a root-type directory.
    pub root_eligible: bool,
}

/// Read a non-empty string identifier from a record.
pub(crate) fn identifier<'r>(record: &'r Record, key: &str) -> Option<&'r str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtin_ids_map_to_their_strategies() {
        assert_eq!(ItemKind::from_id("pods"), ItemKind::Pods);
        assert_eq!(ItemKind::from_id("fields"), ItemKind::Fields);
        assert_eq!(
            ItemKind::from_id("pages"),
            ItemKind::Named(NamedKind::Pages)
        );
    }

    #[test]
    fn unknown_ids_are_custom() {
        assert_eq!(ItemKind::from_id("widgets"), ItemKind::Custom("widgets"));
    }

    #[test]
    fn identifier_rejects_empty_and_non_strings() {
        let Value::Object(record) = json!({"name": "", "type": 4, "label": "Books"}) else {
            unreachable!()
        };
        assert_eq!(identifier(&record, "name"), None);
        assert_eq!(identifier(&record, "type"), None);
        assert_eq!(identifier(&record, "missing"), None);
        assert_eq!(identifier(&record, "label"), Some("Books"));
    }
}
