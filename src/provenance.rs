//! Which file contributed what.
//!
//! For each loaded file, one label per item type names the logical item that
//! file last contributed: `"type:name"` for pods, `"type:name:field"` for
//! fields, and the item name for everything else. A later sync step can diff
//! these against an authoritative store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    files: IndexMap<PathBuf, BTreeMap<String, String>>,
}

impl Provenance {
    pub fn label(&self, path: &Path, item_type: &str) -> Option<&str> {
        self.files.get(path)?.get(item_type).map(String::as_str)
    }

    /// All labels recorded for `path`, keyed by item type.
    pub fn labels(&self, path: &Path) -> Option<&BTreeMap<String, String>> {
        self.files.get(path)
    }

    /// Files in the order they first contributed an item.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &BTreeMap<String, String>)> {
        self.files.iter().map(|(path, labels)| (path.as_path(), labels))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub(crate) fn record(&mut self, path: &Path, item_type: &str, label: impl Into<String>) {
        self.files
            .entry(path.to_path_buf())
            .or_default()
            .insert(item_type.to_string(), label.into());
    }

    pub(crate) fn clear(&mut self) {
        self.files.clear();
    }
}
