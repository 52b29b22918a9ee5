//! Registries of base directories, file formats, and item types.
//!
//! Each registry is an insertion-ordered set. Order matters: directories are
//! scanned in registration order and patterns are generated in format and
//! item-type order, so later registrations win on key collisions.

use std::path::Path;

use indexmap::IndexSet;

use crate::normalize::{directory_key, slug};
use crate::settings::Settings;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registries {
    paths: IndexSet<String>,
    formats: IndexSet<String>,
    item_types: IndexSet<String>,
}

impl Registries {
    /// Empty registries: no directories, formats, or item types.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registries seeded with the formats and item types named in `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut registries = Self::new();
        for format in &settings.formats {
            registries.register_format(format);
        }
        for item_type in &settings.item_types {
            registries.register_item_type(item_type);
        }
        registries
    }

    /// Register a base directory. Returns `true` if it was not already present.
    pub fn register_path(&mut self, path: impl AsRef<Path>) -> bool {
        directory_key(path).is_some_and(|key| self.paths.insert(key))
    }

    /// Unregister a base directory. Returns `true` if it was present.
    pub fn unregister_path(&mut self, path: impl AsRef<Path>) -> bool {
        directory_key(path).is_some_and(|key| self.paths.shift_remove(&key))
    }

    pub fn register_format(&mut self, format: &str) -> bool {
        insert_slug(&mut self.formats, format)
    }

    pub fn unregister_format(&mut self, format: &str) -> bool {
        self.formats.shift_remove(&slug(format))
    }

    pub fn register_item_type(&mut self, item_type: &str) -> bool {
        insert_slug(&mut self.item_types, item_type)
    }

    pub fn unregister_item_type(&mut self, item_type: &str) -> bool {
        self.item_types.shift_remove(&slug(item_type))
    }

    /// Normalized base directories, each ending in `/`, in registration order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.formats.iter().map(String::as_str)
    }

    pub fn item_types(&self) -> impl Iterator<Item = &str> {
        self.item_types.iter().map(String::as_str)
    }

    pub fn has_path(&self, path: impl AsRef<Path>) -> bool {
        directory_key(path).is_some_and(|key| self.paths.contains(&key))
    }

    pub fn has_format(&self, format: &str) -> bool {
        self.formats.contains(&slug(format))
    }

    pub fn has_item_type(&self, item_type: &str) -> bool {
        self.item_types.contains(&slug(item_type))
    }
}

fn insert_slug(set: &mut IndexSet<String>, raw: &str) -> bool {
    let key = slug(raw);
    !key.is_empty() && set.insert(key)
}
