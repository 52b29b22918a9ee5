//! Root-type directory classification.
//!
//! A root-type directory is a top-level location (a theme root, a platform
//! config directory) where only root-eligible patterns are honored. The
//! [`PathProvider`] supplies those directories at setup and answers whether a
//! registered directory is one of them.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;

use crate::normalize::directory_key;

pub trait PathProvider: Send + Sync {
    /// Directories registered by [`Podfig::setup`](crate::Podfig::setup).
    fn root_directories(&self) -> Vec<PathBuf>;

    /// Whether `directory` is root-type.
    fn is_root_type(&self, directory: &Path) -> bool;
}

/// An explicit set of root-type directories, of any size.
///
/// Directories are normalized the same way the path registry normalizes
/// them, so `a/b` and `a/b/` classify identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootDirectories {
    keys: IndexSet<String>,
}

impl RootDirectories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, directory: impl AsRef<Path>) -> Self {
        self.insert(directory);
        self
    }

    /// Add a root-type directory. Returns `true` if it was not already present.
    pub fn insert(&mut self, directory: impl AsRef<Path>) -> bool {
        directory_key(directory).is_some_and(|key| self.keys.insert(key))
    }

    /// The platform config and data directories for `app_name`
    /// (`~/.config/{app}` and `~/.local/share/{app}` on Linux).
    ///
    /// Returns `None` if no home directory can be determined.
    pub fn platform(app_name: &str) -> Option<Self> {
        let proj = directories::ProjectDirs::from("", "", app_name)?;
        Some(Self::new().with(proj.config_dir()).with(proj.data_dir()))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<P: AsRef<Path>> FromIterator<P> for RootDirectories {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut roots = Self::new();
        for dir in iter {
            roots.insert(dir);
        }
        roots
    }
}

impl PathProvider for RootDirectories {
    fn root_directories(&self) -> Vec<PathBuf> {
        self.keys.iter().map(PathBuf::from).collect()
    }

    fn is_root_type(&self, directory: &Path) -> bool {
        directory_key(directory).is_some_and(|key| self.keys.contains(&key))
    }
}
