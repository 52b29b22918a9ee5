//! File access used by the load pass.
//!
//! The load pass never touches `std::fs` directly. It goes through a
//! [`FileAccess`] so hosts can layer virtual filesystems, and tests can count
//! exactly which paths were probed or read.

use std::io;
use std::path::Path;

/// Existence, readability, and content of candidate config files.
///
/// Every method must be safe to call with a path that does not exist.
pub trait FileAccess: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_readable(&self, path: &Path) -> bool;

    /// Read the whole file as UTF-8 text.
    fn read_all(&self, path: &Path) -> io::Result<String>;
}

/// [`FileAccess`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileAccess;

impl FileAccess for StdFileAccess {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_readable(&self, path: &Path) -> bool {
        path.is_file() && std::fs::File::open(path).is_ok()
    }

    fn read_all(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}
