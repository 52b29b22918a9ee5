#[cfg(test)]
pub mod test {
    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use serde_json::Value;

    use crate::access::FileAccess;
    use crate::types::Record;

    /// Unwrap a `json!` object into a [`Record`].
    pub fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("expected a JSON object, got {other}"),
        }
    }

    #[derive(Debug, Clone)]
    struct MemoryFile {
        content: String,
        readable: bool,
    }

    /// In-memory [`FileAccess`] that remembers every path it was asked about.
    ///
    /// Clones share state, so a test can keep one handle after moving the
    /// other into an engine.
    #[derive(Debug, Clone, Default)]
    pub struct MemoryFiles {
        files: Arc<Mutex<HashMap<PathBuf, MemoryFile>>>,
        probed: Arc<Mutex<Vec<PathBuf>>>,
        read: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl MemoryFiles {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(self, path: &str, content: &str) -> Self {
            self.insert(path, content, true);
            self
        }

        pub fn with_unreadable(self, path: &str, content: &str) -> Self {
            self.insert(path, content, false);
            self
        }

        fn insert(&self, path: &str, content: &str, readable: bool) {
            self.files.lock().unwrap().insert(
                PathBuf::from(path),
                MemoryFile {
                    content: content.to_string(),
                    readable,
                },
            );
        }

        /// Every path passed to `exists`, in call order.
        pub fn probed(&self) -> Vec<PathBuf> {
            self.probed.lock().unwrap().clone()
        }

        /// Every path passed to `read_all`, in call order.
        pub fn read(&self) -> Vec<PathBuf> {
            self.read.lock().unwrap().clone()
        }
    }

    impl FileAccess for MemoryFiles {
        fn exists(&self, path: &Path) -> bool {
            self.probed.lock().unwrap().push(path.to_path_buf());
            self.files.lock().unwrap().contains_key(path)
        }

        fn is_readable(&self, path: &Path) -> bool {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .is_some_and(|file| file.readable)
        }

        fn read_all(&self, path: &Path) -> io::Result<String> {
            self.read.lock().unwrap().push(path.to_path_buf());
            match self.files.lock().unwrap().get(path) {
                Some(file) if file.readable => Ok(file.content.clone()),
                Some(_) => Err(io::Error::from(io::ErrorKind::PermissionDenied)),
                None => Err(io::Error::from(io::ErrorKind::NotFound)),
            }
        }
    }

    #[test]
    fn memory_files_track_probes_and_reads() {
        let files = MemoryFiles::new().with("/site/pods.json", "{}");
        assert!(files.exists(Path::new("/site/pods.json")));
        assert!(!files.exists(Path::new("/site/pages.json")));
        assert_eq!(files.read_all(Path::new("/site/pods.json")).unwrap(), "{}");
        assert_eq!(files.probed().len(), 2);
        assert_eq!(files.read(), vec![PathBuf::from("/site/pods.json")]);
    }

    #[test]
    fn unreadable_memory_file_exists_but_cannot_be_read() {
        let files = MemoryFiles::new().with_unreadable("/site/pods.json", "{}");
        let path = Path::new("/site/pods.json");
        assert!(files.exists(path));
        assert!(!files.is_readable(path));
        assert!(files.read_all(path).is_err());
    }
}
