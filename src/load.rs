//! Discovery and loading of config files.
//!
//! # Discovery
//!
//! Every registered base directory is crossed with every generated
//! [`FilePattern`], directories in registration order and patterns in
//! generation order. On a root-type directory (as classified by the
//! [`PathProvider`]) patterns that are not root-eligible are dropped before
//! anything touches the filesystem.
//!
//! # Loading
//!
//! Each surviving candidate is probed through the [`FileAccess`]:
//!
//! - missing files are skipped silently (the common case);
//! - unreadable, unreadable-as-text, and blank files are skipped;
//! - content that fails to decode, or decodes to something other than a
//!   mapping, is skipped.
//!
//! Nothing here is fatal. A pass always runs to completion and the
//! [`LoadSummary`] says what was loaded and what was passed over.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::access::FileAccess;
use crate::error::PodfigError;
use crate::format;
use crate::hooks::Hooks;
use crate::paths::PathProvider;
use crate::provenance::Provenance;
use crate::register::Registrar;
use crate::store::Store;
use crate::types::FilePattern;

/// A concrete file to probe: a base directory joined with a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'p> {
    pub path: PathBuf,
    pub pattern: &'p FilePattern,
}

/// Why an existing file did not contribute to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The file exists but the file access service reports it unreadable.
    Unreadable,
    /// Reading failed, e.g. the content is not UTF-8.
    ReadFailed,
    /// The content is empty or whitespace only.
    Empty,
    /// The built-in decoder rejected the content.
    ParseFailed,
    /// The content decoded to something other than a mapping.
    NotAMapping,
    /// The format has no built-in parser and no fallback accepted it.
    NoParser,
}

impl SkipReason {
    fn from_error(err: &PodfigError) -> Self {
        match err {
            PodfigError::Read { .. } => SkipReason::ReadFailed,
            PodfigError::NotAMapping { .. } => SkipReason::NotAMapping,
            PodfigError::NoParser { .. } => SkipReason::NoParser,
            _ => SkipReason::ParseFailed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Outcome of one load pass. Serializes for hosts that report it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Files that decoded and were handed to the registrar, in load order.
    pub loaded: Vec<PathBuf>,
    /// Existing files that were passed over, in probe order.
    pub skipped: Vec<SkippedFile>,
    /// Records admitted into the store across all loaded files.
    pub admitted: usize,
}

impl LoadSummary {
    pub fn skip_reason(&self, path: &Path) -> Option<SkipReason> {
        self.skipped
            .iter()
            .find(|skipped| skipped.path == path)
            .map(|skipped| skipped.reason)
    }

    fn skip(&mut self, path: PathBuf, reason: SkipReason) {
        self.skipped.push(SkippedFile { path, reason });
    }
}

/// Cross directories with patterns, dropping non-root-eligible patterns on
/// root-type directories.
///
/// `directories` must be registry keys, each ending in `/`.
pub fn discover<'a, 'p>(
    directories: impl IntoIterator<Item = &'a str>,
    patterns: &'p [FilePattern],
    path_provider: &dyn PathProvider,
) -> Vec<Candidate<'p>> {
    let mut candidates = Vec::new();
    for directory in directories {
        let root_type = path_provider.is_root_type(Path::new(directory));
        for pattern in patterns {
            if root_type && !pattern.root_eligible {
                continue;
            }
            candidates.push(Candidate {
                path: PathBuf::from(format!("{directory}{}", pattern.relative_path)),
                pattern,
            });
        }
    }
    candidates
}

enum Probe {
    Missing,
    Skip(SkipReason),
    Content(String),
}

fn probe(file_access: &dyn FileAccess, path: &Path) -> Probe {
    if !file_access.exists(path) {
        trace!(path = %path.display(), "no config file");
        return Probe::Missing;
    }
    if !file_access.is_readable(path) {
        warn!(path = %path.display(), "config file is not readable, skipping");
        return Probe::Skip(SkipReason::Unreadable);
    }
    match file_access.read_all(path) {
        Ok(content) if content.trim().is_empty() => {
            debug!(path = %path.display(), "config file is empty, skipping");
            Probe::Skip(SkipReason::Empty)
        }
        Ok(content) => Probe::Content(content),
        Err(source) => {
            let err = PodfigError::Read {
                path: path.to_path_buf(),
                source,
            };
            warn!(%err, "skipping config file");
            Probe::Skip(SkipReason::from_error(&err))
        }
    }
}

/// Everything one pass reads from or writes to, borrowed from the engine.
pub(crate) struct LoadPass<'a> {
    pub directories: Vec<&'a str>,
    pub patterns: &'a [FilePattern],
    pub file_access: &'a dyn FileAccess,
    pub path_provider: &'a dyn PathProvider,
    pub hooks: &'a Hooks,
    pub store: &'a mut Store,
    pub provenance: &'a mut Provenance,
}

impl LoadPass<'_> {
    pub fn run(self) -> LoadSummary {
        let mut summary = LoadSummary::default();
        let candidates = discover(self.directories, self.patterns, self.path_provider);
        debug!(candidates = candidates.len(), "starting config load pass");

        let mut registrar = Registrar::new(self.store, self.provenance, self.hooks);
        for Candidate { path, pattern } in candidates {
            let content = match probe(self.file_access, &path) {
                Probe::Missing => continue,
                Probe::Skip(reason) => {
                    summary.skip(path, reason);
                    continue;
                }
                Probe::Content(content) => content,
            };

            match format::parse(&pattern.format, &content, &path, self.hooks.parsers()) {
                Ok(config) => {
                    let admitted = registrar.register(config, &path, Some(&pattern.item_type));
                    debug!(path = %path.display(), admitted, "loaded config file");
                    summary.admitted += admitted;
                    summary.loaded.push(path);
                }
                Err(err) => {
                    warn!(%err, "skipping config file");
                    summary.skip(path, SkipReason::from_error(&err));
                }
            }
        }

        debug!(
            loaded = summary.loaded.len(),
            skipped = summary.skipped.len(),
            admitted = summary.admitted,
            "config load pass finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::MemoryFiles;
    use crate::paths::RootDirectories;
    use crate::pattern::generate_patterns;
    use crate::types::{BUILTIN_FORMATS, BUILTIN_ITEM_TYPES};

    fn builtin_patterns() -> Vec<FilePattern> {
        generate_patterns(BUILTIN_FORMATS, BUILTIN_ITEM_TYPES, "pods")
    }

    fn run(directories: Vec<&str>, files: &MemoryFiles, roots: &RootDirectories) -> (LoadSummary, Store, Provenance) {
        let patterns = builtin_patterns();
        let hooks = Hooks::default();
        let mut store = Store::default();
        let mut provenance = Provenance::default();
        let summary = LoadPass {
            directories,
            patterns: &patterns,
            file_access: files,
            path_provider: roots,
            hooks: &hooks,
            store: &mut store,
            provenance: &mut provenance,
        }
        .run();
        (summary, store, provenance)
    }

    // --- discover ---

    #[test]
    fn discover_crosses_directories_with_patterns() {
        let patterns = builtin_patterns();
        let candidates = discover(["/a/", "/b/"], &patterns, &RootDirectories::new());
        assert_eq!(candidates.len(), 2 * patterns.len());
        assert_eq!(candidates[0].path, PathBuf::from("/a/pods.json"));
        assert_eq!(candidates[1].path, PathBuf::from("/a/pods/pods.json"));
        assert_eq!(
            candidates[patterns.len()].path,
            PathBuf::from("/b/pods.json")
        );
    }

    #[test]
    fn discover_filters_root_ineligible_on_root_directories() {
        let patterns = builtin_patterns();
        let roots = RootDirectories::new().with("/theme");
        let candidates = discover(["/theme/"], &patterns, &roots);

        assert!(candidates.iter().all(|c| c.pattern.root_eligible));
        assert!(candidates.iter().any(|c| c.path == Path::new("/theme/pods.json")));
        assert!(!candidates.iter().any(|c| c.path == Path::new("/theme/fields.json")));
        assert!(candidates.iter().any(|c| c.path == Path::new("/theme/pods/fields.json")));
    }

    #[test]
    fn discover_keeps_every_pattern_on_plain_directories() {
        let patterns = builtin_patterns();
        let roots = RootDirectories::new().with("/theme");
        let candidates = discover(["/plugin/"], &patterns, &roots);
        assert!(candidates.iter().any(|c| c.path == Path::new("/plugin/fields.json")));
        assert_eq!(candidates.len(), patterns.len());
    }

    // --- load pass ---

    #[test]
    fn root_directory_never_probes_ineligible_paths() {
        let files = MemoryFiles::new().with(
            "/theme/templates.json",
            r#"{"templates": [{"name": "list"}]}"#,
        );
        let roots = RootDirectories::new().with("/theme");
        let (summary, store, _) = run(vec!["/theme/"], &files, &roots);

        let bare = PathBuf::from("/theme/templates.json");
        assert!(!files.probed().contains(&bare));
        assert!(!files.read().contains(&bare));
        assert!(summary.loaded.is_empty());
        assert!(store.templates().is_empty());
    }

    #[test]
    fn missing_files_are_not_reported() {
        let files = MemoryFiles::new();
        let (summary, store, provenance) = run(vec!["/site/"], &files, &RootDirectories::new());
        assert_eq!(summary, LoadSummary::default());
        assert!(store.is_empty());
        assert!(provenance.is_empty());
        assert!(files.read().is_empty());
    }

    #[test]
    fn soft_skips_are_recorded_and_the_pass_continues() {
        let files = MemoryFiles::new()
            .with_unreadable("/site/pods.json", r#"{"pods": []}"#)
            .with("/site/pods/pods.json", "   \n")
            .with("/site/fields.json", "{ not json")
            .with("/site/pods/fields.json", "[1, 2]")
            .with("/site/pages.yml", "pages:\n  - name: home\n");
        let (summary, store, _) = run(vec!["/site/"], &files, &RootDirectories::new());

        assert_eq!(
            summary.skip_reason(Path::new("/site/pods.json")),
            Some(SkipReason::Unreadable)
        );
        assert_eq!(
            summary.skip_reason(Path::new("/site/pods/pods.json")),
            Some(SkipReason::Empty)
        );
        assert_eq!(
            summary.skip_reason(Path::new("/site/fields.json")),
            Some(SkipReason::ParseFailed)
        );
        assert_eq!(
            summary.skip_reason(Path::new("/site/pods/fields.json")),
            Some(SkipReason::NotAMapping)
        );
        assert_eq!(summary.loaded, vec![PathBuf::from("/site/pages.yml")]);
        assert!(store.pages().contains_key("home"));
    }

    #[test]
    fn unreadable_files_are_never_read() {
        let files = MemoryFiles::new().with_unreadable("/site/pods.json", "{}");
        run(vec!["/site/"], &files, &RootDirectories::new());
        assert!(files.read().is_empty());
    }

    #[test]
    fn later_directory_overrides_earlier() {
        let files = MemoryFiles::new()
            .with(
                "/d1/pods.json",
                r#"{"pods": [{"name": "book", "type": "post_type", "label": "From D1"}]}"#,
            )
            .with(
                "/d2/pods.json",
                r#"{"pods": [{"name": "book", "type": "post_type", "label": "From D2"}]}"#,
            );
        let (summary, store, _) = run(vec!["/d1/", "/d2/"], &files, &RootDirectories::new());

        assert_eq!(
            summary.loaded,
            vec![PathBuf::from("/d1/pods.json"), PathBuf::from("/d2/pods.json")]
        );
        assert_eq!(store.pod_count(), 1);
        assert_eq!(
            store.pod("post_type", "book").unwrap().attributes["label"],
            "From D2"
        );
    }

    #[test]
    fn yml_patterns_load_after_json_in_the_same_directory() {
        let files = MemoryFiles::new()
            .with("/site/pods/pages.yml", "pages:\n  - name: home\n    title: yaml\n")
            .with("/site/pods/pages.json", r#"{"pages": [{"name": "home", "title": "json"}]}"#);
        let (summary, store, _) = run(vec!["/site/"], &files, &RootDirectories::new());
        assert_eq!(summary.admitted, 2);
        assert_eq!(store.pages()["home"]["title"], "yaml");
    }

    #[test]
    fn yml_pod_does_not_wipe_fields_from_json() {
        let files = MemoryFiles::new()
            .with("/site/pods.yml", "pods:\n  - name: novel\n    type: book\n")
            .with(
                "/site/pods/fields.json",
                r#"{"fields": [{"name": "title", "type": "text",
                                "pod": {"name": "novel", "type": "book"}}]}"#,
            );
        let (summary, store, _) = run(vec!["/site/"], &files, &RootDirectories::new());

        assert_eq!(
            summary.loaded,
            vec![PathBuf::from("/site/pods.yml"), PathBuf::from("/site/pods/fields.json")]
        );
        let pod = store.pod("book", "novel").unwrap();
        assert!(pod.field("title").is_some());
    }

    #[test]
    fn empty_subdirectory_never_aliases_bare_files_on_root_directories() {
        let patterns = generate_patterns(["json"], ["templates"], "");
        let roots = RootDirectories::new().with("/theme");
        let candidates = discover(["/theme/"], &patterns, &roots);
        let paths: Vec<_> = candidates.into_iter().map(|c| c.path).collect();
        assert_eq!(paths, [PathBuf::from("/theme/pods/templates.json")]);
    }

    #[test]
    fn summary_serializes_with_snake_case_reasons() {
        let summary = LoadSummary {
            loaded: vec![PathBuf::from("/site/pods.json")],
            skipped: vec![SkippedFile {
                path: PathBuf::from("/site/pages.json"),
                reason: SkipReason::NotAMapping,
            }],
            admitted: 3,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "loaded": ["/site/pods.json"],
                "skipped": [{"path": "/site/pages.json", "reason": "not_a_mapping"}],
                "admitted": 3
            })
        );
    }

    #[test]
    fn unknown_format_without_parser_is_skipped() {
        let patterns = generate_patterns(["ini"], ["pods"], "pods");
        let files = MemoryFiles::new().with("/site/pods.ini", "[pods]\n");
        let hooks = Hooks::default();
        let mut store = Store::default();
        let mut provenance = Provenance::default();
        let summary = LoadPass {
            directories: vec!["/site/"],
            patterns: &patterns,
            file_access: &files,
            path_provider: &RootDirectories::new(),
            hooks: &hooks,
            store: &mut store,
            provenance: &mut provenance,
        }
        .run();
        assert_eq!(
            summary.skip_reason(Path::new("/site/pods.ini")),
            Some(SkipReason::NoParser)
        );
    }
}
