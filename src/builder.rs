use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::access::{FileAccess, StdFileAccess};
use crate::hooks::Hooks;
use crate::load::{LoadPass, LoadSummary};
use crate::paths::{PathProvider, RootDirectories};
use crate::pattern::generate_patterns;
use crate::provenance::Provenance;
use crate::register::Registrar;
use crate::registry::Registries;
use crate::settings::Settings;
use crate::store::{Pod, Store};
use crate::types::{FilePattern, Record};

/// The discovery and merge engine.
///
/// One value owns its registries, store, and provenance. A pass borrows the
/// engine mutably, so concurrent passes need separate engines or one lock
/// around the whole engine.
pub struct Podfig {
    settings: Settings,
    registries: Registries,
    file_access: Box<dyn FileAccess>,
    path_provider: Box<dyn PathProvider>,
    hooks: Hooks,
    store: Store,
    provenance: Provenance,
}

impl Podfig {
    pub fn builder() -> PodfigBuilder {
        PodfigBuilder::new()
    }

    /// Register the path provider's root directories, then run a pass.
    pub fn setup(&mut self) -> LoadSummary {
        for directory in self.path_provider.root_directories() {
            self.registries.register_path(&directory);
        }
        self.load()
    }

    /// Run a full discovery and load pass.
    ///
    /// Pre-load hooks run first and may change the registries. The store and
    /// provenance are rebuilt from scratch, so an unregistered directory or
    /// item type stops contributing on the next pass.
    pub fn load(&mut self) -> LoadSummary {
        self.hooks.fire_pre_load(&mut self.registries);

        self.store.clear();
        self.provenance.clear();

        let patterns = self.patterns();
        let summary = LoadPass {
            directories: self.registries.paths().collect(),
            patterns: &patterns,
            file_access: self.file_access.as_ref(),
            path_provider: self.path_provider.as_ref(),
            hooks: &self.hooks,
            store: &mut self.store,
            provenance: &mut self.provenance,
        }
        .run();

        self.hooks.fire_post_load(&summary);
        summary
    }

    /// Merge an already-decoded config into the store, outside any pass.
    ///
    /// `restriction` limits which sections are honored, as the discovered
    /// item type does for files. Returns the number of records admitted.
    pub fn register_config(&mut self, config: Record, path: &Path, restriction: Option<&str>) -> usize {
        Registrar::new(&mut self.store, &mut self.provenance, &self.hooks).register(config, path, restriction)
    }

    /// Patterns the next pass would probe, given the current registries.
    pub fn patterns(&self) -> Vec<FilePattern> {
        generate_patterns(
            self.registries.formats(),
            self.registries.item_types(),
            &self.settings.subdirectory,
        )
    }

    // --- registration ---

    pub fn register_path(&mut self, path: impl AsRef<Path>) -> bool {
        self.registries.register_path(path)
    }

    pub fn unregister_path(&mut self, path: impl AsRef<Path>) -> bool {
        self.registries.unregister_path(path)
    }

    pub fn register_format(&mut self, format: &str) -> bool {
        self.registries.register_format(format)
    }

    pub fn unregister_format(&mut self, format: &str) -> bool {
        self.registries.unregister_format(format)
    }

    pub fn register_item_type(&mut self, item_type: &str) -> bool {
        self.registries.register_item_type(item_type)
    }

    pub fn unregister_item_type(&mut self, item_type: &str) -> bool {
        self.registries.unregister_item_type(item_type)
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    pub fn registries_mut(&mut self) -> &mut Registries {
        &mut self.registries
    }

    /// Hooks can also be added after construction; they apply from the next pass.
    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    // --- queries ---

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn pods(&self) -> &BTreeMap<String, BTreeMap<String, Pod>> {
        self.store.pods()
    }

    pub fn pod(&self, pod_type: &str, name: &str) -> Option<&Pod> {
        self.store.pod(pod_type, name)
    }

    pub fn templates(&self) -> &BTreeMap<String, Record> {
        self.store.templates()
    }

    pub fn pages(&self) -> &BTreeMap<String, Record> {
        self.store.pages()
    }

    pub fn helpers(&self) -> &BTreeMap<String, Record> {
        self.store.helpers()
    }

    pub fn custom_configs(&self) -> &BTreeMap<String, BTreeMap<String, Record>> {
        self.store.custom_configs()
    }

    pub fn custom_items(&self, item_type: &str) -> Option<&BTreeMap<String, Record>> {
        self.store.custom_items(item_type)
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }
}

impl Default for Podfig {
    fn default() -> Self {
        Podfig::builder().build()
    }
}

impl fmt::Debug for Podfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Podfig")
            .field("settings", &self.settings)
            .field("registries", &self.registries)
            .field("hooks", &self.hooks)
            .field("pods", &self.store.pod_count())
            .field("provenance", &self.provenance.len())
            .finish_non_exhaustive()
    }
}

/// Builder for a [`Podfig`] engine.
///
/// Everything is optional. Without calls the engine reads the real
/// filesystem, treats no directory as root-type, registers the built-in
/// formats and item types, and has no hooks.
pub struct PodfigBuilder {
    settings: Option<Settings>,
    file_access: Option<Box<dyn FileAccess>>,
    path_provider: Option<Box<dyn PathProvider>>,
    paths: Vec<PathBuf>,
    hooks: Hooks,
}

impl PodfigBuilder {
    fn new() -> Self {
        Self {
            settings: None,
            file_access: None,
            path_provider: None,
            paths: Vec::new(),
            hooks: Hooks::default(),
        }
    }

    /// Seed the registries and subdirectory from `settings`
    /// (default: [`Settings::default()`]).
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Replace the filesystem (default: [`StdFileAccess`]).
    pub fn file_access(mut self, file_access: impl FileAccess + 'static) -> Self {
        self.file_access = Some(Box::new(file_access));
        self
    }

    /// Replace the root-type directory classifier (default: an empty
    /// [`RootDirectories`]).
    pub fn path_provider(mut self, path_provider: impl PathProvider + 'static) -> Self {
        self.path_provider = Some(Box::new(path_provider));
        self
    }

    /// Register a base directory up front. Directories are scanned in the
    /// order given, before any root directories added by [`Podfig::setup`].
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    pub fn on_pre_load<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Registries) + Send + 'static,
    {
        self.hooks.on_pre_load(hook);
        self
    }

    pub fn on_post_load<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&LoadSummary) + Send + 'static,
    {
        self.hooks.on_post_load(hook);
        self
    }

    /// Add a parser consulted for formats without a built-in one.
    /// The first parser returning `Some` wins.
    pub fn format_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str, &str) -> Option<Value> + Send + Sync + 'static,
    {
        self.hooks.format_parser(parser);
        self
    }

    /// Add a transform applied to every custom item before validation.
    pub fn preprocess<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value, &str, &Path) -> Value + Send + Sync + 'static,
    {
        self.hooks.preprocess(hook);
        self
    }

    pub fn build(self) -> Podfig {
        let settings = self.settings.unwrap_or_default();
        let mut registries = Registries::from_settings(&settings);
        for path in &self.paths {
            registries.register_path(path);
        }
        debug!(?registries, "built podfig engine");

        Podfig {
            settings,
            registries,
            file_access: self
                .file_access
                .unwrap_or_else(|| Box::new(StdFileAccess)),
            path_provider: self
                .path_provider
                .unwrap_or_else(|| Box::new(RootDirectories::new())),
            hooks: self.hooks,
            store: Store::default(),
            provenance: Provenance::default(),
        }
    }
}
