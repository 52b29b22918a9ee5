//! Extension points invoked synchronously during a load pass.
//!
//! | Point          | When                                   | Signature                                |
//! |----------------|----------------------------------------|------------------------------------------|
//! | pre-load       | before patterns are generated          | `FnMut(&mut Registries)`                 |
//! | format parser  | a file's format has no built-in parser | `Fn(format, content) -> Option<Value>`   |
//! | preprocess     | each custom item, before validation    | `Fn(item, item_type, path) -> Value`     |
//! | post-load      | after the pass completes               | `FnMut(&LoadSummary)`                    |
//!
//! Every point defaults to a no-op when nothing is registered. Listeners run
//! in registration order; preprocess listeners are chained, each receiving the
//! previous one's output.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::format::FormatParser;
use crate::load::LoadSummary;
use crate::registry::Registries;

pub type PreLoadHook = Box<dyn FnMut(&mut Registries) + Send>;
pub type PostLoadHook = Box<dyn FnMut(&LoadSummary) + Send>;
pub type PreprocessHook = Box<dyn Fn(Value, &str, &Path) -> Value + Send + Sync>;

#[derive(Default)]
pub struct Hooks {
    pre_load: Vec<PreLoadHook>,
    post_load: Vec<PostLoadHook>,
    parsers: Vec<FormatParser>,
    preprocess: Vec<PreprocessHook>,
}

impl Hooks {
    pub fn on_pre_load<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Registries) + Send + 'static,
    {
        self.pre_load.push(Box::new(hook));
    }

    pub fn on_post_load<F>(&mut self, hook: F)
    where
        F: FnMut(&LoadSummary) + Send + 'static,
    {
        self.post_load.push(Box::new(hook));
    }

    pub fn format_parser<F>(&mut self, parser: F)
    where
        F: Fn(&str, &str) -> Option<Value> + Send + Sync + 'static,
    {
        self.parsers.push(Box::new(parser));
    }

    pub fn preprocess<F>(&mut self, hook: F)
    where
        F: Fn(Value, &str, &Path) -> Value + Send + Sync + 'static,
    {
        self.preprocess.push(Box::new(hook));
    }

    pub(crate) fn fire_pre_load(&mut self, registries: &mut Registries) {
        for hook in &mut self.pre_load {
            hook(registries);
        }
    }

    pub(crate) fn fire_post_load(&mut self, summary: &LoadSummary) {
        for hook in &mut self.post_load {
            hook(summary);
        }
    }

    pub(crate) fn parsers(&self) -> &[FormatParser] {
        &self.parsers
    }

    pub(crate) fn apply_preprocess(&self, item: Value, item_type: &str, path: &Path) -> Value {
        self.preprocess
            .iter()
            .fold(item, |item, hook| hook(item, item_type, path))
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("pre_load", &self.pre_load.len())
            .field("post_load", &self.post_load.len())
            .field("parsers", &self.parsers.len())
            .field("preprocess", &self.preprocess.len())
            .finish()
    }
}
