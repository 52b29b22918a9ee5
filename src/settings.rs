//! The engine's own defaults, loaded with confique.
//!
//! Settings decide what the registries hold before any pre-load hook runs and
//! which subdirectory nested patterns live in. They come from, highest
//! priority first:
//!
//! 1. `PODFIG_SUBDIRECTORY` in the environment
//! 2. a TOML settings file
//! 3. the defaults below
//!
//! ```toml
//! formats = ["json", "yml", "toml"]
//! item_types = ["pods", "fields", "templates", "pages", "helpers", "widgets"]
//! subdirectory = "pods"
//! ```

use std::fs;
use std::io;
use std::path::Path;

use confique::Config;
use tracing::{debug, warn};

use crate::error::PodfigError;

type SettingsLayer = <Settings as Config>::Layer;

#[derive(Config, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Formats registered before the first pass.
    #[config(default = ["json", "yml"])]
    pub formats: Vec<String>,

    /// Item types registered before the first pass.
    #[config(default = ["pods", "fields", "templates", "pages", "helpers"])]
    pub item_types: Vec<String>,

    /// Subdirectory holding the nested pattern of every item type.
    #[config(env = "PODFIG_SUBDIRECTORY", default = "pods")]
    pub subdirectory: String,
}

/// The `#[config(default = ...)]` values, with no file or environment.
impl Default for Settings {
    fn default() -> Self {
        Settings::builder()
            .load()
            .expect("podfig: every setting has a default")
    }
}

impl Settings {
    /// Parse a TOML settings document, filling absent keys from defaults.
    ///
    /// With `strict`, keys that are not settings are an error listing each
    /// one with its line. Otherwise they are logged and ignored.
    pub fn from_toml(content: &str, path: &Path, strict: bool) -> Result<Self, PodfigError> {
        let layer = parse_layer(content, path, strict)?;
        Ok(Settings::builder().preloaded(layer).load()?)
    }

    /// Load settings from `path` with environment overrides on top.
    ///
    /// A missing file is not an error: defaults and the environment apply.
    /// Unknown keys are rejected.
    pub fn load(path: &Path) -> Result<Self, PodfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                None
            }
            Err(source) => {
                return Err(PodfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut builder = Settings::builder().env();
        if let Some(content) = content {
            builder = builder.preloaded(parse_layer(&content, path, true)?);
        }
        Ok(builder.load()?)
    }
}

fn parse_layer(content: &str, path: &Path, strict: bool) -> Result<SettingsLayer, PodfigError> {
    let mut unknown_keys: Vec<String> = Vec::new();

    let deserializer = toml::Deserializer::new(content);
    let layer: SettingsLayer = serde_ignored::deserialize(deserializer, |ignored| {
        unknown_keys.push(ignored.to_string());
    })
    .map_err(|source| PodfigError::SettingsParse {
        path: path.to_path_buf(),
        source,
    })?;

    if unknown_keys.is_empty() {
        return Ok(layer);
    }

    if !strict {
        for key in &unknown_keys {
            warn!(path = %path.display(), key, "ignoring unknown settings key");
        }
        return Ok(layer);
    }

    let errors = unknown_keys
        .into_iter()
        .map(|key| {
            let line = key_line(content, &key);
            PodfigError::UnknownSettingsKey {
                key,
                path: path.to_path_buf(),
                line,
            }
        })
        .collect();
    Err(PodfigError::UnknownSettingsKeys(errors))
}

/// 1-indexed line where `dotted_key` is assigned or opened as a table, or 0.
///
/// Only the first segment is located: settings are flat, so an unknown key
/// is either a top-level assignment or a whole unknown table.
fn key_line(content: &str, dotted_key: &str) -> usize {
    let head = dotted_key.split('.').next().unwrap_or(dotted_key);

    content
        .lines()
        .position(|line| {
            let trimmed = line.trim();
            let header = trimmed
                .strip_prefix('[')
                .map(|rest| rest.trim_start_matches('[').trim_end_matches(']').trim());
            match header {
                Some(header) => header == head || header.starts_with(&format!("{head}.")),
                None => trimmed
                    .strip_prefix(head)
                    .is_some_and(|rest| rest.trim_start().starts_with('=')),
            }
        })
        .map_or(0, |index| index + 1)
}
