use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PodfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path} as {format}: {reason}")]
    Parse {
        path: PathBuf,
        format: String,
        reason: String,
    },

    #[error("Top level of {path} is not a mapping")]
    NotAMapping { path: PathBuf },

    #[error("No parser registered for format '{format}' (needed by {path})")]
    NoParser { path: PathBuf, format: String },

    #[error("Failed to parse settings file {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Unknown settings key '{key}' in {path} (line {line})")]
    UnknownSettingsKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in settings file")]
    UnknownSettingsKeys(Vec<PodfigError>),

    #[error("Settings error: {0}")]
    Settings(#[from] confique::Error),
}
