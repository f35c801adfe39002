use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to write preferences to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("embedded content file {0} not found")]
    Missing(&'static str),
    #[error("embedded content file {0} is not valid utf-8")]
    NotUtf8(&'static str),
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
