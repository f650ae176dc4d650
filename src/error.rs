use std::path::PathBuf;

use thiserror::Error;

/// Failures while probing a preview asset. Never fatal to the navigator.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to read media {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode media {path:?}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("media {path:?} has no frames")]
    Empty { path: PathBuf },
    #[error("media source not reachable locally: {0}")]
    Unsupported(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate slug in catalog: {0}")]
    DuplicateSlug(String),
    #[error("could not determine the default catalog location")]
    NoConfigDir,
}

/// Session script errors carry the 1-based line they came from.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command {command:?}")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: {command} expects {expected}")]
    MissingArgument {
        line: usize,
        command: &'static str,
        expected: &'static str,
    },
    #[error("line {line}: invalid number {value:?}")]
    InvalidNumber { line: usize, value: String },
}
