use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure to load a configuration or a simulation script.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// `origin` is the file name, or a placeholder for in-memory sources
    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid input: {0}")]
    Invalid(String),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Reads the whole file at `path`.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_json<T: DeserializeOwned>(
    json: &str,
    origin: impl Into<String>,
) -> LoadResult<T> {
    serde_json::from_str(json).map_err(|source| LoadError::Parse {
        origin: origin.into(),
        source,
    })
}
