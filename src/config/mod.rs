pub mod app;
pub mod workspace;

use std::path::PathBuf;
use thiserror::Error;

/// Why a persisted JSON file could not be used as-is.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0} does not exist")]
    Absent(PathBuf),
    #[error("failed reading {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed parsing {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn read_json<T: serde::de::DeserializeOwned>(path: PathBuf) -> Result<T, LoadError> {
    if !path.exists() {
        return Err(LoadError::Absent(path));
    }
    let data = match std::fs::read_to_string(&path) {
        Ok(d) => d,
        Err(source) => return Err(LoadError::Unreadable { path, source }),
    };
    serde_json::from_str(&data).map_err(|source| LoadError::Corrupt { path, source })
}
