//! Runtime errors

use std::path::PathBuf;

use thiserror::Error;

use eve_playlist::PlaylistError;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Preference store {path}: {source}")]
    PreferenceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Preference store corrupt: {0}")]
    PreferenceCorrupt(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Playlist(#[from] PlaylistError),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
