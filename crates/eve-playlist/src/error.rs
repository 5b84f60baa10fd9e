//! Playlist loading errors

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaylistError {
    #[error("Failed to read playlist document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed playlist document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Entry {index} of {persona} has {len} fields, expected 1 to 4")]
    EntryArity {
        persona: String,
        index: usize,
        len: usize,
    },

    #[error("Entry {index} of {persona} has no media reference")]
    MissingMedia { persona: String, index: usize },
}

pub type PlaylistResult<T> = Result<T, PlaylistError>;
