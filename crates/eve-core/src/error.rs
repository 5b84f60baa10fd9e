//! Error types for the landing page core

use thiserror::Error;

use crate::Channel;

/// Core errors
#[derive(Error, Debug)]
pub enum EveError {
    #[error("Unknown persona key: {0}")]
    UnknownPersona(String),

    #[error("Playlist for {0} is empty")]
    EmptyPlaylist(Channel),

    #[error("No entry {index} on {channel} (playlist has {len})")]
    IndexOutOfRange {
        channel: Channel,
        index: usize,
        len: usize,
    },
}

/// Result type for core operations
pub type EveResult<T> = Result<T, EveError>;
