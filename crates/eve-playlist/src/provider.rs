//! Playlist providers

use std::path::{Path, PathBuf};

use eve_core::{Channel, Playlists};

use crate::{parse_document, PlaylistError, PlaylistResult};

/// Source of the playlist document
pub trait PlaylistProvider {
    /// Fetch and parse the playlists
    fn fetch(&self) -> PlaylistResult<Playlists>;

    /// Human readable origin, used in logs
    fn origin(&self) -> String;
}

/// Reads the document from a JSON file
#[derive(Clone, Debug)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileProvider { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlaylistProvider for JsonFileProvider {
    fn fetch(&self) -> PlaylistResult<Playlists> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| PlaylistError::Read {
            path: self.path.clone(),
            source,
        })?;
        parse_document(&text)
    }

    fn origin(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves playlists already in memory
#[derive(Clone, Debug, Default)]
pub struct StaticProvider {
    playlists: Playlists,
}

impl StaticProvider {
    pub fn new(playlists: Playlists) -> Self {
        StaticProvider { playlists }
    }
}

impl PlaylistProvider for StaticProvider {
    fn fetch(&self) -> PlaylistResult<Playlists> {
        Ok(self.playlists.clone())
    }

    fn origin(&self) -> String {
        "static".to_string()
    }
}

/// Fetch playlists, degrading to empty lists on failure.
///
/// A failed load never takes the page down: both channels simply have
/// nothing to advance through.
pub fn load_or_empty(provider: &dyn PlaylistProvider) -> Playlists {
    match provider.fetch() {
        Ok(playlists) => {
            for channel in Channel::ALL {
                if playlists.get(channel).is_empty() {
                    tracing::warn!(%channel, "playlist is empty, playback disabled for channel");
                }
            }
            tracing::info!(origin = %provider.origin(), "playlists loaded");
            playlists
        }
        Err(e) => {
            tracing::error!(origin = %provider.origin(), error = %e, "failed to load playlists");
            Playlists::empty()
        }
    }
}
