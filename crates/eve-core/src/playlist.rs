//! Playlist data model
//!
//! A playlist is the ordered list of clips shown on one channel. Each entry
//! carries the media reference plus the caption shown during the reading
//! phase. Playlists are loaded once and never mutated afterwards.

use crate::{Channel, ChannelMap, EveError, EveResult};

/// One clip with its caption
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PlaylistEntry {
    /// Media file name, relative to the configured base path
    pub media: String,
    pub headline: String,
    pub subtext: String,
    /// Optional third caption line
    pub extra: Option<String>,
}

impl PlaylistEntry {
    pub fn new(media: impl Into<String>, headline: impl Into<String>, subtext: impl Into<String>) -> Self {
        PlaylistEntry {
            media: media.into(),
            headline: headline.into(),
            subtext: subtext.into(),
            extra: None,
        }
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Extra line, empty when absent
    pub fn extra_text(&self) -> &str {
        self.extra.as_deref().unwrap_or("")
    }
}

/// Ordered clips for a single channel
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Playlist {
    entries: Vec<PlaylistEntry>,
}

impl Playlist {
    pub fn new(entries: Vec<PlaylistEntry>) -> Self {
        Playlist { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlaylistEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    /// Index following `index`, wrapping to 0 at the end.
    /// None when the playlist is empty.
    pub fn next_index(&self, index: usize) -> Option<usize> {
        if self.entries.is_empty() {
            None
        } else {
            Some((index + 1) % self.entries.len())
        }
    }
}

impl FromIterator<PlaylistEntry> for Playlist {
    fn from_iter<I: IntoIterator<Item = PlaylistEntry>>(iter: I) -> Self {
        Playlist::new(iter.into_iter().collect())
    }
}

/// Both channels' playlists
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Playlists {
    lists: ChannelMap<Playlist>,
}

impl Playlists {
    pub fn new(primary: Playlist, secondary: Playlist) -> Self {
        Playlists {
            lists: ChannelMap::new(primary, secondary),
        }
    }

    /// No clips on either channel
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, channel: Channel) -> &Playlist {
        &self.lists[channel]
    }

    /// Look up an entry, reporting why it is missing
    pub fn entry(&self, channel: Channel, index: usize) -> EveResult<&PlaylistEntry> {
        let list = &self.lists[channel];
        if list.is_empty() {
            return Err(EveError::EmptyPlaylist(channel));
        }
        list.get(index).ok_or(EveError::IndexOutOfRange {
            channel,
            index,
            len: list.len(),
        })
    }
}
