//! Playlist document parsing

use serde::Deserialize;

use eve_core::{Channel, Playlist, PlaylistEntry, Playlists};

use crate::{PlaylistError, PlaylistResult};

/// Fields an entry may carry: media, headline, subtext, extra
const MAX_ENTRY_FIELDS: usize = 4;

/// Document as it appears on the wire. Unknown persona keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(default)]
    eva: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    eve: Option<Vec<Vec<Option<String>>>>,
}

impl RawDocument {
    fn take(&mut self, channel: Channel) -> Option<Vec<Vec<Option<String>>>> {
        match channel {
            Channel::Primary => self.eva.take(),
            Channel::Secondary => self.eve.take(),
        }
    }
}

/// Parse a playlist document from JSON text
pub fn parse_document(json: &str) -> PlaylistResult<Playlists> {
    let mut raw: RawDocument = serde_json::from_str(json)?;

    let primary = convert_list(Channel::Primary, raw.take(Channel::Primary))?;
    let secondary = convert_list(Channel::Secondary, raw.take(Channel::Secondary))?;

    tracing::debug!(
        eva = primary.len(),
        eve = secondary.len(),
        "playlist document parsed"
    );
    Ok(Playlists::new(primary, secondary))
}

fn convert_list(channel: Channel, raw: Option<Vec<Vec<Option<String>>>>) -> PlaylistResult<Playlist> {
    let Some(raw) = raw else {
        return Ok(Playlist::default());
    };

    raw.into_iter()
        .enumerate()
        .map(|(index, fields)| convert_entry(channel, index, fields))
        .collect::<PlaylistResult<Vec<_>>>()
        .map(Playlist::new)
}

fn convert_entry(channel: Channel, index: usize, fields: Vec<Option<String>>) -> PlaylistResult<PlaylistEntry> {
    if fields.is_empty() || fields.len() > MAX_ENTRY_FIELDS {
        return Err(PlaylistError::EntryArity {
            persona: channel.persona_key().to_string(),
            index,
            len: fields.len(),
        });
    }

    let mut fields = fields.into_iter();
    let media = fields
        .next()
        .flatten()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| PlaylistError::MissingMedia {
            persona: channel.persona_key().to_string(),
            index,
        })?;

    Ok(PlaylistEntry {
        media,
        headline: fields.next().flatten().unwrap_or_default(),
        subtext: fields.next().flatten().unwrap_or_default(),
        extra: fields.next().flatten().filter(|e| !e.is_empty()),
    })
}
