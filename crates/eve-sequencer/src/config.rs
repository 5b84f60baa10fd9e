//! Sequencer configuration

use std::time::Duration;

use eve_core::PlaylistEntry;

/// Sequencer configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequencerConfig {
    /// Curtain transition before the caption is revealed
    pub transition_delay: Duration,
    /// Time the caption is shown before playback starts
    pub read_delay: Duration,
    /// Prefix joined to each entry's media reference
    pub media_base_path: String,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        SequencerConfig {
            transition_delay: Duration::from_millis(1000),
            read_delay: Duration::from_millis(6000),
            media_base_path: "public/bg/video/".to_string(),
        }
    }
}

impl SequencerConfig {
    /// Full media URL for an entry
    pub fn media_url(&self, entry: &PlaylistEntry) -> String {
        format!("{}{}", self.media_base_path, entry.media)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_url() {
        let config = SequencerConfig::default();
        let entry = PlaylistEntry::new("intro.mp4", "H", "S");
        assert_eq!(config.media_url(&entry), "public/bg/video/intro.mp4");
    }
}
