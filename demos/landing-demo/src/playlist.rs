//! Built-in playlists for runs without a `urls.json`

use eve_core::{Playlist, PlaylistEntry, Playlists};

pub fn demo_playlists() -> Playlists {
    Playlists::new(
        Playlist::new(vec![
            PlaylistEntry::new("eva-intro.mp4", "Meet Eva", "Your research companion"),
            PlaylistEntry::new("eva-memory.mp4", "Eva remembers", "Context that carries over").with_extra("Beta"),
            PlaylistEntry::new("eva-voice.mp4", "Talk to Eva", "Natural voice, no wake word"),
        ]),
        Playlist::new(vec![
            PlaylistEntry::new("eve-intro.mp4", "Meet Eve", "Your creative partner"),
            PlaylistEntry::new("eve-studio.mp4", "Eve in the studio", "Sketch, compose, iterate"),
        ]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use eve_core::Channel;

    #[test]
    fn test_demo_playlists_cover_both_personas() {
        let lists = demo_playlists();
        assert_eq!(lists.get(Channel::Primary).len(), 3);
        assert_eq!(lists.get(Channel::Secondary).len(), 2);
        assert_eq!(lists.entry(Channel::Primary, 1).unwrap().extra_text(), "Beta");
    }
}
