//! Fuzz target for playlist document parsing
//!
//! Arbitrary text must either parse into playlists whose entries all carry
//! media, or fail with an error. Never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;

use eve_core::Channel;
use eve_playlist::parse_document;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(playlists) = parse_document(text) {
        for channel in Channel::ALL {
            let list = playlists.get(channel);
            for entry in list.entries() {
                assert!(!entry.media.is_empty());
                assert!(entry.extra.as_deref() != Some(""));
            }
            if let Some(last) = list.len().checked_sub(1) {
                assert_eq!(list.next_index(last), Some(0));
            }
        }
    }
});
