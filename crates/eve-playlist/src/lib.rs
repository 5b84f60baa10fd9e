//! EVE Playlist - Loading the per-persona clip lists
//!
//! The page fetches one JSON document at startup:
//!
//! ```json
//! { "eva": [["clip.mp4", "Headline", "Subtext", "Extra"]], "eve": [] }
//! ```
//!
//! Each entry is an array of one to four strings. A missing or empty list
//! disables playback on that channel; a document that fails to load leaves
//! both channels empty.

pub mod document;
pub mod error;
pub mod provider;

pub use document::*;
pub use error::*;
pub use provider::*;
