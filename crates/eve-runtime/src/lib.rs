//! EVE Runtime - Controller and collaborators
//!
//! Wires the pure sequencer to the outside world:
//! 1. Owns the single `SequencerState`
//! 2. Applies transition effects to the presentation surface, media
//!    elements and timer scheduler
//! 3. Routes timer expiries and media callbacks back into the sequencer
//! 4. Restores and persists the visitor's persona, rotating the hero
//!    section until they choose
//!
//! Also hosts runtime configuration, logging setup and a headless media
//! backend for runs without a real player.

pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod media;
pub mod persona;
pub mod surface;

pub use config::*;
pub use controller::*;
pub use error::*;
pub use logging::*;
pub use media::*;
pub use persona::*;
pub use surface::*;
