//! EVE Core - Fundamental types shared by the landing page crates
//!
//! This crate defines:
//! - Channels (the two fixed persona video slots) and per-channel maps
//! - Playlists and their entries
//! - Virtual time (SimTime) used by timers and simulations
//! - Core error type

pub mod channel;
pub mod playlist;
pub mod time;
pub mod error;

pub use channel::*;
pub use playlist::*;
pub use time::*;
pub use error::*;
