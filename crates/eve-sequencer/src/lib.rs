//! EVE Sequencer - Cinematic video sequencing state machine
//!
//! Drives the two persona video channels through:
//! 1. Transitioning - curtain closes, caption hidden
//! 2. Reading - caption shown, read timer armed
//! 3. Playing - media running, curtain open
//! 4. Paused - visitor or visibility paused the sequence
//!
//! Every transition is a function of the current `SequencerState` that
//! returns the next state together with a list of `Effect`s for the
//! presentation surface, the media elements and the timer scheduler.
//! Nothing here touches a real surface or clock.

pub mod config;
pub mod effect;
pub mod icon;
pub mod sequencer;
pub mod state;

pub use config::*;
pub use effect::*;
pub use icon::*;
pub use sequencer::*;
pub use state::*;
