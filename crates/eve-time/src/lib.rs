//! EVE Time - Timers and clocks for the playback sequencer
//!
//! This crate implements:
//! - Timer tokens: a timer kind plus a generation, so stale expiries are detectable
//! - The `Scheduler` seam used by the controller to arm and cancel timers
//! - A deterministic timer queue driven by a simulated clock
//! - A wall clock mapping real elapsed time onto SimTime

pub mod clock;
pub mod queue;
pub mod timer;

pub use clock::*;
pub use queue::*;
pub use timer::*;
