//! EVE Test Harness - Simulation and chaos testing for the landing page
//!
//! This crate provides:
//! - A recording presentation surface
//! - A deterministic simulation of the controller on a virtual clock
//! - Scripted visitor scenarios
//! - A seeded chaos visitor with invariant checking

pub mod chaos;
pub mod integration;
pub mod simulation;
pub mod surface;

pub use chaos::*;
pub use integration::*;
pub use simulation::*;
pub use surface::*;

pub use eve_runtime::{MediaCallback, MediaEvent, MediaProfile, SimulatedMedia};
