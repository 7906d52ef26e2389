//! Simulation models for the hippo thruster and range sensor plugins.
//!
//! The models are pure computations over supplied state: a lag filter,
//! a quadratic thrust curve, frame transforms, range geometry and a
//! dropout/noise model. The plugins bind them to a host world through
//! the [`host::WorldAccess`] capability trait; `SimulationEngine` is a
//! headless host built on a hecs world.

pub mod engine;
pub mod filter;
pub mod frame;
pub mod gate;
pub mod host;
pub mod range_sensor;
pub mod thruster;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use hippo_core as core;

#[cfg(test)]
mod tests;
