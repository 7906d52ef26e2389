//! Propeller thruster: rotor lag, quadratic thrust curve and the plugin
//! that binds them to a host joint and links.

pub mod dynamics;
pub mod plugin;

pub use dynamics::{ThrottleHandle, ThrustCurve, ThrusterDynamicsModel};
pub use plugin::ThrusterPlugin;
