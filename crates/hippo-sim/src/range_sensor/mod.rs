//! Ranging sensor: view geometry, dropout and noise, and the plugin that
//! evaluates them against a list of target models.

pub mod dropout;
pub mod geometry;
pub mod plugin;

pub use dropout::DropoutNoiseModel;
pub use geometry::ViewLimits;
pub use plugin::RangeSensorPlugin;
