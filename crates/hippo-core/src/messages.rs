//! Messages produced by the plugins for the host to transmit.
//!
//! Serialization and transport belong to the host; these are plain
//! serde-serializable payloads tagged with the topic they go out on.

use serde::{Deserialize, Serialize};

/// Range to a single target. `None` when the target is out of view,
/// out of range, missing from the world or the detection was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeMeasurement {
    pub id: i32,
    pub range: Option<f64>,
}

/// One batch of range measurements, in target list order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeMeasurementArray {
    /// Simulation time the batch was taken at (seconds).
    pub time_secs: f64,
    pub measurements: Vec<RangeMeasurement>,
}

impl RangeMeasurementArray {
    /// Measurements that carry a range.
    pub fn detections(&self) -> impl Iterator<Item = &RangeMeasurement> {
        self.measurements.iter().filter(|m| m.range.is_some())
    }
}

/// Published payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Payload {
    /// Rotor velocity read back from the joint (rad/s).
    Rpm { data: f64 },
    /// Thrust along the thruster axis (N).
    Thrust { data: f64 },
    Ranges(RangeMeasurementArray),
}

/// A payload addressed to a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Published {
    pub topic: String,
    pub payload: Payload,
}

impl Published {
    pub fn new(topic: impl Into<String>, payload: Payload) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }
}
