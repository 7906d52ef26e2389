//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Spin sense of the thruster motor, as seen from behind the propeller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurningDirection {
    Cw,
    #[default]
    Ccw,
}

impl TurningDirection {
    /// Sign applied to the reaction torque.
    pub const fn sign(self) -> f64 {
        match self {
            TurningDirection::Cw => 1.0,
            TurningDirection::Ccw => -1.0,
        }
    }
}

/// Blade pitch sense of the propeller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropellerDirection {
    Cw,
    #[default]
    Ccw,
}

impl PropellerDirection {
    /// Sign applied to the thrust along the thruster's local X axis.
    pub const fn sign(self) -> f64 {
        match self {
            PropellerDirection::Cw => -1.0,
            PropellerDirection::Ccw => 1.0,
        }
    }
}

/// Seed source for a sensor's private random generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RngSeed {
    /// Seed from operating system entropy.
    #[default]
    Entropy,
    /// Fixed seed for reproducible runs.
    Fixed(u64),
}
