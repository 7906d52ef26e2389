//! Fundamental geometric and simulation types.

use std::ops::{Add, AddAssign, Mul};
use std::time::Duration;

use glam::{DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

/// Rigid transform: position plus orientation, expressed in a parent frame
/// (usually the world).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: DVec3,
    pub rotation: DQuat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    pub fn new(position: DVec3, rotation: DQuat) -> Self {
        Self { position, rotation }
    }

    pub fn from_translation(position: DVec3) -> Self {
        Self {
            position,
            rotation: DQuat::IDENTITY,
        }
    }

    /// Build a pose from a translation and roll/pitch/yaw angles in radians.
    /// Rotations are applied about the fixed X, Y, Z axes in that order.
    pub fn from_translation_rpy(position: DVec3, rpy: DVec3) -> Self {
        Self {
            position,
            rotation: DQuat::from_euler(EulerRot::ZYX, rpy.z, rpy.y, rpy.x),
        }
    }

    /// Inverse transform, so that `pose.inverse() * pose` is the identity.
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            position: -(rotation * self.position),
            rotation,
        }
    }

    /// Map a point from this pose's local frame into the parent frame.
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.position + self.rotation * point
    }

    /// Map a point from the parent frame into this pose's local frame.
    pub fn inverse_transform_point(&self, point: DVec3) -> DVec3 {
        self.rotation.inverse() * (point - self.position)
    }
}

/// Pose composition: `a * b` expresses `b` (given relative to `a`) in the
/// frame `a` is expressed in.
impl Mul for Pose {
    type Output = Pose;

    fn mul(self, rhs: Pose) -> Pose {
        Pose {
            position: self.transform_point(rhs.position),
            rotation: (self.rotation * rhs.rotation).normalize(),
        }
    }
}

/// Combined force and torque acting on a rigid body (world frame).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Wrench {
    pub force: DVec3,
    pub torque: DVec3,
}

impl Wrench {
    pub const ZERO: Self = Self {
        force: DVec3::ZERO,
        torque: DVec3::ZERO,
    };

    pub fn new(force: DVec3, torque: DVec3) -> Self {
        Self { force, torque }
    }

    pub fn from_force(force: DVec3) -> Self {
        Self {
            force,
            torque: DVec3::ZERO,
        }
    }

    pub fn from_torque(torque: DVec3) -> Self {
        Self {
            force: DVec3::ZERO,
            torque,
        }
    }
}

impl Add for Wrench {
    type Output = Wrench;

    fn add(self, rhs: Wrench) -> Wrench {
        Wrench {
            force: self.force + rhs.force,
            torque: self.torque + rhs.torque,
        }
    }
}

impl AddAssign for Wrench {
    fn add_assign(&mut self, rhs: Wrench) {
        self.force += rhs.force;
        self.torque += rhs.torque;
    }
}

/// Simulation time tracking. The host owns the clock; models only read it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time.
    pub elapsed: Duration,
}

impl SimTime {
    /// Elapsed simulation time in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Advance by one tick of length `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.tick += 1;
        self.elapsed += dt;
    }
}
