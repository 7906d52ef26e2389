//! Rotor dynamics and thrust/torque response of a propeller thruster.
//!
//! The commanded rotor velocity (setpoint) and the lag filter state form
//! the only state shared between threads: throttle commands arrive through
//! a [`ThrottleHandle`] from the transport thread while the simulation
//! thread advances the filter. Both sides go through one mutex, held only
//! for the read-modify-write.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use glam::DVec3;

use hippo_core::config::ThrusterConfig;
use hippo_core::enums::{PropellerDirection, TurningDirection};
use hippo_core::types::Pose;

use crate::filter::LagFilter;
use crate::frame::{self, ActuatorEffect};

/// Quadratic thrust response over propeller revolutions per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThrustCurve {
    pub constant: f64,
    pub linear: f64,
    pub quadratic: f64,
}

impl ThrustCurve {
    /// `a·s² + b·s + c` for `s` revolutions per second, clamped to be
    /// non-negative.
    pub fn magnitude(&self, revs_per_sec: f64) -> f64 {
        let s = revs_per_sec;
        (self.quadratic * s * s + self.linear * s + self.constant).max(0.0)
    }
}

/// Map a throttle command in `[-1, 1]` to a rotor velocity setpoint.
/// Values outside the range saturate.
pub fn throttle_to_velocity(throttle: f64, maximum_rpm: f64) -> f64 {
    throttle.clamp(-1.0, 1.0) * maximum_rpm
}

#[derive(Debug)]
struct RotorState {
    setpoint: f64,
    filter: LagFilter,
    /// Set by the command side, consumed by the timeout check.
    command_received: bool,
}

fn lock(state: &Mutex<RotorState>) -> MutexGuard<'_, RotorState> {
    // Plain numeric state stays consistent even if a holder panicked.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Command intake for one thruster. Cheap to clone and `Send`, so it can be
/// handed to whatever thread receives throttle messages.
#[derive(Debug, Clone)]
pub struct ThrottleHandle {
    state: Arc<Mutex<RotorState>>,
    maximum_rpm: f64,
}

impl ThrottleHandle {
    /// Set the rotor setpoint from a normalised throttle command.
    /// Non-finite commands are ignored.
    pub fn send(&self, throttle: f64) -> bool {
        if !throttle.is_finite() {
            tracing::warn!(throttle, "ignoring non-finite throttle command");
            return false;
        }
        self.set_velocity(throttle_to_velocity(throttle, self.maximum_rpm))
    }

    /// Set the rotor setpoint directly in rad/s.
    pub fn set_velocity(&self, velocity: f64) -> bool {
        if !velocity.is_finite() {
            return false;
        }
        let mut state = lock(&self.state);
        state.setpoint = velocity;
        state.command_received = true;
        true
    }

    pub fn setpoint(&self) -> f64 {
        lock(&self.state).setpoint
    }
}

/// Rotor lag plus thrust and torque response of one thruster.
#[derive(Debug)]
pub struct ThrusterDynamicsModel {
    curve: ThrustCurve,
    torque_coeff: f64,
    turning_direction: TurningDirection,
    propeller_direction: PropellerDirection,
    command_timeout: Option<Duration>,
    handle: ThrottleHandle,
    last_command: Duration,
    /// Filtered rotor velocity as of the last update (rad/s).
    rotor_velocity: f64,
}

impl ThrusterDynamicsModel {
    pub fn new(config: &ThrusterConfig) -> Self {
        let state = RotorState {
            setpoint: 0.0,
            filter: LagFilter::new(config.time_constant_up, config.time_constant_down, 0.0),
            command_received: false,
        };
        let command_timeout =
            (config.command_timeout_secs > 0.0).then(|| config.command_timeout());
        Self {
            curve: ThrustCurve {
                constant: config.constant_coeff,
                linear: config.linear_coeff,
                quadratic: config.quadratic_coeff,
            },
            torque_coeff: config.torque_coeff,
            turning_direction: config.turning_direction,
            propeller_direction: config.propeller_direction,
            command_timeout,
            handle: ThrottleHandle {
                state: Arc::new(Mutex::new(state)),
                maximum_rpm: config.maximum_rpm,
            },
            last_command: Duration::ZERO,
            rotor_velocity: 0.0,
        }
    }

    /// Handle for the command thread.
    pub fn throttle_handle(&self) -> ThrottleHandle {
        self.handle.clone()
    }

    pub fn set_throttle_command(&self, throttle: f64) -> bool {
        self.handle.send(throttle)
    }

    pub fn set_velocity_setpoint(&self, velocity: f64) -> bool {
        self.handle.set_velocity(velocity)
    }

    pub fn setpoint(&self) -> f64 {
        self.handle.setpoint()
    }

    /// Stamp fresh commands with the current sim time and zero the setpoint
    /// once commands have been stale for longer than the timeout. Returns
    /// true when the setpoint was forced to zero.
    pub fn check_command_timeout(&mut self, now: Duration) -> bool {
        let Some(timeout) = self.command_timeout else {
            return false;
        };
        let mut state = lock(&self.handle.state);
        if state.command_received {
            state.command_received = false;
            self.last_command = now;
            return false;
        }
        if state.setpoint != 0.0 && now.saturating_sub(self.last_command) > timeout {
            state.setpoint = 0.0;
            tracing::debug!(
                stale_secs = now.saturating_sub(self.last_command).as_secs_f64(),
                "throttle command timed out, stopping rotor"
            );
            return true;
        }
        false
    }

    /// Advance the rotor velocity by `dt` seconds.
    pub fn update(&mut self, dt: f64) -> f64 {
        let velocity = {
            let mut state = lock(&self.handle.state);
            let setpoint = state.setpoint;
            state.filter.update(setpoint, dt)
        };
        self.rotor_velocity = velocity;
        velocity
    }

    /// Filtered rotor velocity (rad/s).
    pub fn rotor_velocity(&self) -> f64 {
        self.rotor_velocity
    }

    /// Thrust along the local X axis.
    pub fn force(&self) -> DVec3 {
        let revs_per_sec = self.rotor_velocity.abs() / std::f64::consts::TAU;
        let mut thrust = self.curve.magnitude(revs_per_sec);
        if self.rotor_velocity < 0.0 {
            thrust = -thrust;
        }
        DVec3::new(self.propeller_direction.sign() * thrust, 0.0, 0.0)
    }

    /// Reaction torque about the local X axis.
    pub fn torque(&self) -> DVec3 {
        self.turning_direction.sign()
            * self.propeller_direction.sign()
            * self.force()
            * self.torque_coeff
    }

    /// World-frame wrench contributions for the given parent and thruster
    /// poses.
    pub fn apply_effect(&self, parent_pose: &Pose, own_pose: &Pose) -> ActuatorEffect {
        frame::actuator_effect(parent_pose, own_pose, self.force(), self.torque())
    }
}
