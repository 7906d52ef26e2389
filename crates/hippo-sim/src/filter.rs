//! First-order lag with separate rising and falling time constants.
//!
//! Discretised exactly: `alpha = exp(-dt / tau)`,
//! `out = alpha * out + (1 - alpha) * setpoint`. For positive time
//! constants the output moves monotonically toward the setpoint and
//! never overshoots it.

use hippo_core::constants::MIN_DT;

#[derive(Debug, Clone, PartialEq)]
pub struct LagFilter {
    time_constant_up: f64,
    time_constant_down: f64,
    output: f64,
}

impl LagFilter {
    pub fn new(time_constant_up: f64, time_constant_down: f64, initial: f64) -> Self {
        Self {
            time_constant_up,
            time_constant_down,
            output: initial,
        }
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    /// Time constant that applies when moving from the current output toward
    /// `setpoint`.
    pub fn time_constant(&self, setpoint: f64) -> f64 {
        if setpoint > self.output {
            self.time_constant_up
        } else {
            self.time_constant_down
        }
    }

    /// Advance the filter by `dt` seconds toward `setpoint`.
    pub fn update(&mut self, setpoint: f64, dt: f64) -> f64 {
        if dt <= MIN_DT {
            return self.output;
        }
        let tau = self.time_constant(setpoint);
        if tau <= 0.0 {
            self.output = setpoint;
            return self.output;
        }
        let alpha = (-dt / tau).exp();
        self.output = alpha * self.output + (1.0 - alpha) * setpoint;
        self.output
    }
}
