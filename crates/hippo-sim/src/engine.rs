//! Headless host for the plugins.
//!
//! `SimulationEngine` owns the hecs world, the simulation clock and the
//! plugin instances. Each tick it runs the thrusters' physics, plays the
//! host's part for velocity-controlled joints, then collects thruster
//! telemetry and range batches into the returned outbox. Fully
//! deterministic for a given seed.

use std::time::Duration;

use hecs::World;
use serde::{Deserialize, Serialize};

use hippo_core::components::{ExternalWrenchCmd, JointVelocity, JointVelocityCmd};
use hippo_core::config::{RangeSensorConfig, ThrusterConfig};
use hippo_core::constants::TICK_RATE;
use hippo_core::enums::RngSeed;
use hippo_core::error::Result;
use hippo_core::messages::{Payload, Published};
use hippo_core::types::{SimTime, Wrench};

use crate::range_sensor::RangeSensorPlugin;
use crate::thruster::{ThrottleHandle, ThrusterPlugin};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Base seed for sensors that do not bring their own.
    pub seed: u64,
    /// Host tick rate (Hz).
    pub tick_rate: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate: TICK_RATE,
        }
    }
}

/// Independent per-instance seed derived from the engine seed.
fn instance_seed(base: u64, index: usize) -> u64 {
    base ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// The simulation engine. Owns the ECS world and all plugin instances.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    dt: Duration,
    seed: u64,
    thrusters: Vec<ThrusterPlugin>,
    range_sensors: Vec<RangeSensorPlugin>,
}

impl SimulationEngine {
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            dt: Duration::from_secs_f64(1.0 / config.tick_rate.max(1) as f64),
            seed: config.seed,
            thrusters: Vec::new(),
            range_sensors: Vec::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn dt(&self) -> Duration {
        self.dt
    }

    pub fn thrusters(&self) -> &[ThrusterPlugin] {
        &self.thrusters
    }

    pub fn range_sensors(&self) -> &[RangeSensorPlugin] {
        &self.range_sensors
    }

    /// Attach a thruster to `model`. An invalid config is rejected. The
    /// plugin is kept even when names fail to resolve; it then stays inert.
    /// The returned handle accepts throttle commands from any thread.
    pub fn add_thruster(&mut self, model: &str, config: ThrusterConfig) -> Result<ThrottleHandle> {
        let mut plugin = ThrusterPlugin::new(model, config)?;
        // Failure is already reported by the plugin.
        let _ = plugin.configure(&mut self.world);
        let handle = plugin.throttle_handle();
        self.thrusters.push(plugin);
        Ok(handle)
    }

    /// Attach a range sensor to `model`. Sensors without an explicit seed get
    /// one derived from the engine seed. Returns the sensor index.
    pub fn add_range_sensor(&mut self, model: &str, mut config: RangeSensorConfig) -> Result<usize> {
        let index = self.range_sensors.len();
        if config.seed == RngSeed::Entropy {
            config.seed = RngSeed::Fixed(instance_seed(self.seed, index));
        }
        let mut plugin = RangeSensorPlugin::new(model, config)?;
        let _ = plugin.configure(&mut self.world);
        self.range_sensors.push(plugin);
        Ok(index)
    }

    /// Pending wrench on a link, as left by the last tick.
    pub fn pending_wrench(&self, link: hecs::Entity) -> Option<Wrench> {
        self.world.get::<&ExternalWrenchCmd>(link).ok().map(|w| w.0)
    }

    /// Advance by one tick and return everything published during it.
    pub fn tick(&mut self) -> Vec<Published> {
        self.time.advance(self.dt);
        let now = self.time.elapsed;
        let mut outbox = Vec::new();

        // The host consumed last tick's wrenches.
        for (_entity, wrench) in self.world.query_mut::<&mut ExternalWrenchCmd>() {
            wrench.0 = Wrench::ZERO;
        }

        for thruster in &mut self.thrusters {
            thruster.pre_update(&mut self.world, now, self.dt);
        }

        self.step_joints();

        for thruster in &mut self.thrusters {
            outbox.extend(thruster.post_update(&self.world, now));
        }

        for sensor in &mut self.range_sensors {
            if let Some(batch) = sensor.maybe_publish(&mut self.world, now) {
                outbox.push(Published::new(sensor.ranges_topic(), Payload::Ranges(batch)));
            }
        }

        outbox
    }

    /// Velocity-controlled joints reach their commanded velocity within one
    /// step.
    fn step_joints(&mut self) {
        for (_entity, (cmd, velocity)) in self
            .world
            .query_mut::<(&JointVelocityCmd, &mut JointVelocity)>()
        {
            velocity.0.clone_from(&cmd.0);
        }
    }
}
