//! Range sensor plugin.
//!
//! At the configured update rate, evaluates every active target against the
//! sensor's view limits and emits one [`RangeMeasurementArray`]. Targets
//! that are out of view, missing from the world or dropped appear with no
//! range; inactive targets are left out of the batch.

use std::time::Duration;

use hecs::Entity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hippo_core::config::{RangeSensorConfig, TargetSpec};
use hippo_core::enums::RngSeed;
use hippo_core::error::{HippoError, Result};
use hippo_core::messages::{RangeMeasurement, RangeMeasurementArray};
use hippo_core::types::Pose;

use crate::gate::PublicationGate;
use crate::host::WorldAccess;
use crate::range_sensor::dropout::DropoutNoiseModel;
use crate::range_sensor::geometry::{self, ViewLimits};

#[derive(Debug)]
struct Target {
    spec: TargetSpec,
    link: Option<Entity>,
    reported_missing: bool,
}

#[derive(Debug)]
pub struct RangeSensorPlugin {
    model_name: String,
    config: RangeSensorConfig,
    limits: ViewLimits,
    mounting: Pose,
    noise: DropoutNoiseModel,
    rng: ChaCha8Rng,
    gate: PublicationGate,
    link: Option<Entity>,
    targets: Vec<Target>,
}

fn seeded_rng(seed: RngSeed) -> ChaCha8Rng {
    match seed {
        RngSeed::Entropy => ChaCha8Rng::from_entropy(),
        RngSeed::Fixed(seed) => ChaCha8Rng::seed_from_u64(seed),
    }
}

impl RangeSensorPlugin {
    pub fn new(model_name: impl Into<String>, config: RangeSensorConfig) -> Result<Self> {
        config.validate()?;
        let noise = DropoutNoiseModel::from_config(&config)?;
        let targets = config
            .target_models
            .iter()
            .cloned()
            .map(|spec| Target {
                spec,
                link: None,
                reported_missing: false,
            })
            .collect();
        Ok(Self {
            model_name: model_name.into(),
            limits: ViewLimits::from_config(&config),
            mounting: config.mounting_offset(),
            rng: seeded_rng(config.seed),
            gate: PublicationGate::new(config.update_period()),
            noise,
            link: None,
            targets,
            config,
        })
    }

    pub fn config(&self) -> &RangeSensorConfig {
        &self.config
    }

    pub fn limits(&self) -> &ViewLimits {
        &self.limits
    }

    pub fn ranges_topic(&self) -> String {
        format!("/{}/{}", self.model_name, self.config.ranges_base_topic)
    }

    /// Resolve the sensor link and the target links. A missing sensor link
    /// disables the plugin; missing targets are retried on every update.
    pub fn configure(&mut self, world: &mut impl WorldAccess) -> Result<()> {
        let result = self.resolve_link(world);
        if let Err(error) = &result {
            tracing::warn!(model = %self.model_name, %error, "range sensor inactive");
        } else {
            tracing::debug!(
                model = %self.model_name,
                link = %self.config.link,
                targets = self.targets.len(),
                "range sensor configured"
            );
        }
        self.resolve_targets(world);
        result
    }

    fn resolve_link(&mut self, world: &mut impl WorldAccess) -> Result<()> {
        if world.find_model(&self.model_name).is_none() {
            return Err(HippoError::ModelNotFound(self.model_name.clone()));
        }
        let link = world
            .find_link(&self.model_name, &self.config.link)
            .ok_or_else(|| HippoError::link_not_found(&self.model_name, &self.config.link))?;
        world.ensure_link_components(link, false);
        self.link = Some(link);
        Ok(())
    }

    fn resolve_targets(&mut self, world: &mut impl WorldAccess) {
        for target in self.targets.iter_mut().filter(|t| t.link.is_none()) {
            match world.find_link(&target.spec.name, &target.spec.link) {
                Some(link) => {
                    world.ensure_link_components(link, false);
                    target.link = Some(link);
                }
                None if !target.reported_missing => {
                    target.reported_missing = true;
                    tracing::warn!(
                        id = target.spec.id,
                        model = %target.spec.name,
                        link = %target.spec.link,
                        "range target not found, retrying silently"
                    );
                }
                None => {}
            }
        }
    }

    /// Enable or disable a target by id. Returns false for unknown ids.
    pub fn set_target_active(&mut self, id: i32, active: bool) -> bool {
        let mut found = false;
        for target in self.targets.iter_mut().filter(|t| t.spec.id == id) {
            target.spec.active = active;
            found = true;
        }
        found
    }

    /// World pose of the sensor frame (link pose composed with the mounting
    /// offset).
    pub fn sensor_pose(&self, world: &impl WorldAccess) -> Option<Pose> {
        let link = self.link?;
        if !world.has_entity(link) {
            return None;
        }
        world.world_pose(link).map(|pose| pose * self.mounting)
    }

    /// Noise-free range to the target with the given id.
    pub fn true_range(&self, world: &impl WorldAccess, id: i32) -> Option<f64> {
        let sensor_pose = self.sensor_pose(world)?;
        let target = self.targets.iter().find(|t| t.spec.id == id)?;
        Self::raw_range(world, &sensor_pose, target, &self.limits)
    }

    fn raw_range(
        world: &impl WorldAccess,
        sensor_pose: &Pose,
        target: &Target,
        limits: &ViewLimits,
    ) -> Option<f64> {
        let link = target.link?;
        if !world.has_entity(link) {
            return None;
        }
        let target_pose = world.world_pose(link)?;
        geometry::evaluate(sensor_pose, &target_pose, limits)
    }

    /// Produce a measurement batch when the publication period has elapsed.
    pub fn maybe_publish<W: WorldAccess>(
        &mut self,
        world: &mut W,
        now: Duration,
    ) -> Option<RangeMeasurementArray> {
        let sensor_pose = self.sensor_pose(&*world)?;
        if !self.gate.try_fire(now) {
            return None;
        }
        self.resolve_targets(world);
        let world = &*world;

        let mut measurements = Vec::with_capacity(self.targets.len());
        for target in self.targets.iter().filter(|t| t.spec.active) {
            let range = Self::raw_range(world, &sensor_pose, target, &self.limits)
                .and_then(|distance| self.noise.measure(distance, &mut self.rng));
            measurements.push(RangeMeasurement {
                id: target.spec.id,
                range,
            });
        }
        tracing::trace!(
            model = %self.model_name,
            count = measurements.len(),
            "publishing ranges"
        );
        Some(RangeMeasurementArray {
            time_secs: now.as_secs_f64(),
            measurements,
        })
    }
}
