//! Thruster plugin: binds a [`ThrusterDynamicsModel`] to a model's joint,
//! thruster link and parent link.
//!
//! Name resolution happens once in [`ThrusterPlugin::configure`]. Whatever
//! fails to resolve is reported once and that part of the plugin turns into
//! a no-op. Entities that disappear later are skipped tick by tick.

use std::time::Duration;

use hecs::Entity;

use hippo_core::config::ThrusterConfig;
use hippo_core::error::{HippoError, Result};
use hippo_core::messages::{Payload, Published};

use crate::frame::ActuatorEffect;
use crate::gate::PublicationGate;
use crate::host::WorldAccess;
use crate::thruster::dynamics::{ThrottleHandle, ThrusterDynamicsModel};

#[derive(Debug)]
pub struct ThrusterPlugin {
    model_name: String,
    config: ThrusterConfig,
    dynamics: ThrusterDynamicsModel,
    gate: PublicationGate,
    joint: Option<Entity>,
    link: Option<Entity>,
    parent_link: Option<Entity>,
}

impl ThrusterPlugin {
    /// Validates `config` before building the dynamics model.
    pub fn new(model_name: impl Into<String>, config: ThrusterConfig) -> Result<Self> {
        config.validate()?;
        let dynamics = ThrusterDynamicsModel::new(&config);
        let gate = PublicationGate::new(config.publish_period());
        Ok(Self {
            model_name: model_name.into(),
            config,
            dynamics,
            gate,
            joint: None,
            link: None,
            parent_link: None,
        })
    }

    pub fn config(&self) -> &ThrusterConfig {
        &self.config
    }

    pub fn dynamics(&self) -> &ThrusterDynamicsModel {
        &self.dynamics
    }

    pub fn throttle_handle(&self) -> ThrottleHandle {
        self.dynamics.throttle_handle()
    }

    /// True once joint, link and parent link have all been resolved.
    pub fn is_resolved(&self) -> bool {
        self.joint.is_some() && self.link.is_some() && self.parent_link.is_some()
    }

    fn topic(&self, base: &str) -> String {
        format!("/{}/{}_{}", self.model_name, base, self.config.thruster_number)
    }

    pub fn rpm_topic(&self) -> String {
        self.topic(&self.config.rpm_base_topic)
    }

    pub fn thrust_topic(&self) -> String {
        self.topic(&self.config.thrust_base_topic)
    }

    pub fn throttle_cmd_topic(&self) -> String {
        self.topic(&self.config.throttle_cmd_base_topic)
    }

    /// Resolve joint, thruster link and parent link by name and create the
    /// state components they need. Failures are logged once here.
    pub fn configure(&mut self, world: &mut impl WorldAccess) -> Result<()> {
        let result = self.resolve(world);
        match &result {
            Ok(()) => tracing::debug!(
                model = %self.model_name,
                joint = %self.config.joint,
                link = %self.config.link,
                thruster = self.config.thruster_number,
                "thruster configured"
            ),
            Err(error) => tracing::warn!(
                model = %self.model_name,
                %error,
                "thruster not fully resolved, unresolved parts stay inactive"
            ),
        }
        result
    }

    fn resolve(&mut self, world: &mut impl WorldAccess) -> Result<()> {
        if world.find_model(&self.model_name).is_none() {
            return Err(HippoError::ModelNotFound(self.model_name.clone()));
        }

        let joint = world
            .find_joint(&self.model_name, &self.config.joint)
            .ok_or_else(|| HippoError::joint_not_found(&self.model_name, &self.config.joint))?;
        world.ensure_joint_components(joint);
        self.joint = Some(joint);

        let link = world
            .find_link(&self.model_name, &self.config.link)
            .ok_or_else(|| HippoError::link_not_found(&self.model_name, &self.config.link))?;
        world.ensure_link_components(link, true);
        self.link = Some(link);

        let parent_name = world
            .parent_link_name(joint)
            .ok_or_else(|| HippoError::ParentLinkMissing(self.config.joint.clone()))?;
        let parent = world
            .find_link(&self.model_name, &parent_name)
            .ok_or_else(|| HippoError::link_not_found(&self.model_name, &parent_name))?;
        world.ensure_link_components(parent, true);
        self.parent_link = Some(parent);

        Ok(())
    }

    /// Per-tick physics: command timeout, rotor lag, joint velocity command
    /// and the thrust/torque wrench.
    pub fn pre_update(&mut self, world: &mut impl WorldAccess, now: Duration, dt: Duration) {
        self.dynamics.check_command_timeout(now);
        let velocity = self.dynamics.update(dt.as_secs_f64());

        if let Some(joint) = self.joint {
            if world.has_entity(joint) {
                world.set_joint_velocity_cmd(joint, velocity / self.config.rpm_scaler);
            }
        }

        self.apply_wrench(world);
    }

    fn apply_wrench(&mut self, world: &mut impl WorldAccess) -> Option<ActuatorEffect> {
        let link = self.link?;
        let parent = self.parent_link?;
        if !world.has_entity(link) || !world.has_entity(parent) {
            return None;
        }
        let own_pose = world.world_pose(link)?;
        let parent_pose = world.world_pose(parent)?;

        let effect = self.dynamics.apply_effect(&parent_pose, &own_pose);
        world.add_wrench(link, effect.link);
        world.add_wrench(parent, effect.parent);
        Some(effect)
    }

    /// Rotor velocity read back from the joint (rad/s). Zero when the joint
    /// or its velocity is unavailable.
    pub fn measured_rotor_velocity(&self, world: &impl WorldAccess) -> f64 {
        self.joint
            .and_then(|joint| world.joint_velocity(joint))
            .map_or(0.0, |v| v * self.config.rpm_scaler)
    }

    /// Rate-gated telemetry: rotor velocity and thrust.
    pub fn post_update(&mut self, world: &impl WorldAccess, now: Duration) -> Vec<Published> {
        if !self.gate.try_fire(now) {
            return Vec::new();
        }
        let rpm = self.measured_rotor_velocity(world);
        let thrust = self.dynamics.force().x;
        tracing::trace!(model = %self.model_name, rpm, thrust, "thruster telemetry");
        vec![
            Published::new(self.rpm_topic(), Payload::Rpm { data: rpm }),
            Published::new(self.thrust_topic(), Payload::Thrust { data: thrust }),
        ]
    }
}
