//! Capability interface between the models and the host world.
//!
//! Plugins never touch host storage directly: they resolve names to opaque
//! entity handles once and then read poses and joint state, and write joint
//! commands and wrenches, through [`WorldAccess`]. The hecs implementation
//! below is the headless host used by the engine and the tests.

use hecs::{Entity, World};

use hippo_core::components::*;
use hippo_core::types::{Pose, Wrench};

/// Attribute access the plugins need from a rigid body host.
pub trait WorldAccess {
    /// Model entity with the given name.
    fn find_model(&self, model: &str) -> Option<Entity>;

    /// Link named `link` inside `model`.
    fn find_link(&self, model: &str, link: &str) -> Option<Entity>;

    /// Joint named `joint` inside `model`.
    fn find_joint(&self, model: &str, joint: &str) -> Option<Entity>;

    /// Name of the parent link of a joint.
    fn parent_link_name(&self, joint: Entity) -> Option<String>;

    /// Whether the entity still exists.
    fn has_entity(&self, entity: Entity) -> bool;

    /// World pose of a link, if it has one.
    fn world_pose(&self, link: Entity) -> Option<Pose>;

    /// First-axis velocity of a joint. `None` when the component is missing
    /// or empty.
    fn joint_velocity(&self, joint: Entity) -> Option<f64>;

    /// Command the first-axis velocity of a joint. Returns false when the
    /// joint has no (or an empty) velocity command.
    fn set_joint_velocity_cmd(&mut self, joint: Entity, velocity: f64) -> bool;

    /// Add a world-frame wrench to a link's pending wrench command.
    /// Returns false when the link carries no wrench command.
    fn add_wrench(&mut self, link: Entity, wrench: Wrench) -> bool;

    /// Create the joint state components when missing.
    fn ensure_joint_components(&mut self, joint: Entity);

    /// Create pose (and optionally wrench command) components when missing.
    fn ensure_link_components(&mut self, link: Entity, wrench: bool);
}

fn find_named<Marker: hecs::Component>(world: &World, model: &str, name: &str) -> Option<Entity> {
    let mut query = world.query::<(&Marker, &Name, &ModelName)>();
    query
        .iter()
        .find(|(_, (_, n, m))| n.0 == name && m.0 == model)
        .map(|(entity, _)| entity)
}

impl WorldAccess for World {
    fn find_model(&self, model: &str) -> Option<Entity> {
        let mut query = self.query::<(&Model, &Name)>();
        query
            .iter()
            .find(|(_, (_, name))| name.0 == model)
            .map(|(entity, _)| entity)
    }

    fn find_link(&self, model: &str, link: &str) -> Option<Entity> {
        find_named::<Link>(self, model, link)
    }

    fn find_joint(&self, model: &str, joint: &str) -> Option<Entity> {
        find_named::<Joint>(self, model, joint)
    }

    fn parent_link_name(&self, joint: Entity) -> Option<String> {
        self.get::<&ParentLinkName>(joint).ok().map(|p| p.0.clone())
    }

    fn has_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn world_pose(&self, link: Entity) -> Option<Pose> {
        self.get::<&WorldPose>(link).ok().map(|p| p.0)
    }

    fn joint_velocity(&self, joint: Entity) -> Option<f64> {
        self.get::<&JointVelocity>(joint)
            .ok()
            .and_then(|v| v.0.first().copied())
    }

    fn set_joint_velocity_cmd(&mut self, joint: Entity, velocity: f64) -> bool {
        match self.get::<&mut JointVelocityCmd>(joint) {
            Ok(mut cmd) => match cmd.0.first_mut() {
                Some(slot) => {
                    *slot = velocity;
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    fn add_wrench(&mut self, link: Entity, wrench: Wrench) -> bool {
        match self.get::<&mut ExternalWrenchCmd>(link) {
            Ok(mut cmd) => {
                cmd.0 += wrench;
                true
            }
            Err(_) => false,
        }
    }

    fn ensure_joint_components(&mut self, joint: Entity) {
        if self.get::<&JointVelocity>(joint).is_err() {
            let _ = self.insert_one(joint, JointVelocity(vec![0.0]));
        }
        if self.get::<&JointVelocityCmd>(joint).is_err() {
            let _ = self.insert_one(joint, JointVelocityCmd(vec![0.0]));
        }
    }

    fn ensure_link_components(&mut self, link: Entity, wrench: bool) {
        if self.get::<&WorldPose>(link).is_err() {
            let _ = self.insert_one(link, WorldPose::default());
        }
        if wrench && self.get::<&ExternalWrenchCmd>(link).is_err() {
            let _ = self.insert_one(link, ExternalWrenchCmd::default());
        }
    }
}
