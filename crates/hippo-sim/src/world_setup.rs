//! Entity spawn factories for building host worlds.
//!
//! Creates models, links and joints with the component bundles the host
//! would provide. Joint state and wrench command components are left out on
//! purpose: the plugins create them when they resolve.

use glam::DVec3;
use hecs::{Entity, World};

use hippo_core::components::*;
use hippo_core::types::Pose;

/// Spawn a model root entity.
pub fn spawn_model(world: &mut World, name: &str) -> Entity {
    world.spawn((Model, Name(name.to_string())))
}

/// Spawn a link of `model` at the given world pose.
pub fn spawn_link(world: &mut World, model: &str, name: &str, pose: Pose) -> Entity {
    world.spawn((
        Link,
        Name(name.to_string()),
        ModelName(model.to_string()),
        WorldPose(pose),
    ))
}

/// Spawn a single-axis joint of `model` whose parent is `parent_link`.
pub fn spawn_revolute_joint(
    world: &mut World,
    model: &str,
    name: &str,
    parent_link: &str,
) -> Entity {
    world.spawn((
        Joint,
        Name(name.to_string()),
        ModelName(model.to_string()),
        ParentLinkName(parent_link.to_string()),
    ))
}

/// Spawn a vehicle with a `base_link` at `pose` and `thruster_count`
/// propellers named `thruster_<i>` on joints `thruster_joint_<i>`, spread
/// along the vehicle's Y axis and pointing forward.
pub fn spawn_vehicle(world: &mut World, name: &str, pose: Pose, thruster_count: usize) -> Entity {
    let root = spawn_model(world, name);
    spawn_link(world, name, "base_link", pose);
    for i in 0..thruster_count {
        let offset = DVec3::new(-0.2, 0.1 * i as f64, 0.0);
        let thruster_pose = pose * Pose::from_translation(offset);
        spawn_link(world, name, &format!("thruster_{i}"), thruster_pose);
        spawn_revolute_joint(world, name, &format!("thruster_joint_{i}"), "base_link");
    }
    root
}

/// Spawn a detectable target model with a single `base_link`.
pub fn spawn_target(world: &mut World, name: &str, position: DVec3) -> Entity {
    spawn_model(world, name);
    spawn_link(world, name, "base_link", Pose::from_translation(position))
}
