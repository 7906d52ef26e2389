//! Frame transforms for wrenches computed in a thruster's local frame.
//!
//! The thrust acts on the thruster link itself and is rotated into the
//! world by the link's own orientation. The reaction torque acts on the
//! parent body: it is first expressed in the parent's frame through the
//! relative pose `parent⁻¹ · own`, then rotated back into the world by the
//! parent's orientation.

use glam::DVec3;

use hippo_core::types::{Pose, Wrench};

/// World-frame contributions of one actuator for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActuatorEffect {
    /// Added to the thruster link's pending wrench.
    pub link: Wrench,
    /// Added to the parent link's pending wrench.
    pub parent: Wrench,
}

/// Pose of `own` relative to `parent`.
pub fn relative_pose(parent: &Pose, own: &Pose) -> Pose {
    parent.inverse() * *own
}

/// Rotate a local-frame force into the world frame.
pub fn force_to_world(own: &Pose, local_force: DVec3) -> DVec3 {
    own.rotation * local_force
}

/// Express a torque given in the thruster frame in the parent's local frame.
pub fn torque_to_parent(parent: &Pose, own: &Pose, local_torque: DVec3) -> DVec3 {
    relative_pose(parent, own).rotation * local_torque
}

/// Rotate a torque expressed in the parent frame into the world frame.
pub fn parent_torque_to_world(parent: &Pose, parent_torque: DVec3) -> DVec3 {
    parent.rotation * parent_torque
}

/// Full transform of a local force/torque pair into world-frame wrench
/// contributions for the thruster link and its parent.
pub fn actuator_effect(
    parent: &Pose,
    own: &Pose,
    local_force: DVec3,
    local_torque: DVec3,
) -> ActuatorEffect {
    let parent_torque = torque_to_parent(parent, own, local_torque);
    ActuatorEffect {
        link: Wrench::from_force(force_to_world(own, local_force)),
        parent: Wrench::from_torque(parent_torque_to_world(parent, parent_torque)),
    }
}
