//! ECS components for hecs entities.
//!
//! Components are plain data structs. They mirror the attributes a rigid
//! body host exposes: names, poses, joint state and pending wrenches.

use serde::{Deserialize, Serialize};

use crate::types::{Pose, Wrench};

/// Entity name, unique within its model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

/// Marks an entity as a model (the root a plugin is attached to).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Model;

/// Marks an entity as a rigid link.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Link;

/// Marks an entity as a joint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Joint;

/// Name of the model a link or joint belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelName(pub String);

/// Pose of a link in the world frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPose(pub Pose);

/// Measured joint velocity, one entry per axis (rad/s).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointVelocity(pub Vec<f64>);

/// Commanded joint velocity, one entry per axis (rad/s).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointVelocityCmd(pub Vec<f64>);

/// Name of the link on the parent side of a joint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentLinkName(pub String);

/// Wrench queued for the next physics step, in the world frame.
/// Several actuators may add into the same link's command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalWrenchCmd(pub Wrench);
