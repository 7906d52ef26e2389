//! Visibility and distance of a target as seen from the sensor frame.
//!
//! A target is visible when its azimuth in the sensor's horizontal plane
//! lies within half the field of view, the full 3D angle off the sensor's
//! forward (+X) axis is within the maximum viewing angle, and it is no
//! farther than the maximum detection distance. All limits are inclusive.

use glam::DVec3;

use hippo_core::config::RangeSensorConfig;
use hippo_core::types::Pose;

/// Below this distance the direction to the target is undefined and the
/// target is treated as dead ahead.
const MIN_DIRECTION_LENGTH: f64 = 1e-12;

/// Angular and distance limits, angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewLimits {
    pub fov_half_angle: f64,
    pub max_viewing_angle: f64,
    pub max_distance: f64,
}

impl ViewLimits {
    pub fn from_config(config: &RangeSensorConfig) -> Self {
        Self {
            fov_half_angle: config.fov_half_angle(),
            max_viewing_angle: config.max_viewing_angle_rad(),
            max_distance: config.max_detection_distance,
        }
    }
}

/// Inclusive limit check shared by every stage.
pub fn within_limit(value: f64, limit: f64) -> bool {
    value <= limit
}

/// Angle of `relative` in the sensor's XY plane, measured from +X.
pub fn azimuth(relative: DVec3) -> f64 {
    relative.y.atan2(relative.x)
}

/// Angle between the sensor's +X axis and `relative`.
pub fn viewing_angle(relative: DVec3) -> f64 {
    let length = relative.length();
    if length < MIN_DIRECTION_LENGTH {
        return 0.0;
    }
    (relative.x / length).clamp(-1.0, 1.0).acos()
}

/// Distance to a target given its position in the sensor frame, or `None`
/// when it is outside the view cone or range.
pub fn range_in_sensor_frame(relative: DVec3, limits: &ViewLimits) -> Option<f64> {
    if !within_limit(azimuth(relative).abs(), limits.fov_half_angle) {
        return None;
    }
    if !within_limit(viewing_angle(relative), limits.max_viewing_angle) {
        return None;
    }
    let distance = relative.length();
    within_limit(distance, limits.max_distance).then_some(distance)
}

/// Distance from the sensor to the target, or `None` when not visible.
pub fn evaluate(sensor_pose: &Pose, target_pose: &Pose, limits: &ViewLimits) -> Option<f64> {
    let relative = sensor_pose.inverse_transform_point(target_pose.position);
    range_in_sensor_frame(relative, limits)
}
