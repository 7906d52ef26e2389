//! Plugin configuration.
//!
//! Configs are immutable after load. Every field has a default matching the
//! stock plugin parameters, so a config document only lists what it
//! overrides. Angles are given in degrees and converted on access.

use std::time::Duration;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{PropellerDirection, RngSeed, TurningDirection};
use crate::error::{HippoError, Result};
use crate::types::Pose;

/// Convert a publication rate (Hz) into a period. Non-positive rates
/// publish every tick. Rates too small for a `Duration` saturate.
pub fn rate_to_period(rate_hz: f64) -> Duration {
    if rate_hz > 0.0 && rate_hz.is_finite() {
        secs_to_duration(1.0 / rate_hz)
    } else {
        Duration::ZERO
    }
}

fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

fn ensure_representable(field: &'static str, secs: f64) -> Result<()> {
    Duration::try_from_secs_f64(secs)
        .map(|_| ())
        .map_err(|error| HippoError::invalid(field, format!("{secs} s is out of range: {error}")))
}

fn ensure_rate(field: &'static str, rate_hz: f64) -> Result<()> {
    ensure_finite(field, rate_hz)?;
    if rate_hz > 0.0 {
        ensure_representable(field, 1.0 / rate_hz)?;
    }
    Ok(())
}

fn ensure_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(HippoError::invalid(field, format!("must be finite, got {value}")))
    }
}

fn ensure_non_negative(field: &'static str, value: f64) -> Result<()> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(HippoError::invalid(field, format!("must be >= 0, got {value}")));
    }
    Ok(())
}

/// Thruster (actuator) configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrusterConfig {
    pub link: String,
    pub joint: String,
    /// Telemetry publication rate (Hz).
    pub publish_rate: f64,
    pub rpm_base_topic: String,
    pub thrust_base_topic: String,
    pub throttle_cmd_base_topic: String,
    pub constant_coeff: f64,
    pub linear_coeff: f64,
    pub quadratic_coeff: f64,
    pub torque_coeff: f64,
    /// Ratio between rotor velocity and simulated joint velocity.
    pub rpm_scaler: f64,
    /// Rotor velocity at full throttle (rad/s).
    pub maximum_rpm: f64,
    pub thruster_number: u32,
    pub turning_direction: TurningDirection,
    pub propeller_direction: PropellerDirection,
    #[serde(rename = "timeconstant_up")]
    pub time_constant_up: f64,
    #[serde(rename = "timeconstant_down")]
    pub time_constant_down: f64,
    /// Setpoint is zeroed when no command arrives within this window.
    pub command_timeout_secs: f64,
}

impl Default for ThrusterConfig {
    fn default() -> Self {
        Self {
            link: THRUSTER_LINK.to_string(),
            joint: THRUSTER_JOINT.to_string(),
            publish_rate: THRUSTER_PUBLISH_RATE,
            rpm_base_topic: RPM_BASE_TOPIC.to_string(),
            thrust_base_topic: THRUST_BASE_TOPIC.to_string(),
            throttle_cmd_base_topic: THROTTLE_CMD_BASE_TOPIC.to_string(),
            constant_coeff: 0.0,
            linear_coeff: 0.0,
            quadratic_coeff: 0.0,
            torque_coeff: 0.0,
            rpm_scaler: RPM_SCALER,
            maximum_rpm: MAXIMUM_RPM,
            thruster_number: 0,
            turning_direction: TurningDirection::default(),
            propeller_direction: PropellerDirection::default(),
            time_constant_up: TIMECONSTANT_UP,
            time_constant_down: TIMECONSTANT_DOWN,
            command_timeout_secs: THROTTLE_CMD_TIMEOUT_SECS,
        }
    }
}

impl ThrusterConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("constant_coeff", self.constant_coeff)?;
        ensure_finite("linear_coeff", self.linear_coeff)?;
        ensure_finite("quadratic_coeff", self.quadratic_coeff)?;
        ensure_finite("torque_coeff", self.torque_coeff)?;
        ensure_rate("publish_rate", self.publish_rate)?;
        ensure_non_negative("maximum_rpm", self.maximum_rpm)?;
        ensure_non_negative("timeconstant_up", self.time_constant_up)?;
        ensure_non_negative("timeconstant_down", self.time_constant_down)?;
        ensure_non_negative("command_timeout_secs", self.command_timeout_secs)?;
        ensure_representable("command_timeout_secs", self.command_timeout_secs)?;
        ensure_finite("rpm_scaler", self.rpm_scaler)?;
        if self.rpm_scaler == 0.0 {
            return Err(HippoError::invalid("rpm_scaler", "must be non-zero"));
        }
        Ok(())
    }

    pub fn publish_period(&self) -> Duration {
        rate_to_period(self.publish_rate)
    }

    pub fn command_timeout(&self) -> Duration {
        if self.command_timeout_secs > 0.0 {
            secs_to_duration(self.command_timeout_secs)
        } else {
            Duration::ZERO
        }
    }
}

/// A candidate body the range sensor can detect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub id: i32,
    /// Model name of the target.
    pub name: String,
    #[serde(default = "default_target_link")]
    pub link: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_target_link() -> String {
    TARGET_LINK.to_string()
}

fn default_true() -> bool {
    true
}

/// Range sensor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeSensorConfig {
    pub link: String,
    pub ranges_base_topic: String,
    /// Publication rate (Hz).
    pub update_rate: f64,
    pub range_noise_stddev: f64,
    /// Full horizontal field of view (degrees).
    pub fov_angle: f64,
    /// Maximum angle off the sensor axis (degrees).
    pub max_viewing_angle: f64,
    pub drop_probability: f64,
    pub max_detection_distance: f64,
    pub drop_probability_exp: f64,
    /// Sensor origin relative to the link.
    pub translation: DVec3,
    /// Sensor orientation relative to the link, roll/pitch/yaw (radians).
    pub rotation: DVec3,
    pub target_models: Vec<TargetSpec>,
    pub seed: RngSeed,
}

impl Default for RangeSensorConfig {
    fn default() -> Self {
        Self {
            link: RANGE_SENSOR_LINK.to_string(),
            ranges_base_topic: RANGES_BASE_TOPIC.to_string(),
            update_rate: RANGE_UPDATE_RATE,
            range_noise_stddev: 0.0,
            fov_angle: FOV_ANGLE_DEG,
            max_viewing_angle: MAX_VIEWING_ANGLE_DEG,
            drop_probability: DROP_PROBABILITY,
            max_detection_distance: MAX_DETECTION_DISTANCE,
            drop_probability_exp: DROP_PROBABILITY_EXP,
            translation: DVec3::ZERO,
            rotation: DVec3::ZERO,
            target_models: Vec::new(),
            seed: RngSeed::default(),
        }
    }
}

impl RangeSensorConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("range_noise_stddev", self.range_noise_stddev)?;
        ensure_non_negative("fov_angle", self.fov_angle)?;
        ensure_non_negative("max_viewing_angle", self.max_viewing_angle)?;
        ensure_non_negative("drop_probability", self.drop_probability)?;
        ensure_finite("drop_probability_exp", self.drop_probability_exp)?;
        ensure_rate("update_rate", self.update_rate)?;
        ensure_non_negative("max_detection_distance", self.max_detection_distance)?;
        if self.max_detection_distance == 0.0 {
            return Err(HippoError::invalid("max_detection_distance", "must be > 0"));
        }
        if !self.translation.is_finite() {
            return Err(HippoError::invalid("translation", "must be finite"));
        }
        if !self.rotation.is_finite() {
            return Err(HippoError::invalid("rotation", "must be finite"));
        }
        Ok(())
    }

    pub fn update_period(&self) -> Duration {
        rate_to_period(self.update_rate)
    }

    /// Half of the horizontal field of view (radians).
    pub fn fov_half_angle(&self) -> f64 {
        self.fov_angle.to_radians() * 0.5
    }

    pub fn max_viewing_angle_rad(&self) -> f64 {
        self.max_viewing_angle.to_radians()
    }

    /// Mounting offset of the sensor frame relative to its link.
    pub fn mounting_offset(&self) -> Pose {
        Pose::from_translation_rpy(self.translation, self.rotation)
    }
}
