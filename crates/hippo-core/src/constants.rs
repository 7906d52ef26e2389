//! Plugin defaults and numerical tuning parameters.

/// Default host tick rate (Hz) used by the simulation engine.
pub const TICK_RATE: u32 = 250;

/// Elapsed times at or below this are treated as "no time passed".
pub const MIN_DT: f64 = 1e-9;

// --- Thruster ---

/// Thruster telemetry publication rate (Hz).
pub const THRUSTER_PUBLISH_RATE: f64 = 50.0;

/// Default link the thruster force acts on.
pub const THRUSTER_LINK: &str = "thruster_link";

/// Default joint driven by the thruster.
pub const THRUSTER_JOINT: &str = "thruster_joint";

/// Default base topic for the rotor speed readback.
pub const RPM_BASE_TOPIC: &str = "rpm";

/// Default base topic for incoming throttle commands.
pub const THROTTLE_CMD_BASE_TOPIC: &str = "throttle_cmd";

/// Default base topic for the computed thrust.
pub const THRUST_BASE_TOPIC: &str = "thrust";

/// Factor between the joint's simulated velocity and the rotor velocity.
pub const RPM_SCALER: f64 = 10.0;

/// Rotor velocity at full throttle (rad/s).
pub const MAXIMUM_RPM: f64 = 800.0;

/// Spin-up time constant (seconds).
pub const TIMECONSTANT_UP: f64 = 0.0125;

/// Spin-down time constant (seconds).
pub const TIMECONSTANT_DOWN: f64 = 0.025;

/// A throttle setpoint older than this is reset to zero (seconds).
pub const THROTTLE_CMD_TIMEOUT_SECS: f64 = 0.3;

// --- Range sensor ---

/// Default link the range sensor is mounted on.
pub const RANGE_SENSOR_LINK: &str = "base_link";

/// Default base topic for range measurement batches.
pub const RANGES_BASE_TOPIC: &str = "ranges";

/// Range measurement publication rate (Hz).
pub const RANGE_UPDATE_RATE: f64 = 10.0;

/// Full horizontal field of view (degrees).
pub const FOV_ANGLE_DEG: f64 = 90.0;

/// Maximum angle between the sensor axis and a visible target (degrees).
pub const MAX_VIEWING_ANGLE_DEG: f64 = 140.0;

/// Dropout probability at zero distance.
pub const DROP_PROBABILITY: f64 = 0.05;

/// Exponent of the distance dependent dropout growth.
pub const DROP_PROBABILITY_EXP: f64 = 2.0;

/// Maximum detection distance (meters).
pub const MAX_DETECTION_DISTANCE: f64 = 5.0;

/// Default link of a target model.
pub const TARGET_LINK: &str = "base_link";
