use std::time::Duration;

// Battery bands (percentage, inclusive upper bounds).
pub const CRITICAL_BATTERY_LEVEL: u8 = 10;
pub const LOW_BATTERY_LEVEL: u8 = 20;
pub const FULL_BATTERY_LEVEL: u8 = 100;

// Per-band location sampling parameters.
pub const CRITICAL_DISTANCE_FILTER_M: f32 = 50.0;
pub const LOW_DISTANCE_FILTER_M: f32 = 25.0;
pub const CHARGING_DISTANCE_FILTER_M: f32 = 5.0;
pub const LOW_END_DISTANCE_FILTER_M: f32 = 15.0;

pub const CRITICAL_TIME_LIMIT: Duration = Duration::from_secs(10);
pub const LOW_TIME_LIMIT: Duration = Duration::from_secs(20);
pub const LOW_END_TIME_LIMIT: Duration = Duration::from_secs(30);

// Sampling-interval scaling per band.
pub const CRITICAL_INTERVAL_FACTOR: u32 = 4;
pub const LOW_INTERVAL_FACTOR: u32 = 2;
pub const CHARGING_INTERVAL_FACTOR: f64 = 0.75;

/// Cadence of the periodic battery-level re-read.
pub const BATTERY_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Android releases below this major version are treated as low-end devices.
pub const LOW_END_ANDROID_MAJOR: u32 = 8;

// Caller-side defaults for the tracking loop.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(15);
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(30);
pub const DEFAULT_DISTANCE_FILTER_M: f32 = 10.0;

// Simulation knobs.
pub const COORDINATE_SCALE: f32 = 1000.0;
pub const TRACKER_STEP_M: f32 = 120.0;
pub const WAYPOINT_EPSILON_M: f32 = 0.5;
pub const CHARGING_TOGGLE_INTERVAL: Duration = Duration::from_secs(45);
pub const SIMULATED_DRAIN_PER_READ: u8 = 1;
pub const PROBE_FAILURE_PROBABILITY: f32 = 0.05;
