//! Battery-adaptive location sampling policy.
//!
//! Pure functions over a [`BatteryState`] snapshot; the monitor actor owns the
//! snapshot and re-evaluates the policy on every request. The precedence chain
//! is order-sensitive: a critically low battery wins over everything else,
//! charging included, so a driver about to lose power always gets the
//! cheapest sampling profile.

use crate::battery::probe::DeviceTier;
use crate::constants::{
    CHARGING_DISTANCE_FILTER_M, CHARGING_INTERVAL_FACTOR, CRITICAL_BATTERY_LEVEL,
    CRITICAL_DISTANCE_FILTER_M, CRITICAL_INTERVAL_FACTOR, CRITICAL_TIME_LIMIT,
    LOW_BATTERY_LEVEL, LOW_DISTANCE_FILTER_M, LOW_END_DISTANCE_FILTER_M, LOW_END_TIME_LIMIT,
    LOW_INTERVAL_FACTOR, LOW_TIME_LIMIT,
};
use std::time::Duration;

/// Accuracy tiers of the platform location API, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationAccuracy {
    Lowest,
    Low,
    Medium,
    High,
    Best,
}

/// Parameters the tracking loop passes to each platform location request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationSettings {
    pub accuracy: LocationAccuracy,
    /// Minimum movement, in meters, before a new position is reported.
    pub distance_filter_m: f32,
    /// Timeout for a single location request.
    pub time_limit: Duration,
}

/// Snapshot of the monitored battery/device state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryState {
    /// Battery percentage, 0-100.
    pub level: u8,
    pub charging: bool,
    pub tier: DeviceTier,
}

impl BatteryState {
    pub fn is_critical(&self) -> bool {
        self.level <= CRITICAL_BATTERY_LEVEL
    }

    pub fn is_low(&self) -> bool {
        self.level <= LOW_BATTERY_LEVEL
    }

    /// Sampling parameters for the current state.
    ///
    /// Precedence: critical battery, low battery, charging, low-end device,
    /// caller defaults. The critical band does not check the charger: even
    /// plugged in, a device at 10% gets the power-saving profile.
    pub fn recommended_settings(&self, defaults: &LocationSettings) -> LocationSettings {
        if self.is_critical() {
            return LocationSettings {
                accuracy: LocationAccuracy::Lowest,
                distance_filter_m: CRITICAL_DISTANCE_FILTER_M,
                time_limit: CRITICAL_TIME_LIMIT,
            };
        }
        if self.is_low() && !self.charging {
            return LocationSettings {
                accuracy: LocationAccuracy::Medium,
                distance_filter_m: LOW_DISTANCE_FILTER_M,
                time_limit: LOW_TIME_LIMIT,
            };
        }
        if self.charging {
            return LocationSettings {
                accuracy: LocationAccuracy::Best,
                distance_filter_m: CHARGING_DISTANCE_FILTER_M,
                time_limit: defaults.time_limit,
            };
        }
        if self.tier == DeviceTier::LowEnd {
            return LocationSettings {
                accuracy: LocationAccuracy::Medium,
                distance_filter_m: LOW_END_DISTANCE_FILTER_M,
                time_limit: LOW_END_TIME_LIMIT,
            };
        }
        *defaults
    }

    /// Scales the sampling interval with the same battery bands as
    /// [`recommended_settings`]: stretch it while discharging low, tighten it
    /// slightly on the charger.
    pub fn recommended_interval(&self, default: Duration) -> Duration {
        if self.is_critical() && !self.charging {
            return default * CRITICAL_INTERVAL_FACTOR;
        }
        if self.is_low() && !self.charging {
            return default * LOW_INTERVAL_FACTOR;
        }
        if self.charging {
            let scaled = (default.as_secs_f64() * CHARGING_INTERVAL_FACTOR).round();
            return Duration::from_secs(scaled as u64);
        }
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(level: u8, charging: bool, tier: DeviceTier) -> BatteryState {
        BatteryState {
            level,
            charging,
            tier,
        }
    }

    fn defaults() -> LocationSettings {
        LocationSettings {
            accuracy: LocationAccuracy::High,
            distance_filter_m: 10.0,
            time_limit: Duration::from_secs(30),
        }
    }

    #[test]
    fn critical_battery_forces_power_saving_settings() {
        for tier in [DeviceTier::HighEnd, DeviceTier::LowEnd] {
            let settings = state(5, false, tier).recommended_settings(&defaults());
            assert_eq!(settings.accuracy, LocationAccuracy::Lowest);
            assert_eq!(settings.distance_filter_m, 50.0);
            assert_eq!(settings.time_limit, Duration::from_secs(10));
        }
    }

    #[test]
    fn charging_does_not_override_critical_battery() {
        let settings = state(5, true, DeviceTier::HighEnd).recommended_settings(&defaults());
        assert_eq!(settings.accuracy, LocationAccuracy::Lowest);
        assert_eq!(settings.distance_filter_m, 50.0);
    }

    #[test]
    fn low_battery_while_discharging_uses_the_medium_profile() {
        let settings = state(15, false, DeviceTier::HighEnd).recommended_settings(&defaults());
        assert_eq!(settings.accuracy, LocationAccuracy::Medium);
        assert_eq!(settings.distance_filter_m, 25.0);
        assert_eq!(settings.time_limit, Duration::from_secs(20));
    }

    #[test]
    fn charging_device_gets_the_best_accuracy_and_keeps_the_callers_timeout() {
        let settings = state(50, true, DeviceTier::LowEnd).recommended_settings(&defaults());
        assert_eq!(settings.accuracy, LocationAccuracy::Best);
        assert_eq!(settings.distance_filter_m, 5.0);
        assert_eq!(settings.time_limit, defaults().time_limit);
    }

    #[test]
    fn low_end_device_gets_conservative_settings_when_nothing_else_applies() {
        let settings = state(50, false, DeviceTier::LowEnd).recommended_settings(&defaults());
        assert_eq!(settings.accuracy, LocationAccuracy::Medium);
        assert_eq!(settings.distance_filter_m, 15.0);
        assert_eq!(settings.time_limit, Duration::from_secs(30));
    }

    #[test]
    fn healthy_high_end_device_keeps_the_callers_defaults() {
        let settings = state(50, false, DeviceTier::HighEnd).recommended_settings(&defaults());
        assert_eq!(settings, defaults());
    }

    #[test]
    fn interval_scales_with_the_same_battery_bands() {
        let default = Duration::from_secs(15);
        assert_eq!(
            state(5, false, DeviceTier::HighEnd).recommended_interval(default),
            Duration::from_secs(60)
        );
        assert_eq!(
            state(15, false, DeviceTier::HighEnd).recommended_interval(default),
            Duration::from_secs(30)
        );
        assert_eq!(
            state(50, true, DeviceTier::HighEnd).recommended_interval(default),
            Duration::from_secs(11)
        );
        assert_eq!(
            state(50, false, DeviceTier::HighEnd).recommended_interval(default),
            default
        );
    }

    #[test]
    fn band_boundaries_are_inclusive() {
        let defaults = defaults();
        assert_eq!(
            state(10, false, DeviceTier::HighEnd)
                .recommended_settings(&defaults)
                .accuracy,
            LocationAccuracy::Lowest
        );
        assert_eq!(
            state(11, false, DeviceTier::HighEnd)
                .recommended_settings(&defaults)
                .accuracy,
            LocationAccuracy::Medium
        );
        assert_eq!(
            state(20, false, DeviceTier::HighEnd)
                .recommended_settings(&defaults)
                .accuracy,
            LocationAccuracy::Medium
        );
        assert_eq!(
            state(21, false, DeviceTier::HighEnd).recommended_settings(&defaults),
            defaults
        );
    }
}
