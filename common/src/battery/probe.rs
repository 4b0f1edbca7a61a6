//! Platform seam for battery and device information.
//!
//! The monitor only ever talks to a [`BatteryProbe`]; the real mobile platform
//! sits behind it in production, and [`SimulatedBatteryProbe`] stands in for
//! it in the binary and in tests.

use crate::constants::{LOW_END_ANDROID_MAJOR, SIMULATED_DRAIN_PER_READ};
use crate::utils::random_bool_by_probability;
use futures_channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("platform battery read failed: {0}")]
    ReadFailed(String),
}

/// Device identity strings, read once at startup for the tier heuristic.
#[derive(Debug, Clone)]
pub struct DeviceProfile {
    pub platform: String,
    pub manufacturer: String,
    pub model: String,
    pub os_version: String,
}

/// Coarse device classification used only to pick conservative sampling
/// defaults when no stronger signal (battery band, charging) applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceTier {
    HighEnd,
    LowEnd,
}

impl DeviceTier {
    /// High-end unless the profile carries the explicit old-device signal:
    /// Android with an OS major version below [`LOW_END_ANDROID_MAJOR`].
    /// Unparsable versions classify as high-end.
    pub fn classify(profile: &DeviceProfile) -> DeviceTier {
        if !profile.platform.eq_ignore_ascii_case("android") {
            return DeviceTier::HighEnd;
        }
        match profile
            .os_version
            .split('.')
            .next()
            .and_then(|major| major.trim().parse::<u32>().ok())
        {
            Some(major) if major < LOW_END_ANDROID_MAJOR => DeviceTier::LowEnd,
            _ => DeviceTier::HighEnd,
        }
    }
}

/// What the monitor needs from the platform battery API.
///
/// Reads are synchronous and may fail on unsupported platforms; the charging
/// subscription is push-based and can be taken exactly once.
pub trait BatteryProbe {
    fn battery_level(&mut self) -> Result<u8, ProbeError>;

    fn is_charging(&mut self) -> Result<bool, ProbeError>;

    fn device_profile(&self) -> DeviceProfile;

    /// Hands over the receiving end of the platform's charging-state events.
    /// Returns `None` once taken, or when the platform has no push source.
    fn take_charging_events(&mut self) -> Option<UnboundedReceiver<bool>>;
}

/// Probe backed by a simulated device: the battery drains a little on each
/// read, and reads fail with a configurable probability.
pub struct SimulatedBatteryProbe {
    level: u8,
    charging: bool,
    failure_probability: f32,
    profile: DeviceProfile,
    charging_tx: UnboundedSender<bool>,
    charging_rx: Option<UnboundedReceiver<bool>>,
}

impl SimulatedBatteryProbe {
    pub fn new(level: u8, charging: bool, profile: DeviceProfile) -> Self {
        let (charging_tx, charging_rx) = unbounded();
        Self {
            level,
            charging,
            failure_probability: 0.0,
            profile,
            charging_tx,
            charging_rx: Some(charging_rx),
        }
    }

    pub fn with_failure_probability(mut self, probability: f32) -> Self {
        self.failure_probability = probability;
        self
    }

    /// Sender half of the charging-event channel, for the simulated platform
    /// task that plugs and unplugs the device.
    pub fn charging_handle(&self) -> UnboundedSender<bool> {
        self.charging_tx.clone()
    }
}

impl BatteryProbe for SimulatedBatteryProbe {
    fn battery_level(&mut self) -> Result<u8, ProbeError> {
        if random_bool_by_probability(self.failure_probability) {
            return Err(ProbeError::ReadFailed("simulated read failure".into()));
        }
        let current = self.level;
        if !self.charging {
            self.level = self.level.saturating_sub(SIMULATED_DRAIN_PER_READ);
        }
        Ok(current)
    }

    fn is_charging(&mut self) -> Result<bool, ProbeError> {
        if random_bool_by_probability(self.failure_probability) {
            return Err(ProbeError::ReadFailed("simulated read failure".into()));
        }
        Ok(self.charging)
    }

    fn device_profile(&self) -> DeviceProfile {
        self.profile.clone()
    }

    fn take_charging_events(&mut self) -> Option<UnboundedReceiver<bool>> {
        self.charging_rx.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(platform: &str, os_version: &str) -> DeviceProfile {
        DeviceProfile {
            platform: platform.to_string(),
            manufacturer: "Acme".to_string(),
            model: "test-device".to_string(),
            os_version: os_version.to_string(),
        }
    }

    #[test]
    fn old_android_classifies_as_low_end() {
        assert_eq!(
            DeviceTier::classify(&profile("android", "7.1.2")),
            DeviceTier::LowEnd
        );
        assert_eq!(
            DeviceTier::classify(&profile("Android", "6")),
            DeviceTier::LowEnd
        );
    }

    #[test]
    fn recent_android_and_other_platforms_classify_as_high_end() {
        assert_eq!(
            DeviceTier::classify(&profile("android", "13")),
            DeviceTier::HighEnd
        );
        assert_eq!(
            DeviceTier::classify(&profile("ios", "12.4")),
            DeviceTier::HighEnd
        );
    }

    #[test]
    fn unparsable_os_version_defaults_to_high_end() {
        assert_eq!(
            DeviceTier::classify(&profile("android", "unknown")),
            DeviceTier::HighEnd
        );
        assert_eq!(
            DeviceTier::classify(&profile("android", "")),
            DeviceTier::HighEnd
        );
    }

    #[test]
    fn simulated_probe_drains_only_when_unplugged() {
        let mut discharging = SimulatedBatteryProbe::new(80, false, profile("android", "13"));
        let first = discharging.battery_level().unwrap();
        let second = discharging.battery_level().unwrap();
        assert!(second < first);

        let mut charging = SimulatedBatteryProbe::new(80, true, profile("android", "13"));
        assert_eq!(charging.battery_level().unwrap(), 80);
        assert_eq!(charging.battery_level().unwrap(), 80);
    }

    #[test]
    fn simulated_probe_honors_failure_probability() {
        let mut probe = SimulatedBatteryProbe::new(80, false, profile("android", "13"))
            .with_failure_probability(1.0);
        assert!(probe.battery_level().is_err());
        assert!(probe.is_charging().is_err());
    }

    #[test]
    fn charging_events_can_only_be_taken_once() {
        let mut probe = SimulatedBatteryProbe::new(80, false, profile("android", "13"));
        assert!(probe.take_charging_events().is_some());
        assert!(probe.take_charging_events().is_none());
    }
}
