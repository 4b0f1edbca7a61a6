use crate::messages::internal_messages::{
    ChargingStateChanged, Dispose, GetBatteryState, GetLocationSettings, GetSampleInterval,
};
use actix::SpawnHandle;
use actix::prelude::*;
use colored::Color;
use common::battery::policy::BatteryState;
use common::battery::probe::{BatteryProbe, DeviceTier};
use common::constants::{BATTERY_POLL_INTERVAL, FULL_BATTERY_LEVEL};
use common::logger::Logger;
use std::time::Duration;
use tokio_stream::StreamExt;

/// Continuously observes battery level and charging state through a
/// [`BatteryProbe`] and answers policy queries from the cached snapshot.
///
/// Two event sources feed the snapshot: a push-based charging subscription
/// and a periodic level poll. Both run on the actor's context; there is no
/// ordering guarantee between them, and queries always read whatever is
/// currently cached. A failed platform read keeps the last observed value.
pub struct BatteryMonitor {
    probe: Box<dyn BatteryProbe>,
    state: BatteryState,
    poll_interval: Duration,
    poll_handle: Option<SpawnHandle>,
    push_handle: Option<SpawnHandle>,
    disposed: bool,
    logger: Logger,
}

impl BatteryMonitor {
    pub fn new(probe: Box<dyn BatteryProbe>) -> Self {
        Self::with_poll_interval(probe, BATTERY_POLL_INTERVAL)
    }

    pub fn with_poll_interval(mut probe: Box<dyn BatteryProbe>, poll_interval: Duration) -> Self {
        let logger = Logger::new("BatteryMonitor", Color::Cyan);

        // Device tier is classified once and cached for the whole session.
        let tier = DeviceTier::classify(&probe.device_profile());

        let level = match probe.battery_level() {
            Ok(level) => level,
            Err(e) => {
                logger.warn(format!("Initial battery read failed ({e}), assuming full"));
                FULL_BATTERY_LEVEL
            }
        };
        let charging = match probe.is_charging() {
            Ok(charging) => charging,
            Err(e) => {
                logger.warn(format!("Initial charging read failed ({e}), assuming unplugged"));
                false
            }
        };

        logger.info(format!(
            "Monitoring battery: {level}% (charging: {charging}, tier: {tier:?})"
        ));

        Self {
            probe,
            state: BatteryState {
                level,
                charging,
                tier,
            },
            poll_interval,
            poll_handle: None,
            push_handle: None,
            disposed: false,
            logger,
        }
    }

    fn poll_battery(&mut self) {
        match self.probe.battery_level() {
            Ok(level) if level != self.state.level => {
                self.logger
                    .info(format!("Battery level: {}% -> {}%", self.state.level, level));
                self.state.level = level;
            }
            Ok(_) => {}
            Err(e) => {
                self.logger.warn(format!(
                    "Battery read failed, keeping last value {}%: {e}",
                    self.state.level
                ));
            }
        }
    }
}

impl Actor for BatteryMonitor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        if let Some(events) = self.probe.take_charging_events() {
            let stream = events.map(|charging| ChargingStateChanged { charging });
            self.push_handle = Some(ctx.add_stream(stream));
        } else {
            self.logger
                .warn("No charging-event source available, relying on polls only");
        }

        self.poll_handle = Some(ctx.run_interval(self.poll_interval, |act, _ctx| {
            act.poll_battery();
        }));
    }
}

impl StreamHandler<ChargingStateChanged> for BatteryMonitor {
    fn handle(&mut self, item: ChargingStateChanged, _ctx: &mut Self::Context) {
        if item.charging != self.state.charging {
            self.state.charging = item.charging;
            let plugged = if item.charging { "plugged in" } else { "unplugged" };
            self.logger.info(format!(
                "Charging state changed: {plugged} (battery at {}%)",
                self.state.level
            ));
        }
    }

    // The platform stream closing must not stop the actor; polling continues.
    fn finished(&mut self, _ctx: &mut Self::Context) {
        self.logger.warn("Charging event stream closed");
    }
}

impl Handler<GetBatteryState> for BatteryMonitor {
    type Result = MessageResult<GetBatteryState>;

    fn handle(&mut self, _msg: GetBatteryState, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.state)
    }
}

impl Handler<GetLocationSettings> for BatteryMonitor {
    type Result = MessageResult<GetLocationSettings>;

    fn handle(&mut self, msg: GetLocationSettings, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.state.recommended_settings(&msg.defaults))
    }
}

impl Handler<GetSampleInterval> for BatteryMonitor {
    type Result = MessageResult<GetSampleInterval>;

    fn handle(&mut self, msg: GetSampleInterval, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.state.recommended_interval(msg.default))
    }
}

impl Handler<Dispose> for BatteryMonitor {
    type Result = ();

    fn handle(&mut self, _msg: Dispose, ctx: &mut Self::Context) -> Self::Result {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(handle) = self.poll_handle.take() {
            ctx.cancel_future(handle);
        }
        if let Some(handle) = self.push_handle.take() {
            ctx.cancel_future(handle);
        }
        self.logger
            .info("Disposed, no further battery updates will be observed");
    }
}
