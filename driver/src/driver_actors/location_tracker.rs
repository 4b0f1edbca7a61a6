use crate::driver_actors::battery_monitor::BatteryMonitor;
use crate::messages::internal_messages::{
    AbortDelivery, GetBatteryState, GetDriverSnapshot, GetLocationSettings, GetSampleInterval,
    SampleLocation, StartDelivery, StopTracking,
};
use actix::SpawnHandle;
use actix::fut::wrap_future;
use actix::prelude::*;
use colored::Color;
use common::battery::policy::{BatteryState, LocationAccuracy, LocationSettings};
use common::constants::{
    DEFAULT_DISTANCE_FILTER_M, DEFAULT_SAMPLE_INTERVAL, DEFAULT_TIME_LIMIT, FULL_BATTERY_LEVEL,
    TRACKER_STEP_M, WAYPOINT_EPSILON_M,
};
use common::logger::Logger;
use common::types::delivery_status::DeliveryStatus;
use common::types::dtos::{DriverDTO, OrderDTO};
use common::utils::{manhattan_distance, step_towards};
use std::time::{Duration, SystemTime};

/// Owns the driver's location sampling loop: before every cycle it asks the
/// [`BatteryMonitor`] for recommended settings and interval, applies them to a
/// simulated position sample, and walks the carried order through the
/// delivery happy path as waypoints are reached.
pub struct LocationTracker {
    pub driver_id: String,
    pub position: (f32, f32),
    pub order: Option<OrderDTO>,
    monitor: Addr<BatteryMonitor>,
    default_settings: LocationSettings,
    default_interval: Duration,
    last_emitted: Option<(f32, f32)>,
    last_battery: Option<BatteryState>,
    next_sample: Option<SpawnHandle>,
    tracking: bool,
    logger: Logger,
}

impl LocationTracker {
    pub fn new(driver_id: String, position: (f32, f32), monitor: Addr<BatteryMonitor>) -> Self {
        let defaults = LocationSettings {
            accuracy: LocationAccuracy::High,
            distance_filter_m: DEFAULT_DISTANCE_FILTER_M,
            time_limit: DEFAULT_TIME_LIMIT,
        };
        Self::with_defaults(driver_id, position, monitor, defaults, DEFAULT_SAMPLE_INTERVAL)
    }

    pub fn with_defaults(
        driver_id: String,
        position: (f32, f32),
        monitor: Addr<BatteryMonitor>,
        default_settings: LocationSettings,
        default_interval: Duration,
    ) -> Self {
        let logger = Logger::new(format!("Tracker {driver_id}"), Color::Green);
        Self {
            driver_id,
            position,
            order: None,
            monitor,
            default_settings,
            default_interval,
            last_emitted: None,
            last_battery: None,
            next_sample: None,
            tracking: false,
            logger,
        }
    }

    fn reached(position: (f32, f32), target: (f32, f32)) -> bool {
        manhattan_distance(position, target) <= WAYPOINT_EPSILON_M
    }

    /// One sampling cycle under the given settings. Moves the driver, advances
    /// the order by at most one status, and emits an update when the distance
    /// filter allows it or the status changed.
    fn apply_sample(&mut self, settings: LocationSettings, battery: Option<BatteryState>) {
        if battery.is_some() {
            self.last_battery = battery;
        }
        let Some(order) = self.order.as_mut() else {
            return;
        };

        let waypoint = match order.status {
            DeliveryStatus::Assigned | DeliveryStatus::OnRouteToVendor => {
                Some(order.vendor_position)
            }
            DeliveryStatus::PickedUp | DeliveryStatus::OnRouteToCustomer => {
                Some(order.customer_position)
            }
            _ => None,
        };
        if let Some(target) = waypoint {
            self.position = step_towards(self.position, target, TRACKER_STEP_M);
        }

        let next = match order.status {
            DeliveryStatus::Assigned => Some(DeliveryStatus::OnRouteToVendor),
            DeliveryStatus::OnRouteToVendor
                if Self::reached(self.position, order.vendor_position) =>
            {
                Some(DeliveryStatus::ArrivedAtVendor)
            }
            DeliveryStatus::ArrivedAtVendor => Some(DeliveryStatus::PickedUp),
            DeliveryStatus::PickedUp => Some(DeliveryStatus::OnRouteToCustomer),
            DeliveryStatus::OnRouteToCustomer
                if Self::reached(self.position, order.customer_position) =>
            {
                Some(DeliveryStatus::ArrivedAtCustomer)
            }
            DeliveryStatus::ArrivedAtCustomer => Some(DeliveryStatus::Delivered),
            _ => None,
        };

        let status_changed = next.is_some();
        if let Some(next) = next {
            order.status = next;
            order.time_stamp = SystemTime::now();
            let info = next.progression();
            self.logger.info(format!(
                "Order {}: {next} (step {}/{}, {:.1}%) - {}",
                order.order_id,
                info.current_step,
                info.total_steps,
                info.progress_percentage,
                next.description()
            ));
            if next.requires_confirmation() {
                self.logger
                    .info(format!("Mandatory confirmation recorded for '{next}'"));
            }
        }

        let moved = match self.last_emitted {
            Some(last) => manhattan_distance(self.position, last),
            None => f32::INFINITY,
        };
        if status_changed || moved >= settings.distance_filter_m {
            let update = DriverDTO {
                driver_id: self.driver_id.clone(),
                position: self.position,
                status: Some(order.status),
                battery_level: self
                    .last_battery
                    .map(|s| s.level)
                    .unwrap_or(FULL_BATTERY_LEVEL),
                charging: self.last_battery.map(|s| s.charging).unwrap_or(false),
                time_stamp: SystemTime::now(),
            };
            match serde_json::to_string(&update) {
                Ok(payload) => self.logger.info(format!(
                    "Location update ({:?}, filter {}m, limit {:?}): {payload}",
                    settings.accuracy, settings.distance_filter_m, settings.time_limit
                )),
                Err(e) => self
                    .logger
                    .error(format!("Failed to serialize location update: {e}")),
            }
            self.last_emitted = Some(self.position);
        }

        if order.status == DeliveryStatus::Delivered {
            self.tracking = false;
            self.logger.info(format!(
                "Delivery of order {} completed, tracking stopped",
                order.order_id
            ));
        }
    }

    fn schedule_next(&mut self, delay: Duration, ctx: &mut Context<Self>) {
        if !self.tracking {
            return;
        }
        self.next_sample = Some(ctx.run_later(delay, |_act, ctx| {
            ctx.address().do_send(SampleLocation);
        }));
    }
}

impl Actor for LocationTracker {
    type Context = Context<Self>;
}

impl Handler<StartDelivery> for LocationTracker {
    type Result = ();

    fn handle(&mut self, msg: StartDelivery, ctx: &mut Self::Context) -> Self::Result {
        if self.tracking {
            self.logger.warn(format!(
                "Already tracking an order, ignoring order {}",
                msg.order.order_id
            ));
            return;
        }
        let mut order = msg.order;
        order.status = DeliveryStatus::Assigned;
        self.logger.info(format!(
            "Delivery run started for order {} from vendor {}: {}",
            order.order_id,
            order.vendor_id,
            order.status.description()
        ));
        self.order = Some(order);
        self.tracking = true;
        self.last_emitted = None;
        ctx.address().do_send(SampleLocation);
    }
}

impl Handler<SampleLocation> for LocationTracker {
    type Result = ();

    fn handle(&mut self, _msg: SampleLocation, ctx: &mut Self::Context) -> Self::Result {
        if !self.tracking {
            return;
        }
        let monitor = self.monitor.clone();
        let defaults = self.default_settings;
        let default_interval = self.default_interval;

        let fut = wrap_future(async move {
            let settings = monitor.send(GetLocationSettings { defaults }).await;
            let interval = monitor
                .send(GetSampleInterval {
                    default: default_interval,
                })
                .await;
            let state = monitor.send(GetBatteryState).await;
            (settings, interval, state)
        })
        .map(|(settings, interval, state), act: &mut Self, ctx| {
            let (Ok(settings), Ok(interval), Ok(state)) = (settings, interval, state) else {
                act.logger
                    .warn("Battery monitor unavailable, applying caller defaults");
                act.apply_sample(act.default_settings, None);
                act.schedule_next(act.default_interval, ctx);
                return;
            };
            act.apply_sample(settings, Some(state));
            act.schedule_next(interval, ctx);
        });
        ctx.spawn(fut);
    }
}

impl Handler<StopTracking> for LocationTracker {
    type Result = ();

    fn handle(&mut self, _msg: StopTracking, ctx: &mut Self::Context) -> Self::Result {
        if let Some(handle) = self.next_sample.take() {
            ctx.cancel_future(handle);
        }
        if self.tracking {
            self.tracking = false;
            self.logger.info("Tracking stopped");
        }
    }
}

impl Handler<AbortDelivery> for LocationTracker {
    type Result = ();

    fn handle(&mut self, msg: AbortDelivery, ctx: &mut Self::Context) -> Self::Result {
        if !matches!(
            msg.status,
            DeliveryStatus::Cancelled | DeliveryStatus::Failed
        ) {
            self.logger.warn(format!(
                "AbortDelivery carries non-terminal status '{}', ignoring",
                msg.status
            ));
            return;
        }
        let Some(order) = self.order.as_mut() else {
            self.logger.warn("No active order to abort");
            return;
        };
        if order.status.progression().is_terminal {
            self.logger.warn(format!(
                "Order {} already ended as '{}', ignoring abort",
                order.order_id, order.status
            ));
            return;
        }

        order.status = msg.status;
        order.time_stamp = SystemTime::now();
        let info = msg.status.progression();
        self.logger.info(format!(
            "Order {} ended: {} ({:.0}% progress) - {}",
            order.order_id,
            msg.status,
            info.progress_percentage,
            msg.status.description()
        ));

        if let Some(handle) = self.next_sample.take() {
            ctx.cancel_future(handle);
        }
        self.tracking = false;
    }
}

impl Handler<GetDriverSnapshot> for LocationTracker {
    type Result = MessageResult<GetDriverSnapshot>;

    fn handle(&mut self, _msg: GetDriverSnapshot, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(DriverDTO {
            driver_id: self.driver_id.clone(),
            position: self.position,
            status: self.order.as_ref().map(|o| o.status),
            battery_level: self
                .last_battery
                .map(|s| s.level)
                .unwrap_or(FULL_BATTERY_LEVEL),
            charging: self.last_battery.map(|s| s.charging).unwrap_or(false),
            time_stamp: SystemTime::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::battery::probe::{DeviceProfile, SimulatedBatteryProbe};
    use tokio::time::sleep;

    fn test_order(order_id: u64) -> OrderDTO {
        OrderDTO {
            order_id,
            vendor_id: "vendor-1".to_string(),
            vendor_position: (100.0, 0.0),
            customer_position: (300.0, 0.0),
            status: DeliveryStatus::Assigned,
            time_stamp: SystemTime::now(),
        }
    }

    fn test_monitor(level: u8, charging: bool) -> Addr<BatteryMonitor> {
        let profile = DeviceProfile {
            platform: "android".to_string(),
            manufacturer: "Acme".to_string(),
            model: "test-device".to_string(),
            os_version: "13".to_string(),
        };
        BatteryMonitor::new(Box::new(SimulatedBatteryProbe::new(level, charging, profile))).start()
    }

    fn fast_tracker(monitor: Addr<BatteryMonitor>) -> LocationTracker {
        let defaults = LocationSettings {
            accuracy: LocationAccuracy::High,
            distance_filter_m: 10.0,
            time_limit: Duration::from_secs(30),
        };
        LocationTracker::with_defaults(
            "driver-1".to_string(),
            (0.0, 0.0),
            monitor,
            defaults,
            Duration::from_millis(20),
        )
    }

    #[actix_rt::test]
    async fn delivery_walks_the_full_happy_path() {
        let tracker = fast_tracker(test_monitor(90, false)).start();
        tracker.do_send(StartDelivery {
            order: test_order(1),
        });

        sleep(Duration::from_millis(500)).await;

        let snapshot = tracker.send(GetDriverSnapshot).await.unwrap();
        assert_eq!(snapshot.status, Some(DeliveryStatus::Delivered));
        assert_eq!(snapshot.position, (300.0, 0.0));
    }

    #[actix_rt::test]
    async fn stop_tracking_freezes_the_run() {
        let tracker = fast_tracker(test_monitor(90, false)).start();
        tracker.do_send(StartDelivery {
            order: test_order(2),
        });

        sleep(Duration::from_millis(30)).await;
        tracker.send(StopTracking).await.unwrap();

        let frozen = tracker.send(GetDriverSnapshot).await.unwrap();
        assert_ne!(frozen.status, Some(DeliveryStatus::Delivered));

        sleep(Duration::from_millis(200)).await;
        let later = tracker.send(GetDriverSnapshot).await.unwrap();
        assert_eq!(frozen.status, later.status);
        assert_eq!(frozen.position, later.position);
    }

    #[actix_rt::test]
    async fn a_second_order_is_rejected_while_tracking() {
        let tracker = fast_tracker(test_monitor(90, false)).start();
        tracker.do_send(StartDelivery {
            order: test_order(3),
        });
        let mut rejected = test_order(4);
        rejected.customer_position = (500.0, 0.0);
        tracker
            .send(StartDelivery { order: rejected })
            .await
            .unwrap();

        sleep(Duration::from_millis(500)).await;
        let snapshot = tracker.send(GetDriverSnapshot).await.unwrap();
        // Order 4 never replaced the running delivery.
        assert_eq!(snapshot.position, (300.0, 0.0));
    }

    #[actix_rt::test]
    async fn cancelling_mid_run_ends_the_delivery_terminally() {
        let tracker = fast_tracker(test_monitor(90, false)).start();
        tracker.do_send(StartDelivery {
            order: test_order(6),
        });

        sleep(Duration::from_millis(30)).await;
        tracker
            .send(AbortDelivery {
                status: DeliveryStatus::Cancelled,
            })
            .await
            .unwrap();

        let snapshot = tracker.send(GetDriverSnapshot).await.unwrap();
        assert_eq!(snapshot.status, Some(DeliveryStatus::Cancelled));

        // A non-terminal abort status is rejected outright.
        tracker
            .send(AbortDelivery {
                status: DeliveryStatus::PickedUp,
            })
            .await
            .unwrap();
        let later = tracker.send(GetDriverSnapshot).await.unwrap();
        assert_eq!(later.status, Some(DeliveryStatus::Cancelled));
    }

    #[actix_rt::test]
    async fn critical_battery_stretches_the_cycle() {
        // At 5% and unplugged the recommended interval is 4x the default, so
        // a short run completes far fewer cycles than the healthy case.
        let tracker = fast_tracker(test_monitor(5, false)).start();
        tracker.do_send(StartDelivery {
            order: test_order(5),
        });

        sleep(Duration::from_millis(200)).await;
        let snapshot = tracker.send(GetDriverSnapshot).await.unwrap();
        assert_ne!(snapshot.status, Some(DeliveryStatus::Delivered));
    }
}
