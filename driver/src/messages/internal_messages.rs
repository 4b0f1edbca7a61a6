use actix::prelude::*;
use common::battery::policy::{BatteryState, LocationSettings};
use common::types::delivery_status::DeliveryStatus;
use common::types::dtos::{DriverDTO, OrderDTO};
use std::time::Duration;

/////////////////////////////////////////////////////////////////////
// Battery monitor messages
/////////////////////////////////////////////////////////////////////

/// Push event from the platform battery API: the device was plugged in or
/// unplugged. Delivered to the monitor through its charging-event stream.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct ChargingStateChanged {
    pub charging: bool,
}

/// Query for the monitor's cached battery/device snapshot.
#[derive(Message, Debug, Clone)]
#[rtype(result = "BatteryState")]
pub struct GetBatteryState;

/// Query for the sampling parameters recommended for the current battery
/// state, starting from the caller's defaults.
#[derive(Message, Debug, Clone)]
#[rtype(result = "LocationSettings")]
pub struct GetLocationSettings {
    pub defaults: LocationSettings,
}

/// Query for the sampling interval recommended for the current battery state.
#[derive(Message, Debug, Clone)]
#[rtype(result = "Duration")]
pub struct GetSampleInterval {
    pub default: Duration,
}

/// Cancels the monitor's periodic poll and its charging-event subscription.
/// Idempotent; the cached state keeps answering queries afterwards.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct Dispose;

/////////////////////////////////////////////////////////////////////
// Location tracker messages
/////////////////////////////////////////////////////////////////////

/// Hands a delivery job to the tracker and starts the sampling loop.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct StartDelivery {
    pub order: OrderDTO,
}

/// One sampling cycle: ask the monitor for settings, take a position sample,
/// emit an update if the distance filter allows it, schedule the next cycle.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct SampleLocation;

/// Stops the sampling loop and cancels any scheduled cycle.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct StopTracking;

/// Ends the current delivery with a terminal exception (`Cancelled` or
/// `Failed`) and stops the sampling loop.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct AbortDelivery {
    pub status: DeliveryStatus,
}

/// Query for the tracker's current view of the driver.
#[derive(Message, Debug, Clone)]
#[rtype(result = "DriverDTO")]
pub struct GetDriverSnapshot;
