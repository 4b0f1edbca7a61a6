use crate::types::delivery_status::DeliveryStatus;
use serde::{Deserialize, Serialize};

/// Delivery job as handed to a driver: where to pick up and where to drop off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDTO {
    /// Unique order id.
    pub order_id: u64,
    /// Vendor preparing the order.
    pub vendor_id: String,
    /// Pickup location, in meters on the city grid.
    pub vendor_position: (f32, f32),
    /// Drop-off location.
    pub customer_position: (f32, f32),
    /// Current delivery status of the order.
    pub status: DeliveryStatus,
    /// Last update time of the order.
    pub time_stamp: std::time::SystemTime,
}

/// Location update emitted by the tracking loop towards the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverDTO {
    /// Unique driver id.
    pub driver_id: String,
    /// Current driver position.
    pub position: (f32, f32),
    /// Delivery status of the order being carried, if any.
    pub status: Option<DeliveryStatus>,
    /// Battery percentage observed when the sample was taken.
    pub battery_level: u8,
    /// Whether the device was charging when the sample was taken.
    pub charging: bool,
    /// When the sample was taken.
    pub time_stamp: std::time::SystemTime,
}

impl Eq for OrderDTO {}

impl PartialEq for OrderDTO {
    fn eq(&self, other: &Self) -> bool {
        self.order_id == other.order_id
    }
}

impl std::hash::Hash for OrderDTO {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.order_id.hash(state);
    }
}
