use serde::{Deserialize, Serialize};
use std::fmt;

/// Enum representing the delivery lifecycle of an order, as seen by the driver.
///
/// The first seven variants form the ordered happy path; `Cancelled` and
/// `Failed` are terminal exceptions reachable from any non-terminal state and
/// hold no position in the ordering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// A driver has been assigned, the pickup run has not started yet
    Assigned,
    /// Driving to the vendor
    OnRouteToVendor,
    /// Waiting at the vendor for the order
    ArrivedAtVendor,
    /// Order collected from the vendor
    PickedUp,
    /// Driving to the customer
    OnRouteToCustomer,
    /// Waiting at the customer's location
    ArrivedAtCustomer,
    /// Order handed to the customer
    Delivered,
    /// Delivery cancelled before completion
    Cancelled,
    /// Delivery could not be completed
    Failed,
}

/// Position of a status within the seven-step happy path, plus terminal info.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusProgression {
    /// 1-based step for the ordered states, 0 for `Cancelled`/`Failed`.
    pub current_step: u8,
    pub total_steps: u8,
    pub progress_percentage: f64,
    pub is_terminal: bool,
}

impl DeliveryStatus {
    /// The seven ordered states, in progression order.
    pub const DELIVERY_SEQUENCE: [DeliveryStatus; 7] = [
        DeliveryStatus::Assigned,
        DeliveryStatus::OnRouteToVendor,
        DeliveryStatus::ArrivedAtVendor,
        DeliveryStatus::PickedUp,
        DeliveryStatus::OnRouteToCustomer,
        DeliveryStatus::ArrivedAtCustomer,
        DeliveryStatus::Delivered,
    ];

    pub const ALL: [DeliveryStatus; 9] = [
        DeliveryStatus::Assigned,
        DeliveryStatus::OnRouteToVendor,
        DeliveryStatus::ArrivedAtVendor,
        DeliveryStatus::PickedUp,
        DeliveryStatus::OnRouteToCustomer,
        DeliveryStatus::ArrivedAtCustomer,
        DeliveryStatus::Delivered,
        DeliveryStatus::Cancelled,
        DeliveryStatus::Failed,
    ];

    /// Canonical snake_case string stored in the backend's status column.
    pub fn wire_name(&self) -> &'static str {
        match self {
            DeliveryStatus::Assigned => "assigned",
            DeliveryStatus::OnRouteToVendor => "on_route_to_vendor",
            DeliveryStatus::ArrivedAtVendor => "arrived_at_vendor",
            DeliveryStatus::PickedUp => "picked_up",
            DeliveryStatus::OnRouteToCustomer => "on_route_to_customer",
            DeliveryStatus::ArrivedAtCustomer => "arrived_at_customer",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Cancelled => "cancelled",
            DeliveryStatus::Failed => "failed",
        }
    }

    /// Fixed sentence shown to the customer while tracking the order.
    pub fn description(&self) -> &'static str {
        match self {
            DeliveryStatus::Assigned => "A driver has been assigned to your order.",
            DeliveryStatus::OnRouteToVendor => "The driver is heading to the restaurant.",
            DeliveryStatus::ArrivedAtVendor => {
                "The driver has arrived at the restaurant and is waiting for your order."
            }
            DeliveryStatus::PickedUp => "The driver has picked up your order.",
            DeliveryStatus::OnRouteToCustomer => "Your order is on its way to you.",
            DeliveryStatus::ArrivedAtCustomer => "The driver has arrived at your location.",
            DeliveryStatus::Delivered => "Your order has been delivered. Enjoy!",
            DeliveryStatus::Cancelled => "This delivery was cancelled.",
            DeliveryStatus::Failed => "This delivery could not be completed.",
        }
    }

    /// Statuses the driver must explicitly confirm before moving on.
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, DeliveryStatus::PickedUp | DeliveryStatus::Delivered)
    }

    /// Where this status sits in the happy path. `Cancelled` and `Failed` are
    /// out-of-band: step 0, 0% progress, terminal.
    pub fn progression(&self) -> StatusProgression {
        let total_steps = Self::DELIVERY_SEQUENCE.len() as u8;
        match Self::DELIVERY_SEQUENCE.iter().position(|s| s == self) {
            Some(index) => {
                let current_step = index as u8 + 1;
                StatusProgression {
                    current_step,
                    total_steps,
                    progress_percentage: f64::from(current_step) / f64::from(total_steps) * 100.0,
                    is_terminal: *self == DeliveryStatus::Delivered,
                }
            }
            None => StatusProgression {
                current_step: 0,
                total_steps,
                progress_percentage: 0.0,
                is_terminal: true,
            },
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::Assigned => write!(f, "Assigned"),
            DeliveryStatus::OnRouteToVendor => write!(f, "On route to vendor"),
            DeliveryStatus::ArrivedAtVendor => write!(f, "Arrived at vendor"),
            DeliveryStatus::PickedUp => write!(f, "Picked up"),
            DeliveryStatus::OnRouteToCustomer => write!(f, "On route to customer"),
            DeliveryStatus::ArrivedAtCustomer => write!(f, "Arrived at customer"),
            DeliveryStatus::Delivered => write!(f, "Delivered"),
            DeliveryStatus::Cancelled => write!(f, "Cancelled"),
            DeliveryStatus::Failed => write!(f, "Failed"),
        }
    }
}
