//! Tolerant parsing side of the status codec.
//!
//! `DeliveryStatus::wire_name` is the total canonical direction; this module
//! accepts that vocabulary back plus legacy aliases and camelCase spellings.
//! An unknown string is always a hard error: defaulting here would silently
//! misreport delivery progress to the customer.

use crate::bimap::BiMap;
use crate::types::delivery_status::DeliveryStatus;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("invalid delivery status: {0:?}")]
    UnknownStatus(String),
}

/// Retired wire values still present in historical rows. Kept apart from the
/// canonical table so each direction stays auditable on its own.
///
/// `out_for_delivery` maps to `OnRouteToCustomer`: the old combined value
/// covered the post-pickup leg, not the pickup run. `ready`/`preparing` are
/// kitchen states written before the delivery workflow began.
const LEGACY_ALIASES: [(&str, DeliveryStatus); 4] = [
    ("out_for_delivery", DeliveryStatus::OnRouteToCustomer),
    ("en_route", DeliveryStatus::OnRouteToCustomer),
    ("ready", DeliveryStatus::Assigned),
    ("preparing", DeliveryStatus::Assigned),
];

fn canonical() -> &'static BiMap<DeliveryStatus, &'static str> {
    static TABLE: OnceLock<BiMap<DeliveryStatus, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = BiMap::new();
        for status in DeliveryStatus::ALL {
            table.insert(status, status.wire_name());
        }
        table
    })
}

/// Parses a backend status string, tolerating legacy aliases, any casing and
/// camelCase round-trips. The only failure is an unknown value.
pub fn from_wire(value: &str) -> Result<DeliveryStatus, StatusError> {
    let normalized = value.trim().to_lowercase();

    if let Some(status) = canonical().get_by_value(normalized.as_str()) {
        return Ok(*status);
    }
    for (alias, status) in LEGACY_ALIASES {
        if alias == normalized {
            return Ok(status);
        }
    }
    // Lowercasing a camelCase spelling squashes the underscores out of the
    // canonical name, so compare against the underscore-free forms too.
    for status in DeliveryStatus::ALL {
        if status.wire_name().replace('_', "") == normalized {
            return Ok(status);
        }
    }

    Err(StatusError::UnknownStatus(value.trim().to_string()))
}

/// True iff [`from_wire`] would succeed. Never panics.
pub fn is_valid_wire_status(value: &str) -> bool {
    from_wire(value).is_ok()
}

impl FromStr for DeliveryStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_wire(s)
    }
}
