use actix::prelude::*;
use common::battery::probe::{DeviceProfile, SimulatedBatteryProbe};
use common::constants::{CHARGING_TOGGLE_INTERVAL, PROBE_FAILURE_PROBABILITY};
use common::types::delivery_status::DeliveryStatus;
use common::types::dtos::OrderDTO;
use common::utils::random_position;
use rand::Rng;
use std::env;
use std::time::SystemTime;
use tokio::signal::ctrl_c;
use tokio::time::sleep;

mod driver_actors;
mod messages;

use driver_actors::battery_monitor::BatteryMonitor;
use driver_actors::location_tracker::LocationTracker;
use messages::internal_messages::{Dispose, StartDelivery, StopTracking};

#[actix::main]
async fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <driver_id>", args[0]);
        std::process::exit(1);
    }
    let driver_id = args[1].clone();

    let profile = DeviceProfile {
        platform: "android".to_string(),
        manufacturer: "Simulated".to_string(),
        model: "sim-driver".to_string(),
        os_version: "13".to_string(),
    };
    let initial_level = rand::thread_rng().gen_range(40..=90);
    let probe = SimulatedBatteryProbe::new(initial_level, false, profile)
        .with_failure_probability(PROBE_FAILURE_PROBABILITY);
    let charging_tx = probe.charging_handle();

    let monitor = BatteryMonitor::new(Box::new(probe)).start();
    let tracker =
        LocationTracker::new(driver_id.clone(), random_position(), monitor.clone()).start();

    // Simulated platform push source: the driver plugs and unplugs the phone.
    actix::spawn(async move {
        let mut charging = false;
        loop {
            sleep(CHARGING_TOGGLE_INTERVAL).await;
            charging = !charging;
            if charging_tx.unbounded_send(charging).is_err() {
                break;
            }
        }
    });

    let order = OrderDTO {
        order_id: rand::thread_rng().gen_range(1..10_000),
        vendor_id: "vendor-1".to_string(),
        vendor_position: random_position(),
        customer_position: random_position(),
        status: DeliveryStatus::Assigned,
        time_stamp: SystemTime::now(),
    };
    println!(
        "Starting driver {driver_id} with battery at {initial_level}%, delivering order {}",
        order.order_id
    );
    tracker.do_send(StartDelivery { order });

    tokio::select! {
        _ = ctrl_c() => {
            println!("Ctrl-C received, shutting down...");
        }
    }

    tracker.do_send(StopTracking);
    monitor.do_send(Dispose);

    Ok(())
}
