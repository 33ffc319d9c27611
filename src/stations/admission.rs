//! # Admission: phase 0 for a single vehicle.
//!
//! One task per vehicle. The vehicle is never queued here: on a failed
//! re-check the task keeps it, backs off and gates again.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::vehicles::Vehicle;

use super::station::{Service, Station};

/// Drives one vehicle through the parking phase into the first queue.
pub struct Admission {
    station: Arc<Station>,
    vehicle: Vehicle,
}

impl Admission {
    pub fn new(station: Arc<Station>, vehicle: Vehicle) -> Self {
        Self { station, vehicle }
    }

    /// Runs until the vehicle is handed to the next phase or `token` is cancelled.
    pub async fn run(self, token: CancellationToken) {
        let Self { station, vehicle } = self;
        let gate = station.gate();
        let mut retries: u32 = 0;

        loop {
            if !gate.wait_open(vehicle.category(), &token).await {
                return;
            }
            match station.serve(&vehicle, &token).await {
                Service::Completed => break,
                Service::Gated => {
                    tracing::debug!(vehicle = %vehicle.id(), "state changed after acquire, retrying admission");
                    if !gate.pause(retries, &token).await {
                        return;
                    }
                    retries = retries.saturating_add(1);
                }
                Service::Cancelled => return,
            }
        }

        station.hand_off(vehicle, &token).await;
    }
}
