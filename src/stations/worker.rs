//! # StationWorker: one resource unit's loop for phases 1–3.
//!
//! ```text
//! loop {
//!   ├─► dequeue(current snapshot)          (re-issued on state change, cancellable)
//!   ├─► gate.wait_open(category)           (no permit held)
//!   ├─► station.serve()
//!   │     ├─ Completed → hand_off(next queue)
//!   │     ├─ Gated     → publish Requeued, requeue into input, pause, next
//!   │     └─ Cancelled → exit
//!   └─► repeat
//! }
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::queue::PhaseQueue;
use crate::vehicles::Vehicle;

use super::station::{Service, Station};

/// What to do after attending one vehicle.
enum Step {
    Forward(Vehicle),
    Retry,
    Stop,
}

/// Worker pulling from a station's input queue until cancelled.
pub struct StationWorker {
    station: Arc<Station>,
    index: usize,
}

impl StationWorker {
    pub fn new(station: Arc<Station>, index: usize) -> Self {
        Self { station, index }
    }

    /// Runs until `token` is cancelled or a queue closes.
    pub async fn run(self, token: CancellationToken) {
        let phase = self.station.phase();
        let Some(input) = self.station.input().cloned() else {
            tracing::warn!(%phase, worker = self.index, "station has no input queue");
            return;
        };

        let mut changes = self.station.gate().watch();
        loop {
            let snapshot = *changes.borrow_and_update();
            let interrupt = async {
                tokio::select! {
                    _ = token.cancelled() => {}
                    res = changes.changed() => {
                        if res.is_err() {
                            token.cancelled().await;
                        }
                    }
                }
            };

            let vehicle = match input.dequeue_until(snapshot, interrupt).await {
                Ok(Some(vehicle)) => vehicle,
                Ok(None) if token.is_cancelled() => break,
                // State changed while parked; ask again with the new snapshot.
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(%phase, worker = self.index, error = e.as_label(), "input queue closed");
                    break;
                }
            };

            match self.attend(&input, vehicle, &token).await {
                Step::Forward(vehicle) => {
                    if !self.station.hand_off(vehicle, &token).await {
                        break;
                    }
                }
                Step::Retry => continue,
                Step::Stop => break,
            }
        }
        tracing::debug!(%phase, worker = self.index, "station worker stopped");
    }

    async fn attend(&self, input: &PhaseQueue, vehicle: Vehicle, token: &CancellationToken) -> Step {
        let gate = self.station.gate();
        if !gate.wait_open(vehicle.category(), token).await {
            tracing::debug!(vehicle = %vehicle.id(), "dropped on shutdown");
            return Step::Stop;
        }

        match self.station.serve(&vehicle, token).await {
            Service::Completed => Step::Forward(vehicle),
            Service::Gated => {
                tracing::debug!(
                    phase = %self.station.phase(),
                    vehicle = %vehicle.id(),
                    "state changed after acquire, requeueing"
                );
                self.station.publish_requeued(&vehicle);
                // Parks while the input is full. Workers equal units, so a permit is
                // only lost to a state change, never to another worker. With more
                // workers than units they could all park here and nobody would dequeue.
                if let Err(e) = input.requeue(vehicle).await {
                    tracing::warn!(error = e.as_label(), "requeue failed");
                    return Step::Stop;
                }
                if gate.pause(0, token).await {
                    Step::Retry
                } else {
                    Step::Stop
                }
            }
            Service::Cancelled => Step::Stop,
        }
    }
}
