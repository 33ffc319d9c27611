//! # Station: everything the workers of one phase share.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};
use crate::policies::ServiceTimePolicy;
use crate::queue::PhaseQueue;
use crate::vehicles::Vehicle;

use super::{gate::Gate, phase::Phase};

/// Outcome of one service attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Service {
    /// `Entering` → service → `Leaving` happened; the permit is released.
    Completed,
    /// The state changed between gating and acquiring; the permit is released.
    Gated,
    /// Cancelled (or the pool closed) while waiting for a permit.
    Cancelled,
}

/// Shared resources of one phase.
///
/// ### Responsibilities
/// - **Resource accounting**: one counted pool (`Semaphore`) for all workers of the phase
/// - **Gating**: state checks before and after acquiring a unit
/// - **Event publishing**: `Entering` / `Leaving` / `Requeued`
/// - **Hand-off**: pushes served vehicles into the next phase queue
pub struct Station {
    phase: Phase,
    units: usize,
    resource: Arc<Semaphore>,
    input: Option<PhaseQueue>,
    output: Option<PhaseQueue>,
    gate: Gate,
    service: ServiceTimePolicy,
    bus: Bus,
    start: Instant,
}

impl Station {
    /// Creates a station with `units` interchangeable resource units (minimum 1).
    pub fn new(
        phase: Phase,
        units: usize,
        gate: Gate,
        service: ServiceTimePolicy,
        bus: Bus,
        start: Instant,
    ) -> Self {
        let units = units.max(1);
        Self {
            phase,
            units,
            resource: Arc::new(Semaphore::new(units)),
            input: None,
            output: None,
            gate,
            service,
            bus,
            start,
        }
    }

    /// Queue this station's workers pull from (phases 1–3).
    pub fn with_input(mut self, queue: PhaseQueue) -> Self {
        self.input = Some(queue);
        self
    }

    /// Queue served vehicles are pushed into (absent for the final phase).
    pub fn with_output(mut self, queue: PhaseQueue) -> Self {
        self.output = Some(queue);
        self
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Size of the resource pool.
    #[inline]
    pub fn units(&self) -> usize {
        self.units
    }

    /// Resource units not currently held.
    #[inline]
    pub fn available(&self) -> usize {
        self.resource.available_permits()
    }

    #[inline]
    pub fn input(&self) -> Option<&PhaseQueue> {
        self.input.as_ref()
    }

    #[inline]
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// Acquires a unit, re-validates the state, and performs the timed service.
    pub(super) async fn serve(&self, vehicle: &Vehicle, token: &CancellationToken) -> Service {
        let permit = tokio::select! {
            res = self.resource.clone().acquire_owned() => match res {
                Ok(permit) => permit,
                Err(_closed) => return Service::Cancelled,
            },
            _ = token.cancelled() => return Service::Cancelled,
        };

        if !self.gate.admits(vehicle.category()) {
            drop(permit);
            return Service::Gated;
        }

        self.bus
            .record(Event::entering(self.start.elapsed(), vehicle, self.phase))
            .await;
        time::sleep(self.service.duration(vehicle.category())).await;
        self.bus
            .record(Event::leaving(self.start.elapsed(), vehicle, self.phase))
            .await;

        drop(permit);
        Service::Completed
    }

    /// Publishes a `Requeued` event for `vehicle`.
    pub(super) fn publish_requeued(&self, vehicle: &Vehicle) {
        self.bus.publish(
            Event::new(EventKind::Requeued, self.start.elapsed())
                .with_vehicle(vehicle)
                .with_phase(self.phase)
                .with_state(self.gate.snapshot()),
        );
    }

    /// Pushes a served vehicle to the next phase. Returns `false` if the worker should stop.
    pub(super) async fn hand_off(&self, vehicle: Vehicle, token: &CancellationToken) -> bool {
        let Some(output) = &self.output else {
            tracing::trace!(vehicle = %vehicle.id(), "journey complete");
            return true;
        };

        let id = vehicle.id();
        tokio::select! {
            res = output.enqueue(vehicle) => match res {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(
                        phase = %self.phase,
                        vehicle = %id,
                        error = e.as_label(),
                        "hand-off failed, stopping"
                    );
                    false
                }
            },
            _ = token.cancelled() => false,
        }
    }
}
