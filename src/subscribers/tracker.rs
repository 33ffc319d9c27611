//! # ServiceTracker: who is inside which phase right now.
//!
//! Follows `Entering`/`Leaving` events and keeps, per phase, the set of vehicles
//! currently inside their service window, the peak size that set ever reached,
//! and how many vehicles have left the final phase.
//!
//! ```text
//! on_event(ev):
//!   ├─ Entering(v, p) ⇒ inside[p].insert(v), peak[p] = max(peak[p], |inside[p]|)
//!   ├─ Leaving(v, p)  ⇒ inside[p].remove(v); if p is final ⇒ completed += 1
//!   └─ otherwise: ignore
//! ```
//!
//! A duplicate `Entering` or a `Leaving` without a matching `Entering` is
//! tolerated, counted as an anomaly and logged.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::events::{Event, EventKind};
use crate::stations::Phase;
use crate::subscribers::Subscribe;
use crate::vehicles::VehicleId;

/// One observed phase transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub elapsed: Duration,
    pub vehicle: VehicleId,
    pub phase: Phase,
    pub kind: EventKind,
}

#[derive(Default)]
struct Inner {
    inside: [BTreeSet<VehicleId>; 4],
    peak: [usize; 4],
    anomalies: usize,
    log: Vec<Transition>,
}

/// Tracks per-phase occupancy and completed journeys.
pub struct ServiceTracker {
    inner: Mutex<Inner>,
    completed: watch::Sender<usize>,
    capacity: usize,
}

impl ServiceTracker {
    #[must_use]
    pub fn new() -> Self {
        let (completed, _) = watch::channel(0);
        Self {
            inner: Mutex::new(Inner::default()),
            completed,
            capacity: 8192,
        }
    }

    /// Configures the queue capacity for this subscriber.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Vehicles currently inside the service window of `phase`, in id order.
    #[must_use]
    pub fn in_service(&self, phase: Phase) -> Vec<VehicleId> {
        self.lock().inside[phase.index()].iter().copied().collect()
    }

    /// Largest number of vehicles ever seen inside `phase` at once.
    #[must_use]
    pub fn peak(&self, phase: Phase) -> usize {
        self.lock().peak[phase.index()]
    }

    /// Vehicles that have left the final phase.
    #[must_use]
    pub fn completed(&self) -> usize {
        *self.completed.borrow()
    }

    /// Count of unmatched or duplicated transitions.
    #[must_use]
    pub fn anomalies(&self) -> usize {
        self.lock().anomalies
    }

    /// Every transition seen so far, in arrival order.
    #[must_use]
    pub fn transitions(&self) -> Vec<Transition> {
        self.lock().log.clone()
    }

    /// Waits until at least `n` vehicles have completed; returns the count.
    pub async fn wait_completed(&self, n: usize) -> usize {
        let mut rx = self.completed.subscribe();
        match rx.wait_for(|done| *done >= n).await {
            Ok(done) => *done,
            Err(_) => self.completed(),
        }
    }

    fn record(&self, ev: &Event) {
        let (Some(vehicle), Some(phase)) = (ev.vehicle, ev.phase) else {
            return;
        };
        let slot = phase.index();
        let mut guard = self.lock();
        let inner = &mut *guard;
        inner.log.push(Transition {
            elapsed: ev.elapsed,
            vehicle,
            phase,
            kind: ev.kind,
        });

        match ev.kind {
            EventKind::Entering => {
                if !inner.inside[slot].insert(vehicle) {
                    inner.anomalies += 1;
                    tracing::warn!(%vehicle, %phase, "duplicate entering");
                }
                inner.peak[slot] = inner.peak[slot].max(inner.inside[slot].len());
            }
            EventKind::Leaving => {
                if !inner.inside[slot].remove(&vehicle) {
                    inner.anomalies += 1;
                    tracing::warn!(%vehicle, %phase, "leaving without entering");
                }
                if phase.is_final() {
                    drop(guard);
                    self.completed.send_modify(|done| *done += 1);
                }
            }
            _ => {}
        }
    }
}

impl Default for ServiceTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Subscribe for ServiceTracker {
    async fn on_event(&self, ev: &Event) {
        if ev.is_transition() {
            self.record(ev);
        }
    }

    fn name(&self) -> &'static str {
        "service_tracker"
    }

    fn queue_capacity(&self) -> usize {
        self.capacity
    }
}
