//! # QueueActor: the single owner of a phase queue's data.
//!
//! ## Loop
//! ```text
//! while let Some(cmd) = rx.recv() {
//!   ├─► Enqueue  → room ? push_back + ack : park (tail of pending)
//!   ├─► Requeue  → room ? push_front + ack : park (head of pending)
//!   ├─► Dequeue  → park (tail of waiters)
//!   ├─► Stats    → reply
//!   └─► settle():
//!         repeat until no progress:
//!           ├─ serve waiters oldest-first, each with its own snapshot
//!           └─ admit pending enqueues while there is room
//! }
//! ```
//! Every match is done here, synchronously, by replying on the waiter's oneshot;
//! the dequeuer never has to run first for a handoff to happen.

use std::collections::VecDeque;

use tokio::sync::{mpsc, oneshot};

use crate::stations::Phase;
use crate::state::OperatingState;
use crate::vehicles::Vehicle;

use super::buckets::{Buckets, QueueStats};

/// Requests served by the actor.
pub(super) enum Command {
    Enqueue {
        vehicle: Vehicle,
        reply: oneshot::Sender<()>,
    },
    Requeue {
        vehicle: Vehicle,
        reply: oneshot::Sender<()>,
    },
    Dequeue {
        snapshot: OperatingState,
        reply: oneshot::Sender<Vehicle>,
    },
    Stats {
        reply: oneshot::Sender<QueueStats>,
    },
}

/// Enqueue request waiting for room.
struct Pending {
    vehicle: Vehicle,
    front: bool,
    reply: oneshot::Sender<()>,
}

/// Dequeue request waiting for an eligible vehicle.
struct Waiter {
    snapshot: OperatingState,
    reply: oneshot::Sender<Vehicle>,
}

pub(super) struct QueueActor {
    phase: Phase,
    buckets: Buckets,
    pending: VecDeque<Pending>,
    waiters: VecDeque<Waiter>,
    rx: mpsc::Receiver<Command>,
}

impl QueueActor {
    pub(super) fn new(phase: Phase, capacity: usize, rx: mpsc::Receiver<Command>) -> Self {
        Self {
            phase,
            buckets: Buckets::new(capacity),
            pending: VecDeque::new(),
            waiters: VecDeque::new(),
            rx,
        }
    }

    /// Serves commands until every [`PhaseQueue`](super::PhaseQueue) handle is dropped.
    pub(super) async fn run(mut self) {
        while let Some(cmd) = self.rx.recv().await {
            self.handle(cmd);
            self.settle();
            debug_assert!(
                self.buckets.len() <= self.buckets.capacity(),
                "phase queue over capacity"
            );
        }
        tracing::debug!(
            phase = %self.phase,
            held = self.buckets.len(),
            "phase queue stopped"
        );
    }

    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Enqueue { vehicle, reply } => self.offer(vehicle, false, reply),
            Command::Requeue { vehicle, reply } => self.offer(vehicle, true, reply),
            Command::Dequeue { snapshot, reply } => {
                self.waiters.push_back(Waiter { snapshot, reply });
            }
            Command::Stats { reply } => {
                let _ = reply.send(self.stats());
            }
        }
    }

    fn offer(&mut self, vehicle: Vehicle, front: bool, reply: oneshot::Sender<()>) {
        if self.buckets.has_room() {
            self.insert(vehicle, front);
            let _ = reply.send(());
            return;
        }

        tracing::debug!(
            phase = %self.phase,
            vehicle = %vehicle.id(),
            front,
            "queue full, enqueue parked"
        );
        let pending = Pending {
            vehicle,
            front,
            reply,
        };
        if front {
            self.pending.push_front(pending);
        } else {
            self.pending.push_back(pending);
        }
    }

    fn insert(&mut self, vehicle: Vehicle, front: bool) {
        if front {
            self.buckets.push_front(vehicle);
        } else {
            self.buckets.push_back(vehicle);
        }
    }

    /// Matches parked requests against the buckets until nothing moves.
    fn settle(&mut self) {
        self.waiters.retain(|w| !w.reply.is_closed());
        loop {
            let served = self.serve_waiters();
            let admitted = self.admit_pending();
            if !served && !admitted {
                break;
            }
        }
    }

    fn serve_waiters(&mut self) -> bool {
        let mut progressed = false;
        let mut i = 0;

        while i < self.waiters.len() && !self.buckets.is_empty() {
            if self.waiters[i].reply.is_closed() {
                self.waiters.remove(i);
                continue;
            }
            let Some(vehicle) = self.buckets.select(&self.waiters[i].snapshot) else {
                i += 1;
                continue;
            };
            let Some(waiter) = self.waiters.remove(i) else {
                break;
            };
            match waiter.reply.send(vehicle) {
                Ok(()) => progressed = true,
                // Caller gave up between the check and the send.
                Err(vehicle) => self.buckets.push_front(vehicle),
            }
        }
        progressed
    }

    fn admit_pending(&mut self) -> bool {
        let mut progressed = false;
        while self.buckets.has_room() {
            let Some(p) = self.pending.pop_front() else {
                break;
            };
            self.insert(p.vehicle, p.front);
            let _ = p.reply.send(());
            progressed = true;
        }
        progressed
    }

    fn stats(&self) -> QueueStats {
        QueueStats {
            capacity: self.buckets.capacity(),
            held: self.buckets.counts(),
            parked_enqueues: self.pending.len(),
            parked_dequeues: self.waiters.len(),
        }
    }
}
