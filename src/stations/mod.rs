//! # Stations: resource-gated phase workers.
//!
//! The pipeline has four phases. Phase 0 is driven by one [`Admission`] task per
//! vehicle; phases 1–3 by [`StationWorker`]s pulling from a [`PhaseQueue`](crate::PhaseQueue).
//! Every worker of a phase shares one [`Station`]: the counted resource
//! (`tokio::sync::Semaphore`), input/output queues, timing policies and the bus.
//!
//! ## Per-vehicle cycle
//! ```text
//! pull (own vehicle | input.dequeue(snapshot))
//!   └─► gate: poll state until it admits the category (no permit held)
//!        └─► acquire permit
//!             ├─► re-check fails → release, requeue (or keep, phase 0), back off, retry
//!             └─► Entering → sleep(service) → Leaving → release
//!                  └─► output.enqueue(vehicle)   (final phase: journey ends)
//! ```
//!
//! ## Rules
//! - A permit is never held while gating; it is released on every exit path (RAII).
//! - `Entering` and `Leaving` for one vehicle/phase are published by one task, in order.
//! - Cancellation is honored at safe points only: dequeue, gating sleep, permit
//!   acquire, hand-off. A started service always finishes and emits `Leaving`.

mod admission;
mod gate;
mod phase;
mod station;
mod worker;

pub use admission::Admission;
pub use gate::Gate;
pub use phase::Phase;
pub use station::Station;
pub use worker::StationWorker;
