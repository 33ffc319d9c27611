//! # workshop
//!
//! **workshop** simulates a vehicle repair shop as a pipeline of concurrent
//! stages. Vehicles of three categories pass through four phases (parking,
//! mechanic, cleaning, delivery), each with a bounded pool of interchangeable
//! resource units, connected by bounded priority-aware queues. An asynchronous
//! stream of control codes changes which categories may be served at any moment.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   control codes (0..=9)
//!          │  CodeDecoder::pump / StateHandle::apply_code
//!          ▼
//!   ┌──────────────────┐   watch<OperatingState>   ┌────────────────────────────┐
//!   │ StateController  │ ─────────────────────────►│ Gate (one per Station)     │
//!   └────────┬─────────┘                            └────────────┬───────────────┘
//!            │ StateChanged                                      │ admits(category)?
//!            ▼                                                   ▼
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │ Admission×N ─► [Q1] ─► StationWorker×m ─► [Q2] ─► ... ─► [Q3] ─► ...     │
//!   │  (phase 0)             (phase 1)                          (phase 3)      │
//!   │  each phase: Semaphore(pool)  ─  Entering ─ sleep(service) ─ Leaving     │
//!   └───────────────────────────────┬──────────────────────────────────────────┘
//!                                   │ record(Event)
//!                                   ▼
//!              Bus (journal mpsc + broadcast ring) ──► SubscriberSet
//!                                          ├─► LogWriter
//!                                          ├─► ServiceTracker
//!                                          └─► custom Subscribe impls
//! ```
//!
//! ### Worker loop (phases 1–3)
//! ```text
//! loop {
//!   ├─► dequeue(current snapshot)       parks until an eligible vehicle exists
//!   ├─► gate: wait until state admits the vehicle's category
//!   ├─► acquire a unit of the phase pool
//!   ├─► re-check the state
//!   │     └─ forbidden ─► release, Requeued, back into the input queue, retry
//!   ├─► Entering ─► service time ─► Leaving ─► release
//!   └─► enqueue into the next phase queue (if any)
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types                                   |
//! |-------------------|----------------------------------------------------------|---------------------------------------------|
//! | **Control**       | Code table, serialized state owner, snapshots            | [`OperatingState`], [`StateController`]     |
//! | **Queues**        | Bounded category buckets with restriction/priority       | [`PhaseQueue`], [`QueueStats`]              |
//! | **Stations**      | Resource pools, gating, timed service                    | [`Station`], [`StationWorker`], [`Admission`] |
//! | **Events**        | Transition/control events and fan-out                    | [`Event`], [`Bus`], [`Subscribe`]           |
//! | **Orchestration** | Wiring, completion tracking, cooperative stop            | [`Simulation`], [`ServiceTracker`]          |
//! | **Configuration** | Fleet, pools, capacities, timing                         | [`Config`], [`ServiceTimePolicy`]           |
//!
//! ## Optional features
//! - `logging`: exports the built-in stdout [`LogWriter`] (enabled by default).
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use workshop::{Config, JitterPolicy, Simulation};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::default();
//!     cfg.count_a = 1;
//!     cfg.count_b = 1;
//!     cfg.count_c = 1;
//!     cfg.service = cfg.service.scaled(0.001);
//!     cfg.service.jitter = JitterPolicy::None;
//!     cfg.gate_backoff.first = Duration::from_millis(5);
//!     cfg.gate_backoff.max = Duration::from_millis(5);
//!
//!     let sim = Simulation::builder(cfg).build()?;
//!     sim.state().apply_code(6).await?; // priority C
//!
//!     assert_eq!(sim.wait_completed().await, 3);
//!     sim.shutdown().await;
//!     Ok(())
//! }
//! ```

mod config;
mod decoder;
mod error;
mod shutdown;

pub mod events;
pub mod policies;
pub mod queue;
pub mod sim;
pub mod state;
pub mod stations;
pub mod subscribers;
pub mod vehicles;

// ---- Public re-exports ----

pub use config::Config;
pub use decoder::CodeDecoder;
pub use error::{ConfigError, QueueError};
pub use events::{Bus, Event, EventKind};
pub use policies::{BackoffPolicy, JitterPolicy, ServiceTimePolicy};
pub use queue::{PhaseQueue, QueueStats};
pub use shutdown::{ShutdownSignal, shutdown_signal};
pub use sim::{Simulation, SimulationBuilder};
pub use state::{ControlError, OperatingState, StateController, StateHandle};
pub use stations::{Admission, Gate, Phase, Station, StationWorker};
pub use subscribers::{ServiceTracker, Subscribe, SubscriberSet, Transition};
pub use vehicles::{Category, Fleet, Incident, Vehicle, VehicleId};

#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
