//! # Simulation: wires the whole workshop together.
//!
//! ```text
//!              SimulationBuilder::build()
//!                        │
//!   ┌────────────────────┼──────────────────────────────────────────────┐
//!   │ Bus ──► SubscriberSet (LogWriter, ServiceTracker, custom...)      │
//!   │ StateController ◄── codes                                         │
//!   │                                                                   │
//!   │ Admission×N ─► [Q1] ─► Mechanic×m ─► [Q2] ─► Cleaner×c ─► [Q3] ─► Deliverer×d
//!   │ (parking slots)                                                   │
//!   └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The topology is fire-and-forget: `build()` returns as soon as every task is
//! spawned. Completion is observed through events
//! ([`Simulation::wait_completed`]) and the run stops only on
//! [`Simulation::shutdown`] (or when the [`Simulation`] is dropped).

mod builder;
mod simulation;

pub use builder::SimulationBuilder;
pub use simulation::Simulation;
