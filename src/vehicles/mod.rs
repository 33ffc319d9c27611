//! # Vehicles: the work items flowing through the workshop.
//!
//! - [`Category`] fixed class of a vehicle (A/B/C), drives queue bucket and service time;
//! - [`Incident`] human-readable label derived from the category;
//! - [`Vehicle`] immutable item with a unique [`VehicleId`];
//! - [`Fleet`] generation of the initial vehicles in bulk order plus shuffle.
//!
//! ## Ownership
//! ```text
//! Fleet ──► Admission (phase 0) ──► PhaseQueue ──► StationWorker ──► PhaseQueue ──► ...
//! ```
//! A vehicle is moved (never cloned) across every boundary, so at most one stage holds it.

mod category;
mod fleet;
mod vehicle;

pub use category::{Category, Incident};
pub use fleet::Fleet;
pub use vehicle::{Vehicle, VehicleId};
