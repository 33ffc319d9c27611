//! # Operating state: the admission policy driven by control codes.
//!
//! - [`OperatingState`] immutable snapshot (`active`, `closed`, restriction, priority)
//!   plus the code → transition table;
//! - [`StateController`] single owner that applies codes strictly in arrival order;
//! - [`StateHandle`] cloneable handle: submit codes, read snapshots.
//!
//! ## Architecture
//! ```text
//!   decoder / caller ── apply_code(u8) ──► mpsc ──► StateController::run()
//!                                                        │  (one task, sequential)
//!                                                        ▼
//!                                              watch::Sender<OperatingState>
//!                                                        │  send_replace (whole value)
//!            ┌───────────────────┬───────────────────────┤
//!            ▼                   ▼                       ▼
//!     StateHandle::snapshot  StationWorker gating   Admission gating
//! ```
//!
//! Readers copy the whole value out of the watch channel, so a snapshot is
//! never torn across fields.

mod controller;
mod error;
mod operating;

pub use controller::{StateController, StateHandle};
pub use error::ControlError;
pub use operating::OperatingState;
