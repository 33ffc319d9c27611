//! Timing policies.
//!
//! This module groups the knobs that control **how long** things take:
//!
//! ## Contents
//! - [`BackoffPolicy`] polling interval while a station waits for the state to permit service
//! - [`JitterPolicy`]  randomization applied to a base delay
//! - [`ServiceTimePolicy`] per-category service duration with jitter and a floor
//!
//! ## Quick wiring
//! ```text
//! Config { gate_backoff: BackoffPolicy, service: ServiceTimePolicy, .. }
//!      └─► stations::Station uses:
//!           - gate_backoff.next(attempt) between gating checks
//!           - service.duration(category) for the timed service
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → constant 200ms, no jitter.
//! - `ServiceTimePolicy::default()` → A=5s, B=3s, C=1s, scale 1.0, ±20%, floor 10ms.

mod backoff;
mod jitter;
mod service;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use service::ServiceTimePolicy;
