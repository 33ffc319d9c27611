//! # Event subscribers.
//!
//! ```text
//! Station ── publish(Event) ──► Bus ──► SubscriberSet ──► Subscribe::on_event(&Event)
//!                                                │
//!                                  ┌─────────────┴─────────────┐
//!                                  ▼                           ▼
//!                              LogWriter                 ServiceTracker
//!                         (stdout progress lines)   (occupancy, completions)
//! ```
//!
//! - **Passive subscribers** observe and print ([`LogWriter`]).
//! - **Stateful subscribers** keep state derived from events ([`ServiceTracker`]).

mod set;
mod subscribe;
mod tracker;

#[cfg(feature = "logging")]
mod log;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
pub use tracker::{ServiceTracker, Transition};
