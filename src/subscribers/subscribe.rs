//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for consuming workshop events (log
//! sinks, trackers, metrics). Each subscriber is driven by a dedicated worker
//! fed by a bounded queue owned by the [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Contract
//! - Each subscriber declares its queue capacity via [`Subscribe::queue_capacity`].
//! - `Entering` / `Leaving` are always delivered. While a subscriber's queue is
//!   full they wait, and a slow subscriber eventually slows the stations.
//! - Other kinds are **dropped** on overflow and a `SubscriberOverflow` event is published.
//!
//! ## Example
//! ```rust
//! use workshop::{Event, Subscribe};
//!
//! struct Departures;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for Departures {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.is_departure() {
//!             // count, alert, ...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "departures" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
