//! # Event bus for workshop events.
//!
//! [`Bus`] wraps two channels:
//! - a [`tokio::sync::broadcast`] ring for every event, published without blocking;
//! - an optional bounded [`tokio::sync::mpsc`] journal for `Entering` / `Leaving`,
//!   written with `send().await` so transitions are never dropped.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                       Subscribers:
//!   Admission  ──┐      record()
//!   Station N  ──┼──► journal (mpsc) ──────► SubscriberSet listener ──► LogWriter / ServiceTracker
//!   Controller ──┘──► ring (broadcast) ────► SubscriberSet listener (diagnostic kinds only)
//!                                      └───► direct Bus::subscribe() receivers
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; used for diagnostic kinds.
//! - **Backpressure on record**: `record()` waits for journal room; a slow subscriber slows the stations.
//! - **Lag handling**: slow ring receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: ring events are lost if there are no active receivers at send time.

use tokio::sync::{broadcast, mpsc};

use super::event::Event;

/// Event channels shared by every publisher of a simulation.
///
/// ### Properties
/// - **Ring**: `publish()` returns immediately, no delivery guarantee.
/// - **Journal**: `record()` delivers transitions in order, waiting for room.
/// - **Cloneable**: cheap to clone (`Arc`-backed senders).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
    journal: Option<mpsc::Sender<Event>>,
}

impl Bus {
    /// Creates a ring-only bus with the given channel capacity (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx, journal: None }
    }

    /// Creates a bus whose transitions are also written to a bounded journal.
    ///
    /// Both channels get `capacity` (minimum 1). The returned receiver is the
    /// only consumer of the journal.
    pub fn with_journal(capacity: usize) -> (Self, mpsc::Receiver<Event>) {
        let mut bus = Self::new(capacity);
        let (jtx, jrx) = mpsc::channel::<Event>(capacity.max(1));
        bus.journal = Some(jtx);
        (bus, jrx)
    }

    /// Publishes an event to all active ring receivers.
    ///
    /// If there are no receivers, the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Writes a transition to the journal, waiting for room, then publishes it on the ring.
    pub async fn record(&self, ev: Event) {
        if let Some(journal) = &self.journal {
            if journal.send(ev.clone()).await.is_err() {
                tracing::warn!(kind = ev.kind.as_label(), "journal closed, transition only on the ring");
            }
        }
        self.publish(ev);
    }

    /// Creates a new ring receiver that will observe subsequent events.
    ///
    /// A receiver only gets events **sent after** it subscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Number of live ring receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_publish_without_receivers_is_noop() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::StateChanged, Duration::ZERO));
        assert_eq!(bus.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_receiver_sees_events_after_subscribe() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::StateChanged, Duration::from_millis(5)));
        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.kind, EventKind::StateChanged);
        assert_eq!(ev.elapsed, Duration::from_millis(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_record_waits_for_journal_room() {
        let (bus, mut journal) = Bus::with_journal(1);
        let vehicle = crate::vehicles::Vehicle::new(1, crate::vehicles::Category::A);
        let phase = crate::stations::Phase::Parking;

        bus.record(Event::entering(Duration::ZERO, &vehicle, phase)).await;
        let blocked = tokio::time::timeout(
            Duration::from_secs(1),
            bus.record(Event::leaving(Duration::from_secs(5), &vehicle, phase)),
        )
        .await;
        assert!(blocked.is_err(), "second record must wait while the journal is full");

        let pending = {
            let bus = bus.clone();
            let ev = Event::leaving(Duration::from_secs(5), &vehicle, phase);
            tokio::spawn(async move {
                bus.record(ev).await;
            })
        };
        assert_eq!(journal.recv().await.map(|e| e.kind), Some(EventKind::Entering));
        pending.await.unwrap();
        assert_eq!(journal.recv().await.map(|e| e.kind), Some(EventKind::Leaving));
    }
}
