//! # Event fan-out to multiple subscribers.
//!
//! ```text
//! journal ──► listener ──► deliver(event)     (waits for room)
//! ring    ──► listener ──► emit_arc(event)    (drops on overflow)
//!                             │
//!                             ├──► [queue 1] ──► worker 1 ──► sub1.on_event()
//!                             │    (bounded)        └──────► panic → SubscriberPanicked
//!                             └──► [queue N] ──► worker N ──► subN.on_event()
//! ```
//!
//! ## Rules
//! - **Per-subscriber FIFO**, no ordering across subscribers.
//! - **Transitions are lossless**: `Entering` / `Leaving` wait for queue room.
//! - **Overflow**: a diagnostic event is dropped for that subscriber only, `SubscriberOverflow` published.
//! - **Isolation**: a panicking subscriber is reported and keeps receiving events.

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};

use super::Subscribe;

struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator: one bounded queue and one worker task per subscriber.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates the set and spawns one worker per subscriber.
    ///
    /// `bus` receives `SubscriberOverflow` / `SubscriberPanicked` reports.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));
            let report = bus.clone();

            workers.push(tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());
                    if let Err(panic) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = panic
                            .downcast_ref::<&'static str>()
                            .map(|s| (*s).to_string())
                            .or_else(|| panic.downcast_ref::<String>().cloned())
                            .unwrap_or_else(|| "unknown panic".to_string());
                        tracing::warn!(subscriber = sub.name(), %info, "subscriber panicked");
                        report.publish(Event::subscriber_panicked(sub.name(), info));
                    }
                }
            }));
            channels.push(SubscriberChannel { name, sender: tx });
        }

        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Emits an event to all subscribers (clones the event).
    pub fn emit(&self, event: &Event) {
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Emits a shared event to all subscribers without waiting.
    ///
    /// Overflow reports are never re-reported when they overflow themselves.
    pub fn emit_arc(&self, event: Arc<Event>) {
        let is_overflow = event.kind == EventKind::SubscriberOverflow;

        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if !is_overflow {
                tracing::warn!(subscriber = channel.name, reason, "subscriber dropped event");
                self.bus
                    .publish(Event::subscriber_overflow(channel.name, reason));
            }
        }
    }

    /// Delivers a shared event to all subscribers, waiting for queue room.
    ///
    /// A closed queue (its worker is gone) is reported like an overflow.
    pub async fn deliver(&self, event: Arc<Event>) {
        for channel in &self.channels {
            if channel.sender.send(Arc::clone(&event)).await.is_err() {
                tracing::warn!(subscriber = channel.name, "subscriber queue closed");
                self.bus
                    .publish(Event::subscriber_overflow(channel.name, "closed"));
            }
        }
    }

    /// Forwards events to the subscribers until `token` is cancelled or the
    /// ring closes, then empties the journal and shuts the workers down.
    ///
    /// Transitions come from `journal`. The ring only contributes the other
    /// kinds, since every transition is written to both.
    pub fn listen(
        self,
        mut ring: broadcast::Receiver<Event>,
        mut journal: mpsc::Receiver<Event>,
        token: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    Some(ev) = journal.recv() => self.deliver(Arc::new(ev)).await,
                    msg = ring.recv() => match msg {
                        Ok(ev) if ev.is_transition() => {}
                        Ok(ev) => self.emit_arc(Arc::new(ev)),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "subscriber listener lagged behind the ring");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = token.cancelled() => break,
                }
            }
            journal.close();
            while let Some(ev) = journal.recv().await {
                self.deliver(Arc::new(ev)).await;
            }
            self.shutdown().await;
        })
    }

    /// Closes all queues and waits for the workers to drain them.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}
