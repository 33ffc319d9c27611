//! # Events emitted by the workshop pipeline.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Phase transitions**: a vehicle entering or leaving a phase (the log stream)
//! - **Control events**: operating state changes, requeued vehicles
//! - **Subscriber events**: overflow and panics inside subscriber workers
//!
//! The [`Event`] struct carries optional metadata such as the vehicle, phase and
//! state snapshot, depending on the kind.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! For one vehicle in one phase, `Entering` is always published before `Leaving`.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use workshop::{Category, Event, EventKind, Phase, Vehicle};
//!
//! let car = Vehicle::new(7, Category::B);
//! let ev = Event::entering(Duration::from_millis(1500), &car, Phase::Mechanic);
//!
//! assert_eq!(ev.kind, EventKind::Entering);
//! assert_eq!(ev.vehicle.map(|v| v.0), Some(7));
//! assert_eq!(ev.incident.map(|i| i.as_label()), Some("electrical"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::Duration;

use crate::stations::Phase;
use crate::state::OperatingState;
use crate::vehicles::{Category, Incident, Vehicle, VehicleId};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of workshop events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Phase transitions ===
    /// Vehicle acquired a resource unit and started its timed service.
    ///
    /// Sets: `vehicle`, `category`, `incident`, `phase`, `elapsed`, `seq`.
    Entering,

    /// Vehicle finished its timed service; the resource unit is released next.
    ///
    /// Sets: `vehicle`, `category`, `incident`, `phase`, `elapsed`, `seq`.
    Leaving,

    // === Control ===
    /// The state controller applied a transition code.
    ///
    /// Sets: `code`, `state` (the new snapshot), `elapsed`, `seq`.
    StateChanged,

    /// The post-acquire re-check failed; the vehicle went back to its input queue.
    ///
    /// Sets: `vehicle`, `category`, `phase`, `state` (the gating snapshot), `elapsed`, `seq`.
    Requeued,

    // === Subscriber events ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `source` (subscriber name), `reason`.
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `source` (subscriber name), `reason` (panic info).
    SubscriberPanicked,
}

impl EventKind {
    /// Returns a short stable label for log lines.
    pub fn as_label(self) -> &'static str {
        match self {
            EventKind::Entering => "Entering",
            EventKind::Leaving => "Leaving",
            EventKind::StateChanged => "StateChanged",
            EventKind::Requeued => "Requeued",
            EventKind::SubscriberOverflow => "SubscriberOverflow",
            EventKind::SubscriberPanicked => "SubscriberPanicked",
        }
    }
}

/// Workshop event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `elapsed`: time since simulation start
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Elapsed time since the simulation clock started.
    pub elapsed: Duration,
    /// Event classification.
    pub kind: EventKind,

    /// Vehicle the event refers to.
    pub vehicle: Option<VehicleId>,
    /// Category of that vehicle.
    pub category: Option<Category>,
    /// Category-derived incident label.
    pub incident: Option<Incident>,
    /// Phase the event happened in.
    pub phase: Option<Phase>,
    /// Operating state snapshot.
    pub state: Option<OperatingState>,
    /// Control code that produced `state`.
    pub code: Option<u8>,
    /// Emitting component (subscriber name for subscriber events).
    pub source: Option<&'static str>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the next sequence number.
    pub fn new(kind: EventKind, elapsed: Duration) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            elapsed,
            kind,
            vehicle: None,
            category: None,
            incident: None,
            phase: None,
            state: None,
            code: None,
            source: None,
            reason: None,
        }
    }

    /// `Entering` event for `vehicle` in `phase`.
    pub fn entering(elapsed: Duration, vehicle: &Vehicle, phase: Phase) -> Self {
        Event::new(EventKind::Entering, elapsed)
            .with_vehicle(vehicle)
            .with_phase(phase)
    }

    /// `Leaving` event for `vehicle` in `phase`.
    pub fn leaving(elapsed: Duration, vehicle: &Vehicle, phase: Phase) -> Self {
        Event::new(EventKind::Leaving, elapsed)
            .with_vehicle(vehicle)
            .with_phase(phase)
    }

    /// `StateChanged` event after applying `code`.
    pub fn state_changed(elapsed: Duration, code: u8, state: OperatingState) -> Self {
        let mut ev = Event::new(EventKind::StateChanged, elapsed).with_state(state);
        ev.code = Some(code);
        ev
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow, Duration::ZERO)
            .with_source(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked, Duration::ZERO)
            .with_source(subscriber)
            .with_reason(info)
    }

    /// Attaches vehicle id, category and incident.
    #[inline]
    pub fn with_vehicle(mut self, vehicle: &Vehicle) -> Self {
        self.vehicle = Some(vehicle.id());
        self.category = Some(vehicle.category());
        self.incident = Some(vehicle.incident());
        self
    }

    /// Attaches a phase.
    #[inline]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Attaches an operating state snapshot.
    #[inline]
    pub fn with_state(mut self, state: OperatingState) -> Self {
        self.state = Some(state);
        self
    }

    /// Attaches the emitting component name.
    #[inline]
    pub fn with_source(mut self, source: &'static str) -> Self {
        self.source = Some(source);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// True for `Entering`/`Leaving`.
    #[inline]
    pub fn is_transition(&self) -> bool {
        matches!(self.kind, EventKind::Entering | EventKind::Leaving)
    }

    /// True for a `Leaving` event of the final phase (journey completed).
    #[inline]
    pub fn is_departure(&self) -> bool {
        self.kind == EventKind::Leaving && self.phase.is_some_and(Phase::is_final)
    }
}
