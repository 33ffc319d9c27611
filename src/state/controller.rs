//! # StateController: single serialized owner of the operating state.
//!
//! Codes are queued on a bounded `mpsc` channel and applied one at a time, in
//! arrival order, by one task. Each applied code replaces the whole
//! [`OperatingState`] inside a `watch` channel; readers copy the value out.
//!
//! ## Rules
//! - Codes are applied **strictly in arrival order** (single consumer).
//! - No-op codes (7, 8, out of range) never touch the state and publish nothing.
//! - `snapshot()` is synchronous and never blocks on a pending code.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use workshop::{Bus, Category, StateController};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (controller, handle) = StateController::new(16, Bus::new(16), tokio::time::Instant::now());
//! controller.spawn(CancellationToken::new());
//!
//! let state = handle.apply_and_confirm(2).await.unwrap();
//! assert_eq!(state.restricted, Some(Category::B));
//! assert_eq!(handle.snapshot().restricted, Some(Category::B));
//! # }
//! ```

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event};

use super::{error::ControlError, operating::OperatingState};

/// One queued code, optionally with a confirmation channel.
struct ControlMsg {
    code: u8,
    ack: Option<oneshot::Sender<OperatingState>>,
}

/// Handle for submitting codes and reading the current state.
#[derive(Clone, Debug)]
pub struct StateHandle {
    codes: mpsc::Sender<ControlMsg>,
    state: watch::Receiver<OperatingState>,
}

impl StateHandle {
    /// Queues a code (async, waits if the code queue is full).
    pub async fn apply_code(&self, code: u8) -> Result<(), ControlError> {
        self.codes
            .send(ControlMsg { code, ack: None })
            .await
            .map_err(|_| ControlError::Closed)
    }

    /// Tries to queue a code without waiting.
    pub fn try_apply_code(&self, code: u8) -> Result<(), ControlError> {
        self.codes
            .try_send(ControlMsg { code, ack: None })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => ControlError::Full,
                mpsc::error::TrySendError::Closed(_) => ControlError::Closed,
            })
    }

    /// Queues a code and waits until the controller has processed it.
    ///
    /// Returns the state right after this code (unchanged for no-op codes).
    pub async fn apply_and_confirm(&self, code: u8) -> Result<OperatingState, ControlError> {
        let (tx, rx) = oneshot::channel();
        self.codes
            .send(ControlMsg { code, ack: Some(tx) })
            .await
            .map_err(|_| ControlError::Closed)?;
        rx.await.map_err(|_| ControlError::Closed)
    }

    /// Returns a copy of the current state.
    #[inline]
    pub fn snapshot(&self) -> OperatingState {
        *self.state.borrow()
    }

    /// Receiver that observes every later state change.
    pub fn watch(&self) -> watch::Receiver<OperatingState> {
        self.state.clone()
    }

    /// Waits until the state satisfies `pred` and returns that snapshot.
    ///
    /// Checks the current value first, so it returns immediately if it already matches.
    pub async fn wait_until(
        &self,
        mut pred: impl FnMut(&OperatingState) -> bool,
    ) -> Result<OperatingState, ControlError> {
        let mut rx = self.state.clone();
        let state = rx
            .wait_for(|s| pred(s))
            .await
            .map_err(|_| ControlError::Closed)?;
        Ok(*state)
    }
}

/// Owner of the operating state. Build with [`StateController::new`], then
/// [`run`](StateController::run) or [`spawn`](StateController::spawn) it.
pub struct StateController {
    codes: mpsc::Receiver<ControlMsg>,
    state: watch::Sender<OperatingState>,
    bus: Bus,
    start: Instant,
}

impl StateController {
    /// Creates the controller and its first handle.
    ///
    /// `capacity` bounds the pending-code queue (minimum 1).
    pub fn new(capacity: usize, bus: Bus, start: Instant) -> (Self, StateHandle) {
        Self::with_state(capacity, bus, start, OperatingState::default())
    }

    /// Like [`new`](Self::new), but starting from `initial` instead of the default state.
    pub fn with_state(
        capacity: usize,
        bus: Bus,
        start: Instant,
        initial: OperatingState,
    ) -> (Self, StateHandle) {
        let (codes_tx, codes_rx) = mpsc::channel(capacity.max(1));
        let (state_tx, state_rx) = watch::channel(initial);

        let controller = Self {
            codes: codes_rx,
            state: state_tx,
            bus,
            start,
        };
        let handle = StateHandle {
            codes: codes_tx,
            state: state_rx,
        };
        (controller, handle)
    }

    /// Starts the controller loop in the background.
    pub fn spawn(self, token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(token))
    }

    /// Applies codes until cancelled or every handle is dropped.
    pub async fn run(mut self, token: CancellationToken) {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                msg = self.codes.recv() => match msg {
                    Some(msg) => self.handle(msg),
                    None => break,
                },
            }
        }
        tracing::debug!("state controller stopped");
    }

    fn handle(&self, msg: ControlMsg) {
        let current = *self.state.borrow();
        let state = match current.transition(msg.code) {
            Some(next) => {
                self.state.send_replace(next);
                tracing::info!(code = msg.code, state = %next, "operating state changed");
                self.bus.publish(Event::state_changed(
                    self.start.elapsed(),
                    msg.code,
                    next,
                ));
                next
            }
            None => {
                tracing::debug!(code = msg.code, "ignored no-op control code");
                current
            }
        };

        if let Some(ack) = msg.ack {
            let _ = ack.send(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::vehicles::Category;

    fn start() -> (StateHandle, Bus, CancellationToken) {
        let bus = Bus::new(64);
        let (ctrl, handle) = StateController::new(8, bus.clone(), Instant::now());
        let token = CancellationToken::new();
        ctrl.spawn(token.clone());
        (handle, bus, token)
    }

    #[tokio::test]
    async fn test_codes_applied_in_order() {
        let (handle, _bus, _token) = start();
        for code in [1, 5, 0, 3] {
            handle.apply_code(code).await.unwrap();
        }
        let s = handle.apply_and_confirm(7).await.unwrap();
        assert!(!s.active);
        assert_eq!(s.restricted, Some(Category::C));
        assert_eq!(s.priority, Some(Category::B));
    }

    #[tokio::test]
    async fn test_state_changed_published_only_for_transitions() {
        let (handle, bus, _token) = start();
        let mut rx = bus.subscribe();

        handle.apply_and_confirm(8).await.unwrap();
        handle.apply_and_confirm(42).await.unwrap();
        handle.apply_and_confirm(9).await.unwrap();

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::StateChanged);
        assert_eq!(ev.code, Some(9));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_wait_until_sees_later_change() {
        let (handle, _bus, _token) = start();
        let waiter = {
            let handle = handle.clone();
            tokio::spawn(async move { handle.wait_until(|s| s.closed).await })
        };
        handle.apply_code(9).await.unwrap();
        let s = waiter.await.unwrap().unwrap();
        assert!(s.closed);
    }

    #[tokio::test]
    async fn test_closed_after_cancel() {
        let bus = Bus::new(8);
        let (ctrl, handle) = StateController::new(8, bus, Instant::now());
        let token = CancellationToken::new();
        let join = ctrl.spawn(token.clone());
        token.cancel();
        join.await.unwrap();
        let err = handle.apply_and_confirm(1).await.unwrap_err();
        assert_eq!(err, ControlError::Closed);
        assert_eq!(handle.snapshot(), OperatingState::default());
    }
}
