//! # Gate: "may this category be served right now?"
//!
//! Gating is backpressure, not failure: the check is repeated on the interval
//! given by [`BackoffPolicy`] (constant by default) for as long as it takes.

use tokio::sync::watch;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::policies::BackoffPolicy;
use crate::state::{OperatingState, StateHandle};
use crate::vehicles::Category;

/// Polls the operating state on behalf of one station.
#[derive(Clone, Debug)]
pub struct Gate {
    state: StateHandle,
    backoff: BackoffPolicy,
}

impl Gate {
    pub fn new(state: StateHandle, backoff: BackoffPolicy) -> Self {
        Self { state, backoff }
    }

    /// Current snapshot.
    #[inline]
    pub fn snapshot(&self) -> OperatingState {
        self.state.snapshot()
    }

    /// Receiver for later state changes.
    #[inline]
    pub fn watch(&self) -> watch::Receiver<OperatingState> {
        self.state.watch()
    }

    /// Single non-blocking check.
    #[inline]
    pub fn admits(&self, category: Category) -> bool {
        self.snapshot().admits(category)
    }

    /// Waits until the state admits `category`.
    ///
    /// Returns `false` if `token` was cancelled first.
    pub async fn wait_open(&self, category: Category, token: &CancellationToken) -> bool {
        let mut attempt: u32 = 0;
        while !self.admits(category) {
            if !self.pause(attempt, token).await {
                return false;
            }
            attempt = attempt.saturating_add(1);
        }
        true
    }

    /// Sleeps for the backoff of `attempt`; returns `false` if cancelled.
    pub async fn pause(&self, attempt: u32, token: &CancellationToken) -> bool {
        let sleep = time::sleep(self.backoff.next(attempt));
        tokio::pin!(sleep);
        tokio::select! {
            _ = &mut sleep => true,
            _ = token.cancelled() => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::time::Instant;

    use crate::events::Bus;
    use crate::policies::JitterPolicy;
    use crate::state::StateController;

    #[tokio::test(start_paused = true)]
    async fn test_growing_backoff_spaces_out_checks() {
        let start = Instant::now();
        let token = CancellationToken::new();
        let mut inactive = OperatingState::default();
        inactive.apply_code(0);
        let (ctrl, state) = StateController::with_state(8, Bus::new(8), start, inactive);
        ctrl.spawn(token.clone());

        let gate = Gate::new(
            state.clone(),
            BackoffPolicy {
                first: Duration::from_millis(100),
                max: Duration::from_millis(800),
                factor: 2.0,
                jitter: JitterPolicy::None,
            },
        );
        let waiter = {
            let token = token.clone();
            tokio::spawn(async move { gate.wait_open(Category::A, &token).await })
        };

        // checks happen at 100, 300, 700 and 1500ms
        time::sleep(Duration::from_millis(1000)).await;
        state.apply_and_confirm(1).await.unwrap();
        assert!(waiter.await.unwrap());

        let waited = start.elapsed();
        assert!(waited >= Duration::from_millis(1500), "{waited:?}");
        assert!(waited < Duration::from_millis(1600), "{waited:?}");
        token.cancel();
    }
}
