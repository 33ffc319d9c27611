use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::QueueError;
use crate::events::{Bus, Event};
use crate::queue::{PhaseQueue, QueueStats};
use crate::state::StateHandle;
use crate::stations::{Phase, Station};
use crate::subscribers::ServiceTracker;

use super::builder::SimulationBuilder;

/// A running workshop. Build with [`Simulation::builder`].
///
/// Dropping it cancels every task at its next safe point.
pub struct Simulation {
    cfg: Config,
    bus: Bus,
    state: StateHandle,
    queues: [PhaseQueue; 3],
    stations: [Arc<Station>; 4],
    tracker: Arc<ServiceTracker>,
    token: CancellationToken,
    drain: CancellationToken,
    tasks: JoinSet<()>,
    listener: Option<JoinHandle<()>>,
    start: Instant,
}

impl Simulation {
    /// Shorthand for [`SimulationBuilder::new`].
    pub fn builder(cfg: Config) -> SimulationBuilder {
        SimulationBuilder::new(cfg)
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn new_internal(
        cfg: Config,
        bus: Bus,
        state: StateHandle,
        queues: [PhaseQueue; 3],
        stations: [Arc<Station>; 4],
        tracker: Arc<ServiceTracker>,
        token: CancellationToken,
        drain: CancellationToken,
        tasks: JoinSet<()>,
        listener: JoinHandle<()>,
        start: Instant,
    ) -> Self {
        Self {
            cfg,
            bus,
            state,
            queues,
            stations,
            tracker,
            token,
            drain,
            tasks,
            listener: Some(listener),
            start,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Handle for submitting control codes and reading the state.
    #[inline]
    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    #[inline]
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Ring receiver for events published from now on.
    ///
    /// Best effort: a receiver lagging more than `bus_capacity` events skips the
    /// oldest. Use a [`Subscribe`](crate::Subscribe) impl to see every transition.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Built-in occupancy tracker.
    #[inline]
    pub fn tracker(&self) -> &Arc<ServiceTracker> {
        &self.tracker
    }

    /// Queue feeding `phase`; `None` for the admission phase.
    pub fn queue(&self, phase: Phase) -> Option<&PhaseQueue> {
        phase.index().checked_sub(1).map(|i| &self.queues[i])
    }

    /// Stats of the queue feeding `phase`.
    pub async fn queue_stats(&self, phase: Phase) -> Option<Result<QueueStats, QueueError>> {
        match self.queue(phase) {
            Some(queue) => Some(queue.stats().await),
            None => None,
        }
    }

    #[inline]
    pub fn station(&self, phase: Phase) -> &Arc<Station> {
        &self.stations[phase.index()]
    }

    /// Time since the simulation clock started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Number of vehicles this run admits.
    #[inline]
    pub fn fleet_size(&self) -> usize {
        self.cfg.fleet().total()
    }

    /// Waits until every generated vehicle has left the final phase.
    pub async fn wait_completed(&self) -> usize {
        self.tracker.wait_completed(self.fleet_size()).await
    }

    /// Stops every worker and admission task at its next safe point and waits
    /// for them, then lets subscribers drain the remaining events.
    ///
    /// A vehicle in the middle of a service finishes it (and emits `Leaving`)
    /// before its task exits.
    pub async fn shutdown(mut self) {
        tracing::info!(completed = self.tracker.completed(), "workshop closing");
        self.token.cancel();
        while let Some(res) = self.tasks.join_next().await {
            if let Err(e) = res {
                tracing::warn!(error = %e, "workshop task ended abnormally");
            }
        }
        self.drain.cancel();
        if let Some(listener) = self.listener.take() {
            let _ = listener.await;
        }
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.token.cancel();
        self.drain.cancel();
    }
}
