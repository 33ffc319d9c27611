use std::sync::Arc;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::ConfigError;
use crate::events::Bus;
use crate::queue::PhaseQueue;
use crate::state::{OperatingState, StateController};
use crate::stations::{Admission, Gate, Phase, Station, StationWorker};
use crate::subscribers::{ServiceTracker, Subscribe, SubscriberSet};

use super::simulation::Simulation;

/// Builder for a [`Simulation`].
pub struct SimulationBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    initial: OperatingState,
    code_capacity: usize,
}

impl SimulationBuilder {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            initial: OperatingState::default(),
            code_capacity: 64,
        }
    }

    /// Sets event subscribers. A [`ServiceTracker`] is always added on top.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Applies `codes` to the initial state before anything is spawned.
    ///
    /// No-op codes are ignored, as they would be at run time.
    pub fn with_initial_codes(mut self, codes: impl IntoIterator<Item = u8>) -> Self {
        for code in codes {
            self.initial.apply_code(code);
        }
        self
    }

    /// Bounds the controller's pending-code queue (minimum 1).
    pub fn with_code_capacity(mut self, capacity: usize) -> Self {
        self.code_capacity = capacity.max(1);
        self
    }

    /// Validates the config and starts every task.
    ///
    /// Must be called inside a tokio runtime. Returns once the topology is
    /// spawned; it does not wait for any vehicle.
    pub fn build(self) -> Result<Simulation, ConfigError> {
        let cfg = self.cfg;
        cfg.validate()?;

        let start = Instant::now();
        let (bus, journal) = Bus::with_journal(cfg.bus_capacity_clamped());
        let token = CancellationToken::new();
        let drain = CancellationToken::new();

        let tracker = Arc::new(ServiceTracker::new());
        let mut subscribers = self.subscribers;
        subscribers.push(tracker.clone());
        let listener =
            SubscriberSet::new(subscribers, bus.clone()).listen(bus.subscribe(), journal, drain.clone());

        let (controller, state) =
            StateController::with_state(self.code_capacity, bus.clone(), start, self.initial);

        let mut tasks = JoinSet::new();
        tasks.spawn(controller.run(token.clone()));

        let queues = [Phase::Mechanic, Phase::Cleaning, Phase::Delivery]
            .map(|phase| PhaseQueue::spawn(phase, cfg.queue_capacity(phase).unwrap_or(1)));

        let stations = Phase::ALL.map(|phase| {
            let gate = Gate::new(state.clone(), cfg.gate_backoff);
            let mut station = Station::new(
                phase,
                cfg.pool(phase),
                gate,
                cfg.service,
                bus.clone(),
                start,
            );
            if let Some(input) = phase.index().checked_sub(1) {
                station = station.with_input(queues[input].clone());
            }
            if let Some(output) = queues.get(phase.index()) {
                station = station.with_output(output.clone());
            }
            Arc::new(station)
        });

        for station in &stations[1..] {
            for index in 0..station.units() {
                let worker = StationWorker::new(Arc::clone(station), index);
                tasks.spawn(worker.run(token.clone()));
            }
        }

        let fleet = cfg.fleet();
        let vehicles = fleet.shuffled(cfg.seed);
        tracing::info!(
            vehicles = vehicles.len(),
            state = %state.snapshot(),
            "workshop opened"
        );
        for vehicle in vehicles {
            let admission = Admission::new(Arc::clone(&stations[0]), vehicle);
            tasks.spawn(admission.run(token.clone()));
        }

        Ok(Simulation::new_internal(
            cfg, bus, state, queues, stations, tracker, token, drain, tasks, listener, start,
        ))
    }
}
