use tokio::sync::{mpsc, oneshot};

use crate::error::QueueError;
use crate::stations::Phase;
use crate::state::OperatingState;
use crate::vehicles::Vehicle;

use super::actor::{Command, QueueActor};
use super::buckets::QueueStats;

/// Bound on in-flight commands; callers beyond it wait on `send`.
const COMMAND_BACKLOG: usize = 256;

/// Cloneable handle to a phase queue actor.
///
/// The actor stops once every handle is dropped; vehicles still held are dropped with it.
///
/// ## Example
/// ```rust
/// use workshop::{Category, OperatingState, Phase, PhaseQueue, Vehicle};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let q = PhaseQueue::spawn(Phase::Mechanic, 4);
/// q.enqueue(Vehicle::new(1, Category::C)).await.unwrap();
/// q.enqueue(Vehicle::new(2, Category::A)).await.unwrap();
///
/// let first = q.dequeue(OperatingState::default()).await.unwrap();
/// assert_eq!(first.id().0, 2); // A precedes C
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct PhaseQueue {
    phase: Phase,
    capacity: usize,
    tx: mpsc::Sender<Command>,
}

impl PhaseQueue {
    /// Spawns the actor feeding `phase` and returns a handle.
    ///
    /// `capacity` is clamped to a minimum of 1. Must be called inside a tokio runtime.
    pub fn spawn(phase: Phase, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(COMMAND_BACKLOG);
        tokio::spawn(QueueActor::new(phase, capacity, rx).run());
        Self {
            phase,
            capacity,
            tx,
        }
    }

    /// Phase consuming this queue.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Configured capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends `vehicle` to its category lane; waits while the queue is full.
    ///
    /// Waiting enqueues are admitted in submission order. If this future is
    /// dropped while parked, the vehicle is still admitted later.
    pub async fn enqueue(&self, vehicle: Vehicle) -> Result<(), QueueError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Enqueue { vehicle, reply }).await?;
        rx.await.map_err(|_| QueueError::Closed)
    }

    /// Returns a vehicle that was taken out but could not be served.
    ///
    /// It goes back to the head of its lane and, when the queue is full, ahead
    /// of other parked enqueues.
    pub async fn requeue(&self, vehicle: Vehicle) -> Result<(), QueueError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Requeue { vehicle, reply }).await?;
        rx.await.map_err(|_| QueueError::Closed)
    }

    /// Removes and returns the vehicle selected by `snapshot`; waits until one is eligible.
    ///
    /// The snapshot is fixed for the whole wait. Use [`dequeue_until`](Self::dequeue_until)
    /// when the wait may be abandoned.
    pub async fn dequeue(&self, snapshot: OperatingState) -> Result<Vehicle, QueueError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Dequeue { snapshot, reply }).await?;
        rx.await.map_err(|_| QueueError::Closed)
    }

    /// Like [`dequeue`](Self::dequeue), but gives up once `interrupt` completes.
    ///
    /// Returns `Ok(None)` if interrupted before a vehicle was handed over. A
    /// vehicle the actor had already handed over is still returned, and one
    /// it had not yet matched stays in the queue.
    pub async fn dequeue_until<F>(
        &self,
        snapshot: OperatingState,
        interrupt: F,
    ) -> Result<Option<Vehicle>, QueueError>
    where
        F: Future<Output = ()>,
    {
        let (reply, mut rx) = oneshot::channel();
        self.send(Command::Dequeue { snapshot, reply }).await?;

        tokio::pin!(interrupt);
        tokio::select! {
            res = &mut rx => res.map(Some).map_err(|_| QueueError::Closed),
            _ = &mut interrupt => {
                rx.close();
                Ok(rx.try_recv().ok())
            }
        }
    }

    /// Current occupancy and parked requests.
    pub async fn stats(&self) -> Result<QueueStats, QueueError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Stats { reply }).await?;
        rx.await.map_err(|_| QueueError::Closed)
    }

    async fn send(&self, cmd: Command) -> Result<(), QueueError> {
        self.tx.send(cmd).await.map_err(|_| QueueError::Closed)
    }
}
