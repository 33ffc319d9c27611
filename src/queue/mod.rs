//! # Phase queues: bounded, priority-aware buffers between phases.
//!
//! Each [`PhaseQueue`] is a cloneable handle to one actor task that owns three
//! category buckets, the parked enqueue requests (queue full) and the parked
//! dequeue requests (nothing eligible for the caller's snapshot).
//!
//! ## Architecture
//! ```text
//!  enqueue(v) ─┐                          ┌──────────────── QueueActor ────────────────┐
//!  requeue(v) ─┼──► mpsc<Command> ──────► │ buckets: [A] [B] [C]   (≤ capacity total)  │
//!  dequeue(s) ─┤                          │ pending: parked enqueues (FIFO)            │
//!  stats()    ─┘                          │ waiters: parked dequeues (FIFO, own snap)  │
//!                                         └──── oneshot replies ◄──────────────────────┘
//! ```
//!
//! ## Selection rule for a snapshot
//! 1. `restricted = X` → only bucket X; otherwise the request waits.
//! 2. `priority = X` and bucket X non-empty → head of X.
//! 3. Head of A, else B, else C.
//!
//! ## Rules
//! - Total held never exceeds capacity.
//! - Parked dequeues are tried oldest-first with **their own** snapshot; an
//!   ineligible waiter does not block younger eligible ones.
//! - Parked enqueues are admitted in submission order as room frees up.
//! - A vehicle whose dequeue caller went away is put back at the head of its bucket.

mod actor;
mod buckets;
mod handle;

pub use buckets::QueueStats;
pub use handle::PhaseQueue;
