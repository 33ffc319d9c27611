//! Error types used by the workshop runtime.
//!
//! This module defines two main error enums:
//!
//! - [`ConfigError`]: a [`Config`](crate::Config) that cannot drive a simulation.
//! - [`QueueError`]: a phase queue actor that is no longer reachable.
//!
//! State-forbids-service is **not** an error anywhere in the crate: gating is
//! backpressure and is retried indefinitely.
//!
//! Both types provide `as_label` for logs/metrics.

use thiserror::Error;

use crate::stations::Phase;

/// # Errors produced by configuration validation.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A phase has no resource units; nothing could ever be served there.
    #[error("resource pool for phase {phase} must be at least 1")]
    ZeroPool {
        /// Phase with the empty pool.
        phase: Phase,
    },

    /// A phase queue has zero capacity; nothing could ever be enqueued.
    #[error("queue capacity for phase {phase} must be at least 1")]
    ZeroCapacity {
        /// Phase consuming the queue.
        phase: Phase,
    },

    /// Service time scale is negative, NaN or infinite.
    #[error("service time scale must be finite and non-negative, got {scale}")]
    InvalidScale {
        /// The rejected scale.
        scale: f64,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use workshop::{ConfigError, Phase};
    ///
    /// let err = ConfigError::ZeroPool { phase: Phase::Cleaning };
    /// assert_eq!(err.as_label(), "config_zero_pool");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::ZeroPool { .. } => "config_zero_pool",
            ConfigError::ZeroCapacity { .. } => "config_zero_capacity",
            ConfigError::InvalidScale { .. } => "config_invalid_scale",
        }
    }
}

/// # Errors produced by phase queue operations.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The queue actor has stopped; the request was not served.
    #[error("phase queue closed")]
    Closed,
}

impl QueueError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            QueueError::Closed => "queue_closed",
        }
    }
}
