//! # Backoff policy for gating polls.
//!
//! A station that finds the workshop closed, inactive or restricted to another
//! category sleeps and checks again. [`BackoffPolicy`] decides how long:
//! - [`BackoffPolicy::first`] the initial delay;
//! - [`BackoffPolicy::factor`] the multiplicative growth factor;
//! - [`BackoffPolicy::max`] the maximum delay cap.
//!
//! The delay for check `n` is `first × factor^n`, clamped to `max`, then jitter
//! is applied. The default is a constant interval (`factor = 1.0`), which keeps
//! polling simple to reason about.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use workshop::{BackoffPolicy, JitterPolicy};
//!
//! let poll = BackoffPolicy::constant(Duration::from_millis(200));
//! assert_eq!(poll.next(0), Duration::from_millis(200));
//! assert_eq!(poll.next(50), Duration::from_millis(200));
//!
//! let growing = BackoffPolicy {
//!     first: Duration::from_millis(50),
//!     max: Duration::from_millis(400),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//! assert_eq!(growing.next(2), Duration::from_millis(200));
//! assert_eq!(growing.next(9), Duration::from_millis(400));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Retry interval policy for gating checks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the first re-check.
    pub first: Duration,
    /// Maximum delay cap.
    pub max: Duration,
    /// Multiplicative factor (1.0 = constant).
    pub factor: f64,
    /// Randomization applied to the clamped delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Constant 200ms, no jitter.
    fn default() -> Self {
        Self::constant(Duration::from_millis(200))
    }
}

impl BackoffPolicy {
    /// Fixed interval, no jitter.
    pub fn constant(interval: Duration) -> Self {
        Self {
            first: interval,
            max: interval,
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    /// Computes the delay for the given check number (0-indexed).
    ///
    /// Non-finite or out-of-range intermediate values clamp to [`BackoffPolicy::max`].
    pub fn next(&self, attempt: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = attempt.min(i32::MAX as u32) as i32;
        let secs = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = if !secs.is_finite() || secs < 0.0 || secs > max_secs {
            self.max
        } else {
            Duration::from_secs_f64(secs)
        };
        self.jitter.apply(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_constant_200ms() {
        let policy = BackoffPolicy::default();
        for attempt in [0, 1, 10, 1000] {
            assert_eq!(policy.next(attempt), Duration::from_millis(200));
        }
    }

    #[test]
    fn test_first_exceeds_max() {
        let policy = BackoffPolicy {
            first: Duration::from_secs(10),
            max: Duration::from_secs(5),
            factor: 1.0,
            jitter: JitterPolicy::None,
        };
        assert_eq!(policy.next(0), Duration::from_secs(5));
    }

    #[test]
    fn test_overflow_clamps_to_max() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(10),
            factor: 2.0,
            jitter: JitterPolicy::None,
        };
        assert_eq!(policy.next(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn test_equal_jitter_stays_in_upper_half() {
        let policy = BackoffPolicy {
            jitter: JitterPolicy::Equal,
            ..BackoffPolicy::constant(Duration::from_millis(400))
        };
        for attempt in 0..50 {
            let d = policy.next(attempt);
            assert!(d >= Duration::from_millis(200) && d <= Duration::from_millis(400));
        }
    }
}
