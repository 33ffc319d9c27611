//! # Jitter policy.
//!
//! [`JitterPolicy`] adds randomness to a base delay:
//!
//! - [`JitterPolicy::None`]: exact delay
//! - [`JitterPolicy::Full`]: random delay in `[0, delay]`
//! - [`JitterPolicy::Equal`]: `delay/2 + random[0, delay/2]`
//! - [`JitterPolicy::Proportional`]: symmetric `delay × (1 ± p%)`, used for service times

use rand::Rng;
use std::time::Duration;

/// Policy controlling randomization of a delay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// No jitter: use the exact delay.
    #[default]
    None,

    /// Full jitter: random delay in `[0, delay]`.
    Full,

    /// Equal jitter: `delay/2 + random[0, delay/2]`.
    Equal,

    /// Symmetric proportional jitter: uniform in `[delay × (1 - p/100), delay × (1 + p/100)]`.
    ///
    /// Percentages above 100 are treated as 100.
    Proportional(u8),
}

impl JitterPolicy {
    /// Applies jitter to the given delay.
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => Self::full(delay),
            JitterPolicy::Equal => Self::equal(delay),
            JitterPolicy::Proportional(pct) => Self::proportional(delay, *pct),
        }
    }

    fn full(delay: Duration) -> Duration {
        let ms = delay.as_millis() as u64;
        if ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=ms))
    }

    fn equal(delay: Duration) -> Duration {
        let ms = delay.as_millis() as u64;
        if ms == 0 {
            return Duration::ZERO;
        }
        let half = ms / 2;
        let jitter = if half == 0 {
            0
        } else {
            rand::rng().random_range(0..=half)
        };
        Duration::from_millis(half + jitter)
    }

    fn proportional(delay: Duration, pct: u8) -> Duration {
        if delay.is_zero() || pct == 0 {
            return delay;
        }
        let spread = f64::from(pct.min(100)) / 100.0;
        let factor = 1.0 + rand::rng().random_range(-spread..=spread);
        delay.mul_f64(factor.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_identity() {
        let d = Duration::from_millis(1234);
        assert_eq!(JitterPolicy::None.apply(d), d);
    }

    #[test]
    fn test_full_bounds() {
        for _ in 0..100 {
            assert!(JitterPolicy::Full.apply(Duration::from_millis(100)) <= Duration::from_millis(100));
        }
        assert_eq!(JitterPolicy::Full.apply(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_proportional_bounds() {
        let base = Duration::from_secs(5);
        for _ in 0..200 {
            let d = JitterPolicy::Proportional(20).apply(base);
            assert!(d >= Duration::from_secs(4), "{d:?} below -20%");
            assert!(d <= Duration::from_secs(6), "{d:?} above +20%");
        }
    }

    #[test]
    fn test_proportional_caps_at_full_spread() {
        for _ in 0..100 {
            let d = JitterPolicy::Proportional(250).apply(Duration::from_millis(100));
            assert!(d <= Duration::from_millis(200));
        }
    }
}
