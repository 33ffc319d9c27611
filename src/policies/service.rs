//! # Service time per category.
//!
//! ```text
//! duration(cat) = max(floor, jitter(base(cat) × scale))
//! ```
//! With the defaults an `A` vehicle spends 4–6s in each phase, `B` 2.4–3.6s and
//! `C` 0.8–1.2s. `scale` shrinks or stretches every phase uniformly (tests and
//! demos use small scales); `floor` keeps every service strictly positive.

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;
use crate::vehicles::Category;

/// Timed service model shared by all phases.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ServiceTimePolicy {
    /// Base service time for categories A, B, C.
    pub base: [Duration; 3],
    /// Multiplier applied to the base (1.0 = real time).
    pub scale: f64,
    /// Randomization applied after scaling.
    pub jitter: JitterPolicy,
    /// Lower bound of any service duration (must be > 0).
    pub floor: Duration,
}

impl Default for ServiceTimePolicy {
    fn default() -> Self {
        Self {
            base: [
                Duration::from_secs(5),
                Duration::from_secs(3),
                Duration::from_secs(1),
            ],
            scale: 1.0,
            jitter: JitterPolicy::Proportional(20),
            floor: Duration::from_millis(10),
        }
    }
}

impl ServiceTimePolicy {
    /// Returns a copy with a different `scale`.
    pub fn scaled(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Scaled base time for `category`, before jitter.
    pub fn base(&self, category: Category) -> Duration {
        let scale = if self.scale.is_finite() {
            self.scale.max(0.0)
        } else {
            1.0
        };
        self.base[category.index()].mul_f64(scale)
    }

    /// Draws one service duration for `category`.
    pub fn duration(&self, category: Category) -> Duration {
        let floor = self.floor.max(Duration::from_nanos(1));
        self.jitter.apply(self.base(category)).max(floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ranges() {
        let policy = ServiceTimePolicy::default();
        for _ in 0..100 {
            let a = policy.duration(Category::A);
            assert!(a >= Duration::from_secs(4) && a <= Duration::from_secs(6));
            let c = policy.duration(Category::C);
            assert!(c >= Duration::from_millis(800) && c <= Duration::from_millis(1200));
        }
    }

    #[test]
    fn test_scale_applies_before_jitter() {
        let policy = ServiceTimePolicy {
            jitter: JitterPolicy::None,
            ..ServiceTimePolicy::default()
        }
        .scaled(0.01);
        assert_eq!(policy.duration(Category::A), Duration::from_millis(50));
        assert_eq!(policy.duration(Category::B), Duration::from_millis(30));
    }

    #[test]
    fn test_floor_keeps_service_positive() {
        let policy = ServiceTimePolicy::default().scaled(0.0);
        assert_eq!(policy.duration(Category::A), Duration::from_millis(10));

        let zero_floor = ServiceTimePolicy {
            floor: Duration::ZERO,
            ..ServiceTimePolicy::default().scaled(0.0)
        };
        assert!(zero_floor.duration(Category::C) > Duration::ZERO);
    }
}
