//! # Simulation configuration.
//!
//! Provides [`Config`], the single set of knobs for one workshop run.
//!
//! Counts of zero are valid (no vehicles of that category). Pools and queue
//! capacities of zero are rejected by [`Config::validate`] before anything is
//! spawned.

use std::time::Duration;

use crate::error::ConfigError;
use crate::policies::{BackoffPolicy, ServiceTimePolicy};
use crate::stations::Phase;
use crate::vehicles::Fleet;

/// Configuration for one workshop simulation.
///
/// ## Field semantics
/// - `count_*`: vehicles generated per category
/// - `parking_slots`, `mechanics`, `cleaners`, `deliverers`: resource units for phases 0..3
/// - `*_queue`: capacity of the queue feeding phases 1..3
/// - `service`: timed service model
/// - `gate_backoff`: polling interval while a category is gated
/// - `seed`: fixes the admission shuffle (`None` = OS entropy)
/// - `bus_capacity`: size of the event ring and the transition journal (min 1; clamped by Bus)
#[derive(Clone, Debug)]
pub struct Config {
    pub count_a: usize,
    pub count_b: usize,
    pub count_c: usize,

    pub parking_slots: usize,
    pub mechanics: usize,
    pub cleaners: usize,
    pub deliverers: usize,

    pub mechanic_queue: usize,
    pub cleaning_queue: usize,
    pub delivery_queue: usize,

    pub service: ServiceTimePolicy,

    /// Pause between gating checks.
    ///
    /// The default is a constant 200ms. Growing intervals (`factor > 1.0`, capped
    /// by `max`) and every [`JitterPolicy`](crate::JitterPolicy) variant are also
    /// supported. The attempt index resets for each wait, and an admission that
    /// loses its re-check counts retries, so `Full`/`Equal` jitter spreads vehicles
    /// that were gated together.
    pub gate_backoff: BackoffPolicy,

    /// Fixes the admission order. Two runs with the same seed admit in the same order.
    pub seed: Option<u64>,

    /// Capacity of the event ring and of the transition journal.
    ///
    /// Ring receivers lagging more than `bus_capacity` events skip the oldest ones.
    /// Stations wait when the journal is full, so transitions are never skipped.
    pub bus_capacity: usize,
}

impl Config {
    /// Fleet composition described by the `count_*` fields.
    #[inline]
    pub fn fleet(&self) -> Fleet {
        Fleet::new(self.count_a, self.count_b, self.count_c)
    }

    /// Resource units of `phase`.
    pub fn pool(&self, phase: Phase) -> usize {
        match phase {
            Phase::Parking => self.parking_slots,
            Phase::Mechanic => self.mechanics,
            Phase::Cleaning => self.cleaners,
            Phase::Delivery => self.deliverers,
        }
    }

    /// Capacity of the queue feeding `phase`; `None` for the admission phase.
    pub fn queue_capacity(&self, phase: Phase) -> Option<usize> {
        match phase {
            Phase::Parking => None,
            Phase::Mechanic => Some(self.mechanic_queue),
            Phase::Cleaning => Some(self.cleaning_queue),
            Phase::Delivery => Some(self.delivery_queue),
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Checks that every phase can make progress.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for phase in Phase::ALL {
            if self.pool(phase) == 0 {
                return Err(ConfigError::ZeroPool { phase });
            }
            if self.queue_capacity(phase) == Some(0) {
                return Err(ConfigError::ZeroCapacity { phase });
            }
        }
        let scale = self.service.scale;
        if !scale.is_finite() || scale < 0.0 {
            return Err(ConfigError::InvalidScale { scale });
        }
        Ok(())
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - 4 vehicles of each category
    /// - pools 4 / 2 / 1 / 1 (parking, mechanics, cleaners, deliverers)
    /// - queue capacity 10 for every phase queue
    /// - service A=5s, B=3s, C=1s with ±20% jitter
    /// - gating re-checked every 200ms
    /// - `bus_capacity = 4096`
    fn default() -> Self {
        Self {
            count_a: 4,
            count_b: 4,
            count_c: 4,
            parking_slots: 4,
            mechanics: 2,
            cleaners: 1,
            deliverers: 1,
            mechanic_queue: 10,
            cleaning_queue: 10,
            delivery_queue: 10,
            service: ServiceTimePolicy::default(),
            gate_backoff: BackoffPolicy::constant(Duration::from_millis(200)),
            seed: None,
            bus_capacity: 4096,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.fleet().total(), 12);
        assert_eq!(cfg.pool(Phase::Mechanic), 2);
        assert_eq!(cfg.queue_capacity(Phase::Parking), None);
    }

    #[test]
    fn test_zero_pool_rejected() {
        let cfg = Config {
            cleaners: 0,
            ..Config::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroPool {
                phase: Phase::Cleaning
            })
        );
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let cfg = Config {
            delivery_queue: 0,
            ..Config::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroCapacity {
                phase: Phase::Delivery
            })
        );
    }

    #[test]
    fn test_zero_vehicles_is_valid() {
        let cfg = Config {
            count_a: 0,
            count_b: 0,
            count_c: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_bad_scale_rejected() {
        let mut cfg = Config::default();
        cfg.service.scale = f64::NAN;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidScale { .. })
        ));
    }
}
