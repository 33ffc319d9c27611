//! # Fleet generation.
//!
//! Vehicles are created in bulk order (all `A`, then all `B`, then all `C`)
//! with ids `1..=N`, then the arrival order is shuffled.
//!
//! The shuffle is seeded when a seed is given, so a run is reproducible:
//! ```rust
//! use workshop::Fleet;
//!
//! let a: Vec<_> = Fleet::new(2, 2, 2).shuffled(Some(7)).iter().map(|v| v.id()).collect();
//! let b: Vec<_> = Fleet::new(2, 2, 2).shuffled(Some(7)).iter().map(|v| v.id()).collect();
//! assert_eq!(a, b);
//! ```

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{Category, Vehicle};

/// Initial vehicle population per category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fleet {
    pub count_a: usize,
    pub count_b: usize,
    pub count_c: usize,
}

impl Fleet {
    pub fn new(count_a: usize, count_b: usize, count_c: usize) -> Self {
        Self {
            count_a,
            count_b,
            count_c,
        }
    }

    /// Total number of vehicles.
    #[inline]
    pub fn total(&self) -> usize {
        self.count_a + self.count_b + self.count_c
    }

    /// Generates vehicles in bulk order: all `A`, then `B`, then `C`.
    pub fn generate(&self) -> Vec<Vehicle> {
        let counts = [self.count_a, self.count_b, self.count_c];
        let mut out = Vec::with_capacity(self.total());
        let mut next_id = 1u64;

        for (cat, count) in Category::ALL.into_iter().zip(counts) {
            for _ in 0..count {
                out.push(Vehicle::new(next_id, cat));
                next_id += 1;
            }
        }
        out
    }

    /// Generates the vehicles and permutes their arrival order.
    ///
    /// - `Some(seed)` → deterministic permutation;
    /// - `None` → seeded from OS entropy.
    pub fn shuffled(&self, seed: Option<u64>) -> Vec<Vehicle> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut vehicles = self.generate();
        vehicles.shuffle(&mut rng);
        vehicles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_order_and_ids() {
        let v = Fleet::new(2, 1, 3).generate();
        let cats: Vec<_> = v.iter().map(|v| v.category()).collect();
        assert_eq!(
            cats,
            vec![
                Category::A,
                Category::A,
                Category::B,
                Category::C,
                Category::C,
                Category::C
            ]
        );
        let ids: Vec<_> = v.iter().map(|v| v.id().0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut ids: Vec<_> = Fleet::new(5, 5, 5)
            .shuffled(None)
            .iter()
            .map(|v| v.id().0)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=15).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_fleet() {
        assert!(Fleet::default().shuffled(Some(1)).is_empty());
    }
}
