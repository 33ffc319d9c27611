use std::fmt;

use super::category::{Category, Incident};

/// Unique vehicle identifier, assigned at generation (1-based, monotonic).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vehicle travelling through the workshop.
///
/// Not `Clone`: a vehicle has exactly one owner at a time.
#[derive(Debug, PartialEq, Eq)]
pub struct Vehicle {
    id: VehicleId,
    category: Category,
}

impl Vehicle {
    /// Creates a vehicle.
    pub fn new(id: u64, category: Category) -> Self {
        Self {
            id: VehicleId(id),
            category,
        }
    }

    /// Returns the vehicle id.
    #[inline]
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// Returns the vehicle category.
    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Convenience: incident label of the vehicle's category.
    #[inline]
    pub fn incident(&self) -> Incident {
        self.category.incident()
    }
}
