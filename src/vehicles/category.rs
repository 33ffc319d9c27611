//! # Vehicle categories and incident labels.
//!
//! | category | incident   | base service |
//! |----------|------------|--------------|
//! | `A`      | mechanical | 5s           |
//! | `B`      | electrical | 3s           |
//! | `C`      | bodywork   | 1s           |
//!
//! The declaration order (`A`, `B`, `C`) is also the default dequeue precedence.

use std::fmt;

/// Class of a vehicle, fixed for its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Mechanical repair.
    A,
    /// Electrical repair.
    B,
    /// Bodywork repair.
    C,
}

impl Category {
    /// All categories in default precedence order.
    pub const ALL: [Category; 3] = [Category::A, Category::B, Category::C];

    /// Position of the category in [`Category::ALL`] (bucket index).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Category::A => 0,
            Category::B => 1,
            Category::C => 2,
        }
    }

    /// Incident type repaired for vehicles of this category.
    #[inline]
    pub fn incident(self) -> Incident {
        match self {
            Category::A => Incident::Mechanical,
            Category::B => Incident::Electrical,
            Category::C => Incident::Bodywork,
        }
    }

    /// Short stable label (`"A"`, `"B"`, `"C"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Category::A => "A",
            Category::B => "B",
            Category::C => "C",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category-derived label carried by every phase transition event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Incident {
    Mechanical,
    Electrical,
    Bodywork,
}

impl Incident {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(self) -> &'static str {
        match self {
            Incident::Mechanical => "mechanical",
            Incident::Electrical => "electrical",
            Incident::Bodywork => "bodywork",
        }
    }
}

impl fmt::Display for Incident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_precedence() {
        for (i, cat) in Category::ALL.iter().enumerate() {
            assert_eq!(cat.index(), i);
        }
    }

    #[test]
    fn test_incident_labels() {
        assert_eq!(Category::A.incident().as_label(), "mechanical");
        assert_eq!(Category::B.incident().as_label(), "electrical");
        assert_eq!(Category::C.incident().as_label(), "bodywork");
    }
}
