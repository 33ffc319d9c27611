use std::collections::VecDeque;

use crate::state::OperatingState;
use crate::vehicles::{Category, Vehicle};

/// Point-in-time view of a queue, for diagnostics and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Configured capacity.
    pub capacity: usize,
    /// Vehicles held per category (A, B, C).
    pub held: [usize; 3],
    /// Enqueue requests parked because the queue is full.
    pub parked_enqueues: usize,
    /// Dequeue requests parked because nothing was eligible.
    pub parked_dequeues: usize,
}

impl QueueStats {
    /// Total vehicles held.
    #[inline]
    pub fn len(&self) -> usize {
        self.held.iter().sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vehicles held of one category.
    #[inline]
    pub fn held_of(&self, category: Category) -> usize {
        self.held[category.index()]
    }
}

/// Three FIFO lanes, one per category, sharing one capacity bound.
#[derive(Debug)]
pub(super) struct Buckets {
    lanes: [VecDeque<Vehicle>; 3],
    capacity: usize,
}

impl Buckets {
    pub(super) fn new(capacity: usize) -> Self {
        Self {
            lanes: Default::default(),
            capacity,
        }
    }

    #[inline]
    pub(super) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(super) fn len(&self) -> usize {
        self.lanes.iter().map(VecDeque::len).sum()
    }

    #[inline]
    pub(super) fn is_empty(&self) -> bool {
        self.lanes.iter().all(VecDeque::is_empty)
    }

    #[inline]
    pub(super) fn has_room(&self) -> bool {
        self.len() < self.capacity
    }

    pub(super) fn counts(&self) -> [usize; 3] {
        [self.lanes[0].len(), self.lanes[1].len(), self.lanes[2].len()]
    }

    /// Appends to the tail of the vehicle's lane.
    pub(super) fn push_back(&mut self, vehicle: Vehicle) {
        self.lanes[vehicle.category().index()].push_back(vehicle);
    }

    /// Puts a vehicle back at the head of its lane.
    pub(super) fn push_front(&mut self, vehicle: Vehicle) {
        self.lanes[vehicle.category().index()].push_front(vehicle);
    }

    /// Removes the vehicle `snapshot` selects, if any is eligible.
    pub(super) fn select(&mut self, snapshot: &OperatingState) -> Option<Vehicle> {
        if let Some(only) = snapshot.restricted {
            return self.pop(only);
        }
        if let Some(first) = snapshot.priority {
            if let Some(v) = self.pop(first) {
                return Some(v);
            }
        }
        Category::ALL.into_iter().find_map(|cat| self.pop(cat))
    }

    #[inline]
    fn pop(&mut self, category: Category) -> Option<Vehicle> {
        self.lanes[category.index()].pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(cats: &[Category]) -> Buckets {
        let mut b = Buckets::new(cats.len().max(1));
        for (i, &c) in cats.iter().enumerate() {
            b.push_back(Vehicle::new(i as u64 + 1, c));
        }
        b
    }

    fn state(restricted: Option<Category>, priority: Option<Category>) -> OperatingState {
        OperatingState {
            restricted,
            priority,
            ..OperatingState::default()
        }
    }

    fn drain(b: &mut Buckets, s: &OperatingState) -> Vec<u64> {
        std::iter::from_fn(|| b.select(s)).map(|v| v.id().0).collect()
    }

    #[test]
    fn test_default_precedence_a_b_c_fifo_within() {
        use Category::*;
        let mut b = filled(&[C, B, A, C, A]);
        assert_eq!(drain(&mut b, &state(None, None)), vec![3, 5, 2, 1, 4]);
    }

    #[test]
    fn test_priority_first_then_normal_order() {
        use Category::*;
        let mut b = filled(&[A, C, B, C]);
        let s = state(None, Some(C));
        assert_eq!(drain(&mut b, &s), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_priority_falls_back_when_empty() {
        use Category::*;
        let mut b = filled(&[B, A]);
        assert_eq!(b.select(&state(None, Some(C))).map(|v| v.id().0), Some(2));
    }

    #[test]
    fn test_restriction_never_yields_other_categories() {
        use Category::*;
        let mut b = filled(&[A, A, C]);
        let s = state(Some(B), None);
        assert!(b.select(&s).is_none());
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn test_restriction_beats_priority() {
        use Category::*;
        let mut b = filled(&[A, B]);
        let s = state(Some(B), Some(A));
        assert_eq!(drain(&mut b, &s), vec![2]);
        assert_eq!(b.counts(), [1, 0, 0]);
    }

    #[test]
    fn test_push_front_restores_head() {
        use Category::*;
        let mut b = filled(&[A, A]);
        let head = b.select(&state(None, None)).unwrap();
        assert_eq!(head.id().0, 1);
        b.push_front(head);
        assert_eq!(drain(&mut b, &state(None, None)), vec![1, 2]);
    }

    #[test]
    fn test_room_accounting() {
        use Category::*;
        let mut b = Buckets::new(2);
        assert!(b.has_room() && b.is_empty());
        b.push_back(Vehicle::new(1, A));
        b.push_back(Vehicle::new(2, C));
        assert!(!b.has_room());
        assert_eq!(b.len(), b.capacity());
    }
}
