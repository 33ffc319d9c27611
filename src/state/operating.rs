//! # Operating state and transition table.
//!
//! | code | active | closed | restricted | priority  |
//! |------|--------|--------|------------|-----------|
//! | 0    | false  | false  | unchanged  | unchanged |
//! | 1..3 | true   | false  | A / B / C  | unchanged |
//! | 4..6 | true   | false  | unchanged  | A / B / C |
//! | 7, 8 | no change                                |
//! | 9    | false  | true   | unchanged  | unchanged |
//! | else | no change                                |
//!
//! Restriction and priority are sticky: no code clears them.

use std::fmt;

use crate::vehicles::Category;

/// Global admission/priority policy at one instant.
///
/// Invariant: `closed` implies `!active`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperatingState {
    /// Service is running.
    pub active: bool,
    /// Workshop is closed (implies `!active`).
    pub closed: bool,
    /// If set, only this category may be admitted or serviced.
    pub restricted: Option<Category>,
    /// If set, this category is served first when present.
    pub priority: Option<Category>,
}

impl Default for OperatingState {
    /// Active, open, no restriction, no priority.
    fn default() -> Self {
        Self {
            active: true,
            closed: false,
            restricted: None,
            priority: None,
        }
    }
}

impl OperatingState {
    /// Returns the state that results from `code`, or `None` when the code is a no-op
    /// (7, 8 and anything outside `0..=9`).
    pub fn transition(self, code: u8) -> Option<OperatingState> {
        let mut next = self;
        match code {
            0 => {
                next.active = false;
                next.closed = false;
            }
            1..=3 => {
                next.active = true;
                next.closed = false;
                next.restricted = Some(Self::category_for(code - 1));
            }
            4..=6 => {
                next.active = true;
                next.closed = false;
                next.priority = Some(Self::category_for(code - 4));
            }
            9 => {
                next.active = false;
                next.closed = true;
            }
            _ => return None,
        }
        Some(next)
    }

    /// Applies `code` in place. Returns `false` if the code was a no-op.
    pub fn apply_code(&mut self, code: u8) -> bool {
        match self.transition(code) {
            Some(next) => {
                *self = next;
                true
            }
            None => false,
        }
    }

    /// True if the workshop is open for service at all.
    #[inline]
    pub fn is_serving(&self) -> bool {
        self.active && !self.closed
    }

    /// True if a vehicle of `category` may be admitted or serviced now.
    #[inline]
    pub fn admits(&self, category: Category) -> bool {
        self.is_serving() && self.restricted.is_none_or(|only| only == category)
    }

    /// One-word summary, most restrictive condition first.
    pub fn summary(&self) -> String {
        if self.closed {
            return "CLOSED".to_string();
        }
        if !self.active {
            return "INACTIVE".to_string();
        }
        if let Some(only) = self.restricted {
            return format!("ONLY {only}");
        }
        if let Some(first) = self.priority {
            return format!("PRIORITY {first}");
        }
        "NORMAL".to_string()
    }

    fn category_for(offset: u8) -> Category {
        match offset {
            0 => Category::A,
            1 => Category::B,
            _ => Category::C,
        }
    }
}

impl fmt::Display for OperatingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn after(codes: &[u8]) -> OperatingState {
        let mut s = OperatingState::default();
        for &c in codes {
            s.apply_code(c);
        }
        s
    }

    #[test]
    fn test_default_is_normal() {
        let s = OperatingState::default();
        assert!(s.active && !s.closed);
        assert_eq!(s.summary(), "NORMAL");
    }

    #[test]
    fn test_inactive_and_closed() {
        let s = after(&[0]);
        assert!(!s.active && !s.closed);
        assert_eq!(s.summary(), "INACTIVE");

        let s = after(&[9]);
        assert!(!s.active && s.closed);
        assert_eq!(s.summary(), "CLOSED");
    }

    #[test]
    fn test_restriction_codes() {
        assert_eq!(after(&[1]).restricted, Some(Category::A));
        assert_eq!(after(&[2]).restricted, Some(Category::B));
        assert_eq!(after(&[3]).restricted, Some(Category::C));
        assert_eq!(after(&[9, 2]).summary(), "ONLY B");
    }

    #[test]
    fn test_priority_codes() {
        assert_eq!(after(&[4]).priority, Some(Category::A));
        assert_eq!(after(&[5]).priority, Some(Category::B));
        assert_eq!(after(&[6]).priority, Some(Category::C));
        assert_eq!(after(&[6]).summary(), "PRIORITY C");
    }

    #[test]
    fn test_restriction_and_priority_coexist() {
        let s = after(&[2, 4]);
        assert_eq!(s.restricted, Some(Category::B));
        assert_eq!(s.priority, Some(Category::A));
        assert_eq!(s.summary(), "ONLY B");
    }

    #[test]
    fn test_no_op_codes() {
        let base = after(&[3, 5]);
        for code in [7u8, 8, 10, 42, u8::MAX] {
            assert_eq!(base.transition(code), None);
            let mut s = base;
            assert!(!s.apply_code(code));
            assert_eq!(s, base);
        }
    }

    #[test]
    fn test_closing_keeps_sticky_policies() {
        let s = after(&[1, 6, 9]);
        assert!(s.closed && !s.active);
        assert_eq!(s.restricted, Some(Category::A));
        assert_eq!(s.priority, Some(Category::C));

        let reopened = after(&[1, 6, 9, 5]);
        assert!(reopened.is_serving());
        assert_eq!(reopened.restricted, Some(Category::A));
    }

    #[test]
    fn test_closed_implies_inactive_for_every_sequence() {
        for a in 0..=9u8 {
            for b in 0..=9u8 {
                let s = after(&[a, b]);
                assert!(!s.closed || !s.active, "codes {a},{b} -> {s:?}");
            }
        }
    }

    #[test]
    fn test_admits() {
        let s = after(&[2]);
        assert!(s.admits(Category::B));
        assert!(!s.admits(Category::A));
        assert!(!after(&[0]).admits(Category::A));
        assert!(!after(&[9]).admits(Category::C));
        assert!(after(&[4]).admits(Category::C));
    }
}
