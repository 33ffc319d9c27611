use std::fmt;

/// One stage of the workshop pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// 0: waiting for a parking slot (admission).
    Parking,
    /// 1: repair by a mechanic.
    Mechanic,
    /// 2: cleaning.
    Cleaning,
    /// 3: final hand-off to the owner.
    Delivery,
}

impl Phase {
    /// All phases in pipeline order.
    pub const ALL: [Phase; 4] = [
        Phase::Parking,
        Phase::Mechanic,
        Phase::Cleaning,
        Phase::Delivery,
    ];

    /// Phase number (0–3).
    #[inline]
    pub fn number(self) -> u8 {
        match self {
            Phase::Parking => 0,
            Phase::Mechanic => 1,
            Phase::Cleaning => 2,
            Phase::Delivery => 3,
        }
    }

    /// Index into per-phase arrays.
    #[inline]
    pub fn index(self) -> usize {
        self.number() as usize
    }

    /// The phase after this one, or `None` for the final phase.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Parking => Some(Phase::Mechanic),
            Phase::Mechanic => Some(Phase::Cleaning),
            Phase::Cleaning => Some(Phase::Delivery),
            Phase::Delivery => None,
        }
    }

    #[inline]
    pub fn is_final(self) -> bool {
        self.next().is_none()
    }

    /// Short stable label for logs.
    pub fn as_label(self) -> &'static str {
        match self {
            Phase::Parking => "parking",
            Phase::Mechanic => "mechanic",
            Phase::Cleaning => "cleaning",
            Phase::Delivery => "delivery",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_ends_at_delivery() {
        let mut p = Phase::Parking;
        let mut seen = vec![p];
        while let Some(n) = p.next() {
            seen.push(n);
            p = n;
        }
        assert_eq!(seen, Phase::ALL.to_vec());
        assert!(Phase::Delivery.is_final());
        assert_eq!(Phase::Cleaning.number(), 2);
    }
}
