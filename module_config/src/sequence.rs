//! Registration ordinals.

/// Monotonic counter issuing one ordinal per registered rule.
///
/// Every ordinal is issued at most once. After `u64::MAX` has been issued
/// the sequence is exhausted.
#[derive(Clone, Debug)]
pub struct OrdinalSequence {
    next: Option<u64>,
}

impl OrdinalSequence {
    /// Start a sequence whose first ordinal is `first`.
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self { next: Some(first) }
    }

    /// Issue the next ordinal, or `None` once the sequence is exhausted.
    pub const fn issue(&mut self) -> Option<u64> {
        let Some(ordinal) = self.next else {
            return None;
        };
        self.next = ordinal.checked_add(1);
        Some(ordinal)
    }
}

impl Default for OrdinalSequence {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_increasing_ordinals_from_the_start_value() {
        let mut sequence = OrdinalSequence::starting_at(40);
        assert_eq!(sequence.issue(), Some(40));
        assert_eq!(sequence.issue(), Some(41));
        assert_eq!(sequence.issue(), Some(42));
    }

    #[test]
    fn the_last_ordinal_is_issued_once() {
        let mut sequence = OrdinalSequence::starting_at(u64::MAX - 1);
        assert_eq!(sequence.issue(), Some(u64::MAX - 1));
        assert_eq!(sequence.issue(), Some(u64::MAX));
        assert_eq!(sequence.issue(), None);
        assert_eq!(sequence.issue(), None);
    }
}
