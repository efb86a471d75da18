//! # Staleness gate: suppresses redundant loading transitions.
//!
//! The upstream price source often returns the same figure on consecutive
//! polls; re-entering a loading state on every tick produces visible flicker
//! with no informational value. [`StalenessGate`] compares the previous
//! published snapshot with the incoming one and reports whether consumers
//! should treat the tick as a fresh transition.
//!
//! ## Rules
//! - First observation (no previous snapshot) is always a change.
//! - Otherwise values are compared under numeric equality, where **absent and
//!   NaN form a distinct class that never compares equal to anything,
//!   including itself** — two consecutive failed polls both signal a
//!   transition, so a recovering source is never mistaken for an unchanged one.
//! - Only the value drives the decision; wall-clock age of the previous
//!   snapshot does not.
//!
//! # Example
//! ```
//! use pricevisor::{QuoteSnapshot, StalenessGate};
//!
//! let gate = StalenessGate::default();
//! let first = QuoteSnapshot::new(100.0, "dexscreener");
//!
//! // First observation is always a change.
//! assert!(gate.evaluate(None, &first));
//!
//! // Same value again: no visible transition.
//! let same = QuoteSnapshot::new(100.0, "dexscreener");
//! assert!(!gate.evaluate(Some(&first), &same));
//!
//! // Different value: transition.
//! let moved = QuoteSnapshot::new(150.0, "dexscreener");
//! assert!(gate.evaluate(Some(&first), &moved));
//! ```

use crate::quotes::snapshot::QuoteSnapshot;

/// Change-detection policy for published snapshots.
#[derive(Clone, Copy, Debug, Default)]
pub struct StalenessGate;

impl StalenessGate {
    /// Returns `true` when the incoming snapshot should be treated as a
    /// fresh transition (first observation or a different value).
    pub fn evaluate(&self, previous: Option<&QuoteSnapshot>, incoming: &QuoteSnapshot) -> bool {
        match previous {
            None => true,
            Some(prev) => !Self::same_value(prev.value, incoming.value),
        }
    }

    /// Numeric equality where absent and NaN never equal anything.
    fn same_value(a: Option<f64>, b: Option<f64>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => a == b, // NaN != NaN by IEEE semantics
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(value: Option<f64>) -> QuoteSnapshot {
        QuoteSnapshot {
            value,
            ..QuoteSnapshot::empty()
        }
    }

    #[test]
    fn test_first_observation_is_always_changed() {
        let gate = StalenessGate;
        assert!(gate.evaluate(None, &snap(Some(1.0))));
        assert!(gate.evaluate(None, &snap(None)));
    }

    #[test]
    fn test_equal_values_are_unchanged() {
        let gate = StalenessGate;
        let prev = snap(Some(100.0));
        assert!(!gate.evaluate(Some(&prev), &snap(Some(100.0))));
    }

    #[test]
    fn test_different_values_are_changed() {
        let gate = StalenessGate;
        let prev = snap(Some(100.0));
        assert!(gate.evaluate(Some(&prev), &snap(Some(150.0))));
    }

    #[test]
    fn test_absent_is_never_equal_even_to_absent() {
        let gate = StalenessGate;
        let prev = snap(None);
        assert!(gate.evaluate(Some(&prev), &snap(None)));
        assert!(gate.evaluate(Some(&prev), &snap(Some(1.0))));
        let prev_num = snap(Some(1.0));
        assert!(gate.evaluate(Some(&prev_num), &snap(None)));
    }

    #[test]
    fn test_nan_is_never_equal_even_to_nan() {
        let gate = StalenessGate;
        let prev = snap(Some(f64::NAN));
        assert!(gate.evaluate(Some(&prev), &snap(Some(f64::NAN))));
        assert!(gate.evaluate(Some(&prev), &snap(Some(1.0))));
    }

    #[test]
    fn test_sequence_matches_expected_transitions() {
        // 100, 100, 150 → changed on ticks 1 and 3 only.
        let gate = StalenessGate;
        let ticks = [100.0, 100.0, 150.0];
        let mut last: Option<QuoteSnapshot> = None;
        let mut changes = Vec::new();
        for v in ticks {
            let next = snap(Some(v));
            changes.push(gate.evaluate(last.as_ref(), &next));
            last = Some(next);
        }
        assert_eq!(changes, vec![true, false, true]);
    }
}
