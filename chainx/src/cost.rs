//! The cost of connecting two anchors in a chain, and the precedence policies
//! deciding which connections are legal.
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Which pairs `(i, j)`, with `i` before `j` in sort order, may be chained.
#[derive(Debug, PartialEq, Eq, Default, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Precedence {
    /// Both start and end points strictly increase in both sequences.
    #[default]
    Strict,
    /// Only the start points strictly increase.
    WeakForward,
    /// Only the end points strictly increase. Runs on the set sorted by end point.
    WeakReverse,
}

impl Precedence {
    #[inline]
    pub fn is_legal(&self, i: &Anchor, j: &Anchor) -> bool {
        let starts = i.ref_start < j.ref_start && i.qry_start < j.qry_start;
        let ends = i.ref_end() < j.ref_end() && i.qry_end() < j.qry_end();
        match self {
            Precedence::Strict => starts && ends,
            Precedence::WeakForward => starts,
            Precedence::WeakReverse => ends,
        }
    }

    /// The order the candidate set must be sorted in for this policy.
    #[inline]
    pub fn order(&self) -> Order {
        match self {
            Precedence::Strict | Precedence::WeakForward => Order::ByStart,
            Precedence::WeakReverse => Order::ByEnd,
        }
    }
}

/// The number of unmatched residues between `i` and `j` in each sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    pub ref_gap: Cost,
    pub qry_gap: Cost,
}

impl Gap {
    #[inline]
    pub fn between(i: &Anchor, j: &Anchor) -> Self {
        Self {
            ref_gap: max(0, j.ref_start - i.ref_end() - 1),
            qry_gap: max(0, j.qry_start - i.qry_end() - 1),
        }
    }

    /// An edit has to traverse the longer of the two gaps.
    #[inline]
    pub fn cost(&self) -> Cost {
        max(self.ref_gap, self.qry_gap)
    }
}

/// The net number of indels needed to reconcile anchors whose covered ranges
/// overlap by different amounts in the two sequences.
#[inline]
pub fn overlap(i: &Anchor, j: &Anchor) -> Cost {
    let ref_overlap = max(0, i.ref_end() - j.ref_start + 1);
    let qry_overlap = max(0, i.qry_end() - j.qry_start + 1);
    (ref_overlap - qry_overlap).abs()
}

/// Cost `gap + overlap` of chaining `j` directly after `i`.
/// Assumes the pair is legal under the active precedence policy.
#[inline]
pub fn connection_cost(i: &Anchor, j: &Anchor) -> Cost {
    Gap::between(i, j).cost() + overlap(i, j)
}

/// As `connection_cost`, but the reference side of the gap is free.
/// Used for the semi-global transition into the end sentinel.
#[inline]
pub fn connection_cost_free_ref_gap(i: &Anchor, j: &Anchor) -> Cost {
    Gap::between(i, j).qry_gap + overlap(i, j)
}

/// Cost of reaching `j` straight from the start sentinel when skipping a
/// prefix of the reference is free: only the leading query gap is charged.
#[inline]
pub fn leading_qry_gap(start: &Anchor, j: &Anchor) -> Cost {
    max(0, j.qry_start - start.qry_end() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_gap() {
        let i = Anchor::new(0, 0, 4);
        let j = Anchor::new(6, 5, 3);
        assert_eq!(
            Gap::between(&i, &j),
            Gap {
                ref_gap: 2,
                qry_gap: 1
            }
        );
        assert_eq!(overlap(&i, &j), 0);
        assert_eq!(connection_cost(&i, &j), 2);
        assert_eq!(connection_cost_free_ref_gap(&i, &j), 1);
    }

    #[test]
    fn pure_overlap() {
        // Overlaps 2 in the reference and 0 in the query, with a query gap of 1.
        let i = Anchor::new(0, 0, 5);
        let j = Anchor::new(3, 6, 5);
        assert_eq!(Gap::between(&i, &j).cost(), 1);
        assert_eq!(overlap(&i, &j), 2);
        assert_eq!(connection_cost(&i, &j), 3);
    }

    #[test]
    fn same_diagonal_overlap_is_free() {
        let i = Anchor::new(10, 20, 8);
        let j = Anchor::new(14, 24, 8);
        assert_eq!(connection_cost(&i, &j), 0);
    }

    #[test]
    fn sentinel_to_sentinel() {
        let s = Anchor::start_sentinel();
        let e = Anchor::end_sentinel(7, 3);
        assert_eq!(connection_cost(&s, &e), 7);
        assert_eq!(connection_cost_free_ref_gap(&s, &e), 3);
        assert_eq!(leading_qry_gap(&s, &Anchor::new(4, 2, 1)), 2);
    }

    #[test]
    fn policies() {
        let i = Anchor::new(0, 0, 10);
        // Contained in i: starts increase, ends do not.
        let contained = Anchor::new(2, 2, 3);
        // Starts before i in the query, but ends after it.
        let late = Anchor::new(1, 0, 12);
        let after = Anchor::new(3, 4, 10);

        assert!(Precedence::Strict.is_legal(&i, &after));
        assert!(Precedence::WeakForward.is_legal(&i, &after));
        assert!(Precedence::WeakReverse.is_legal(&i, &after));

        assert!(!Precedence::Strict.is_legal(&i, &contained));
        assert!(Precedence::WeakForward.is_legal(&i, &contained));
        assert!(!Precedence::WeakReverse.is_legal(&i, &contained));

        assert!(!Precedence::Strict.is_legal(&i, &late));
        assert!(!Precedence::WeakForward.is_legal(&i, &late));
        assert!(Precedence::WeakReverse.is_legal(&i, &late));

        assert_eq!(Precedence::WeakReverse.order(), Order::ByEnd);
        assert_eq!(Precedence::WeakForward.order(), Order::ByStart);
    }
}
