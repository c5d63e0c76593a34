//! The chaining DP over a sorted anchor set.
//!
//! `costs[j]` is the minimal cost of any legal chain from the start sentinel
//! to anchor `j`. The plain solver considers every predecessor `i < j`; the
//! banded solver only considers predecessors whose reference gap to `j` is at
//! most the current bound `B`, and reruns with `4B` until the distance found
//! is at most `B`.
//!
//! Correctness of the band: connection costs are non-negative and at least
//! the reference gap, so a chain of total cost `<= B` never uses a connection
//! with a reference gap `> B`. Once a pass returns a cost `<= B`, it therefore
//! equals the plain result.
use log::{info, trace};
use serde::{Deserialize, Serialize};

use crate::cost::*;
use crate::prelude::*;

/// Cost of anchors that are not (yet) reachable.
const INF: Cost = Cost::MAX;

/// Whether both sequences must be consumed end to end.
#[derive(Debug, PartialEq, Eq, Default, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Mode {
    /// Edit distance between the full reference and the full query.
    #[default]
    #[cfg_attr(feature = "cli", value(name = "g", alias = "global"))]
    Global,
    /// Skipping a prefix and suffix of the reference is free; the query is
    /// consumed end to end.
    #[cfg_attr(feature = "cli", value(name = "sg", alias = "semi-global"))]
    SemiGlobal,
}

/// The result of a chaining computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainCost {
    /// The anchor-restricted distance.
    pub cost: Cost,
    /// The number of left-to-right passes that were run.
    pub passes: usize,
}

/// The bound-widening search of the banded solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Run a pass where connections with a reference gap above this bound are skipped.
    Searching(Cost),
    /// A pass returned a cost within its bound.
    Converged(Cost),
    /// The bound reached the cap without converging.
    Overflow,
}

impl Bound {
    /// The distance is first assumed to be at most 100.
    pub const INITIAL: Cost = 100;
    /// The bound is multiplied by this factor after each failed pass.
    pub const GROWTH: Cost = 4;

    pub fn start() -> Self {
        Bound::Searching(Self::INITIAL)
    }

    /// Transition after a pass with the current bound returned `cost`.
    /// Final states are kept.
    pub fn step(self, cost: Cost, cap: Cost) -> Self {
        let Bound::Searching(bound) = self else {
            return self;
        };
        if cost <= bound {
            Bound::Converged(cost)
        } else if bound >= cap {
            Bound::Overflow
        } else {
            Bound::Searching(bound.saturating_mul(Self::GROWTH))
        }
    }
}

/// Bookkeeping for a single left-to-right pass.
struct Pass {
    /// Whether the band skipped any predecessor.
    pruned: bool,
}

/// The chaining DP state for one anchor set.
struct Chainer<'a> {
    anchors: &'a [Anchor],
    precedence: Precedence,
    mode: Mode,
    costs: Vec<Cost>,
    /// `min_start[j]`: the smallest `ref_start` of any anchor at index `>= j`.
    /// Non-decreasing, and `<= ref_start` of every later anchor.
    min_start: Vec<I>,
}

impl<'a> Chainer<'a> {
    fn new(set: &'a AnchorSet, precedence: Precedence, mode: Mode) -> Self {
        debug_assert_eq!(
            set.order(),
            precedence.order(),
            "{precedence:?} requires anchors sorted {:?}",
            precedence.order()
        );
        let anchors = set.anchors();
        let mut min_start = vec![I::MAX; anchors.len()];
        let mut cur = I::MAX;
        for (j, a) in anchors.iter().enumerate().rev() {
            cur = min(cur, a.ref_start);
            min_start[j] = cur;
        }
        Self {
            anchors,
            precedence,
            mode,
            costs: vec![0; anchors.len()],
            min_start,
        }
    }

    /// Fill `costs` left to right. With a `bound`, predecessors whose
    /// reference gap to all remaining anchors exceeds it are skipped.
    fn pass(&mut self, bound: Option<Cost>) -> Pass {
        let n = self.anchors.len();
        let semi = self.mode == Mode::SemiGlobal;
        let start = &self.anchors[0];
        let mut pruned = false;
        // Monotone start of the predecessor window.
        let mut window = 0;

        self.costs[0] = 0;
        for j in 1..n {
            let aj = &self.anchors[j];
            let last = j == n - 1;

            if let Some(bound) = bound {
                while window < j && self.min_start[j] - self.anchors[window].ref_end() - 1 > bound
                {
                    window += 1;
                    pruned = true;
                }
            }

            let mut best = INF;
            if semi {
                best = self.costs[0] + leading_qry_gap(start, aj);
            }
            // The end sentinel may follow any anchor when the reference suffix is free.
            let from = if semi && last { 0 } else { window };
            for i in (from..j).rev() {
                let ai = &self.anchors[i];
                if self.costs[i] == INF || !self.precedence.is_legal(ai, aj) {
                    continue;
                }
                let c = if semi && last {
                    connection_cost_free_ref_gap(ai, aj)
                } else {
                    connection_cost(ai, aj)
                };
                best = min(best, self.costs[i] + c);
            }
            self.costs[j] = best;
        }
        Pass { pruned }
    }

    fn last(&self) -> Cost {
        self.costs[self.costs.len() - 1]
    }

    fn log_costs(&self, trace: bool, passes: usize) {
        if trace {
            info!("Cost array = {:?}", self.costs);
            info!("Chaining cost computed {passes} times");
        }
    }
}

/// Anchor-restricted distance using the O(n^2) chaining DP.
///
/// `set` must be sorted in the order required by `precedence`.
pub fn chain_plain(
    set: &AnchorSet,
    precedence: Precedence,
    mode: Mode,
    trace: bool,
) -> Result<ChainCost> {
    set.check()?;
    let mut chainer = Chainer::new(set, precedence, mode);
    chainer.pass(None);
    chainer.log_costs(trace, 1);
    match chainer.last() {
        INF => Err(ChainError::Unreachable {
            index: set.len() - 1,
        }),
        cost => Ok(ChainCost { cost, passes: 1 }),
    }
}

/// Anchor-restricted distance using the banded chaining DP with bound widening.
///
/// Returns the same distance as `chain_plain`, usually in close to linear time
/// for similar sequences.
pub fn chain_banded(
    set: &AnchorSet,
    precedence: Precedence,
    mode: Mode,
    trace: bool,
) -> Result<ChainCost> {
    set.check()?;
    let cap = set.len_ref() + set.len_qry();
    let mut chainer = Chainer::new(set, precedence, mode);
    let mut state = Bound::start();
    let mut passes = 0;
    let mut last_bound = Bound::INITIAL;
    loop {
        match state {
            Bound::Searching(bound) => {
                last_bound = bound;
                let pass = chainer.pass(Some(bound));
                passes += 1;
                let cost = chainer.last();
                trace!("Pass {passes} with bound {bound}: cost {cost}");
                if cost == INF && !pass.pruned {
                    chainer.log_costs(trace, passes);
                    return Err(ChainError::Unreachable {
                        index: set.len() - 1,
                    });
                }
                state = state.step(cost, cap);
            }
            Bound::Converged(cost) => {
                chainer.log_costs(trace, passes);
                return Ok(ChainCost { cost, passes });
            }
            Bound::Overflow => {
                return Err(ChainError::BoundExceeded {
                    bound: last_bound,
                    cap,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> AnchorSet {
        // ACGTACGT vs ACGTTCGT
        AnchorSet::new(vec![Anchor::new(0, 0, 4), Anchor::new(5, 5, 3)], 8, 8).unwrap()
    }

    fn all_solvers(set: &AnchorSet, precedence: Precedence, mode: Mode) -> Cost {
        let set = set.for_precedence(precedence);
        let plain = chain_plain(&set, precedence, mode, false).unwrap();
        let banded = chain_banded(&set, precedence, mode, false).unwrap();
        assert_eq!(plain.cost, banded.cost, "{precedence:?} {mode:?}");
        plain.cost
    }

    #[test]
    fn single_substitution() {
        for p in [
            Precedence::Strict,
            Precedence::WeakForward,
            Precedence::WeakReverse,
        ] {
            assert_eq!(all_solvers(&example(), p, Mode::Global), 1);
            assert_eq!(all_solvers(&example(), p, Mode::SemiGlobal), 1);
        }
    }

    #[test]
    fn no_anchors() {
        let set = AnchorSet::new(vec![], 7, 3).unwrap();
        assert_eq!(all_solvers(&set, Precedence::Strict, Mode::Global), 7);
        assert_eq!(all_solvers(&set, Precedence::Strict, Mode::SemiGlobal), 3);
        let empty = AnchorSet::new(vec![], 0, 0).unwrap();
        assert_eq!(all_solvers(&empty, Precedence::Strict, Mode::Global), 0);
    }

    #[test]
    fn free_reference_ends() {
        // GGGGACGTACGTTTTT vs ACGTACGT
        let set = AnchorSet::new(vec![Anchor::new(4, 0, 8)], 16, 8).unwrap();
        assert_eq!(all_solvers(&set, Precedence::Strict, Mode::Global), 8);
        assert_eq!(all_solvers(&set, Precedence::Strict, Mode::SemiGlobal), 0);
    }

    #[test]
    fn missing_sentinels() {
        let set = AnchorSet::from_bracketed(vec![]);
        assert_eq!(set, Err(ChainError::InvalidAnchorSet { len: 0 }));
    }

    #[test]
    fn unreachable_end() {
        // A hand-built end anchor sharing the reference start of the start sentinel.
        let set = AnchorSet::from_bracketed(vec![Anchor::start_sentinel(), Anchor::new(-1, 3, 1)])
            .unwrap();
        let err = Err(ChainError::Unreachable { index: 1 });
        assert_eq!(chain_plain(&set, Precedence::Strict, Mode::Global, false), err);
        assert_eq!(chain_banded(&set, Precedence::Strict, Mode::Global, false), err);
    }

    #[test]
    fn long_gap_needs_widening() {
        // Two anchors separated by a 300 residue insertion in the reference.
        let set = AnchorSet::new(
            vec![Anchor::new(0, 0, 50), Anchor::new(350, 50, 50)],
            400,
            100,
        )
        .unwrap();
        let r = chain_banded(&set, Precedence::Strict, Mode::Global, true).unwrap();
        assert_eq!(r.cost, 300);
        assert_eq!(r.passes, 2);
        let p = chain_plain(&set, Precedence::Strict, Mode::Global, false).unwrap();
        assert_eq!(p, ChainCost { cost: 300, passes: 1 });
    }

    #[test]
    fn long_overlapping_predecessor_is_kept() {
        // `b` starts far from `a` in the reference, but `a` is long enough that
        // connecting them only costs the diagonal shift of 20.
        let a = Anchor::new(0, 0, 1000);
        let b = Anchor::new(500, 520, 1000);
        let c = Anchor::new(300, 300, 10);
        let set = AnchorSet::new(vec![a, b, c], 1500, 1520).unwrap();
        assert_eq!(all_solvers(&set, Precedence::Strict, Mode::Global), 20);
    }

    #[test]
    fn bound_transitions() {
        let s = Bound::start();
        assert_eq!(s, Bound::Searching(100));
        assert_eq!(s.step(100, 1000), Bound::Converged(100));
        assert_eq!(s.step(101, 1000), Bound::Searching(400));
        assert_eq!(Bound::Searching(400).step(1001, 1000), Bound::Searching(1600));
        assert_eq!(Bound::Searching(1600).step(1601, 1000), Bound::Overflow);
        assert_eq!(Bound::Searching(1600).step(0, 1000), Bound::Converged(0));
        assert_eq!(Bound::Converged(3).step(7, 10), Bound::Converged(3));
        assert_eq!(Bound::Overflow.step(0, 10), Bound::Overflow);
    }
}
