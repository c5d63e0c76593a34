//! Exact edit distance restricted to anchors: the full `(len_ref+1) x (len_qry+1)`
//! grid, where a diagonal step is free only inside an anchor and every other
//! step costs 1.
//!
//! Quadratic in time and memory. Only meant as a correctness oracle for the
//! chaining solvers and for the naive strategy.
use log::info;

use crate::chain::Mode;
use crate::prelude::*;

/// Which cells of the DP grid allow a free diagonal step.
/// Cell `(i, j)` is allowed when some anchor covers the pair `(i-1, j-1)`.
pub struct MatchMatrix {
    /// Query length plus one.
    width: usize,
    cells: Vec<bool>,
}

impl MatchMatrix {
    /// Rasterise the covered diagonal run of every anchor in `anchors`.
    /// The anchors must lie inside the grid.
    pub fn new(anchors: &[Anchor], len_ref: usize, len_qry: usize) -> Self {
        let width = len_qry + 1;
        let mut cells = vec![false; (len_ref + 1) * width];
        for a in anchors {
            let (i, j) = (a.ref_start as usize + 1, a.qry_start as usize + 1);
            for k in 0..a.len as usize {
                cells[(i + k) * width + j + k] = true;
            }
        }
        Self { width, cells }
    }

    #[inline]
    pub fn allowed(&self, i: usize, j: usize) -> bool {
        self.cells[i * self.width + j]
    }

    /// The number of allowed cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

fn to_len(set: &AnchorSet, len: I) -> Result<usize> {
    usize::try_from(len).map_err(|_| ChainError::AnchorOutOfBounds {
        anchor: set[set.len() - 1],
        len_ref: set.len_ref(),
        len_qry: set.len_qry(),
    })
}

/// The exact anchor-restricted edit distance between the two sequences of `set`.
///
/// In `SemiGlobal` mode skipping a prefix and a suffix of the reference is free.
pub fn exact_dp(set: &AnchorSet, mode: Mode, trace: bool) -> Result<Cost> {
    set.check()?;
    let len_ref = to_len(set, set.len_ref())?;
    let len_qry = to_len(set, set.len_qry())?;
    if let Some(&anchor) = set
        .real()
        .iter()
        .find(|a| !a.is_inside(set.len_ref(), set.len_qry()))
    {
        return Err(ChainError::AnchorOutOfBounds {
            anchor,
            len_ref: set.len_ref(),
            len_qry: set.len_qry(),
        });
    }

    let matches = MatchMatrix::new(set.real(), len_ref, len_qry);

    // Rows are reference positions, columns are query positions.
    let mut prev: Vec<Cost> = (0..=len_qry as Cost).collect();
    let mut next = vec![0; len_qry + 1];
    let mut best_last_column = prev[len_qry];
    for i in 1..=len_ref {
        next[0] = match mode {
            Mode::Global => i as Cost,
            Mode::SemiGlobal => 0,
        };
        for j in 1..=len_qry {
            let diagonal = if matches.allowed(i, j) { 0 } else { 1 };
            next[j] = min(prev[j - 1] + diagonal, min(prev[j], next[j - 1]) + 1);
        }
        best_last_column = min(best_last_column, next[len_qry]);
        std::mem::swap(&mut prev, &mut next);
    }

    let cost = match mode {
        Mode::Global => prev[len_qry],
        Mode::SemiGlobal => best_last_column,
    };
    if trace {
        info!(
            "Exact DP over {}x{} grid with {} allowed diagonals: {cost}",
            len_ref + 1,
            len_qry + 1,
            matches.count()
        );
    }
    Ok(cost)
}
