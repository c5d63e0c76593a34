//! Errors returned by anchor set construction and the solvers.
use thiserror::Error;

use crate::{Anchor, Cost, I};

pub type Result<T> = std::result::Result<T, ChainError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// The set is not bracketed by the sentinels or not sorted by reference start.
    #[error("Anchor set of {len} elements lacks the start sentinel or is unsorted!")]
    InvalidAnchorSet { len: usize },

    /// An anchor sticks out of the sequences it is supposed to match.
    #[error("Anchor {anchor} does not fit in sequences of length {len_ref} and {len_qry}!")]
    AnchorOutOfBounds { anchor: Anchor, len_ref: I, len_qry: I },

    /// No legal predecessor chain reaches the anchor at `index`.
    #[error("No feasible chain reaches anchor #{index} under the chosen precedence policy.")]
    Unreachable { index: usize },

    /// The banded solver kept exceeding its bound after reaching the cap.
    #[error("Chaining cost exceeds the bound {bound} after reaching the cap {cap}.")]
    BoundExceeded { bound: Cost, cap: Cost },
}
