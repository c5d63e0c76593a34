//!
//! # ChainX library
//!
//! Approximate (anchor-restricted) edit distance between two sequences,
//! computed by co-linear chaining of exact-match anchors with gap and overlap
//! costs instead of the full quadratic alignment grid.
//!
//! It can be used in a few ways:
//! - Call `chain_plain`, `chain_banded` or `exact_dp` directly on an `AnchorSet`.
//! - Build a `ChainParams` and call `ChainParams::distance`, which re-sorts the
//!   anchors as required by the precedence policy and dispatches to the
//!   right solver.
//!
//! The exact DP in `dp` is quadratic in the sequence lengths and only meant as
//! a correctness oracle for the chaining solvers.
//!

pub mod anchor;
pub mod chain;
pub mod cost;
pub mod dp;
pub mod errors;
pub mod params;
pub mod stats;

pub use anchor::{Anchor, AnchorSet, Order};
pub use chain::{chain_banded, chain_plain, Bound, ChainCost, Mode};
pub use cost::{connection_cost, Precedence};
pub use dp::exact_dp;
pub use errors::{ChainError, Result};
pub use params::{ChainParams, Strategy};
pub use stats::ChainStats;

/// Index type for sequence coordinates. Signed to allow the start sentinel at -1.
pub type I = i32;

/// Type for edit costs.
pub type Cost = i32;

/// A sequence of symbols.
pub type Seq<'a> = &'a [u8];

/// An owned sequence of symbols.
pub type Sequence = Vec<u8>;

mod prelude {
    pub use crate::anchor::*;
    pub use crate::errors::*;
    pub use crate::{Cost, I};
    pub use std::cmp::{max, min};
}
