//! Anchors and sentinel-bracketed candidate sets.
use std::borrow::Cow;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::cost::Precedence;
use crate::prelude::*;

/// A verbatim matching block of `len` symbols between the reference and the
/// query, starting at `ref_start` and `qry_start` (0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    pub ref_start: I,
    pub qry_start: I,
    pub len: I,
}

impl Anchor {
    #[inline]
    pub const fn new(ref_start: I, qry_start: I, len: I) -> Self {
        Self {
            ref_start,
            qry_start,
            len,
        }
    }

    /// Last covered reference position (inclusive).
    #[inline]
    pub const fn ref_end(&self) -> I {
        self.ref_start + self.len - 1
    }

    /// Last covered query position (inclusive).
    #[inline]
    pub const fn qry_end(&self) -> I {
        self.qry_start + self.len - 1
    }

    /// The anchor placed before both sequences begin.
    #[inline]
    pub const fn start_sentinel() -> Self {
        Self::new(-1, -1, 1)
    }

    /// The anchor placed just past the end of both sequences.
    #[inline]
    pub const fn end_sentinel(len_ref: I, len_qry: I) -> Self {
        Self::new(len_ref, len_qry, 1)
    }

    /// Whether the anchor lies fully inside `[0, len_ref) x [0, len_qry)`.
    pub(crate) fn is_inside(&self, len_ref: I, len_qry: I) -> bool {
        self.len >= 1
            && self.ref_start >= 0
            && self.qry_start >= 0
            && self.ref_end() < len_ref
            && self.qry_end() < len_qry
    }
}

impl Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.ref_start, self.qry_start, self.len)
    }
}

/// The sort order of the anchors in an `AnchorSet`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    /// Ascending `ref_start`.
    ByStart,
    /// Ascending `ref_start + len`.
    ByEnd,
}

impl Order {
    #[inline]
    fn key(&self, a: &Anchor) -> I {
        match self {
            Order::ByStart => a.ref_start,
            Order::ByEnd => a.ref_start + a.len,
        }
    }
}

/// A sorted sequence of anchors bracketed by the start sentinel at index 0
/// and the end sentinel at index `n-1`.
///
/// Sorting is stable, so anchors with equal keys keep their enumeration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorSet {
    anchors: Vec<Anchor>,
    len_ref: I,
    len_qry: I,
    order: Order,
}

impl AnchorSet {
    /// Bracket the unordered `anchors` with both sentinels and sort them by
    /// `ref_start`.
    ///
    /// Every anchor must lie inside `[0, len_ref) x [0, len_qry)`.
    pub fn new(anchors: Vec<Anchor>, len_ref: I, len_qry: I) -> Result<Self> {
        if let Some(&anchor) = anchors.iter().find(|a| !a.is_inside(len_ref, len_qry)) {
            return Err(ChainError::AnchorOutOfBounds {
                anchor,
                len_ref,
                len_qry,
            });
        }
        let mut v = Vec::with_capacity(anchors.len() + 2);
        v.push(Anchor::start_sentinel());
        v.extend(anchors);
        v.push(Anchor::end_sentinel(len_ref, len_qry));
        // Sentinels have the smallest and largest key, so they stay in place.
        v.sort_by_key(|a| a.ref_start);
        Ok(Self {
            anchors: v,
            len_ref,
            len_qry,
            order: Order::ByStart,
        })
    }

    /// Wrap an already bracketed vector of anchors sorted by `ref_start`.
    ///
    /// The sequence lengths are read from the end sentinel.
    pub fn from_bracketed(anchors: Vec<Anchor>) -> Result<Self> {
        let bracketed = anchors.len() >= 2
            && anchors[0] == Anchor::start_sentinel()
            && anchors.windows(2).all(|w| w[0].ref_start <= w[1].ref_start);
        if !bracketed {
            return Err(ChainError::InvalidAnchorSet { len: anchors.len() });
        }
        let last = anchors[anchors.len() - 1];
        Ok(Self {
            len_ref: last.ref_start,
            len_qry: last.qry_start,
            anchors,
            order: Order::ByStart,
        })
    }

    /// A copy of this set sorted by anchor end point.
    pub fn by_end(&self) -> Self {
        self.sorted(Order::ByEnd)
    }

    /// A copy of this set sorted by anchor start point.
    pub fn by_start(&self) -> Self {
        self.sorted(Order::ByStart)
    }

    fn sorted(&self, order: Order) -> Self {
        let mut anchors = self.anchors.clone();
        anchors.sort_by_key(|a| order.key(a));
        Self {
            anchors,
            len_ref: self.len_ref,
            len_qry: self.len_qry,
            order,
        }
    }

    /// This set in the order the given precedence policy requires.
    /// Borrows when the set is already in that order.
    pub fn for_precedence(&self, precedence: Precedence) -> Cow<'_, AnchorSet> {
        let order = precedence.order();
        if self.order == order {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(self.sorted(order))
        }
    }

    /// All anchors, including both sentinels.
    #[inline]
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// The anchors without the sentinels.
    #[inline]
    pub fn real(&self) -> &[Anchor] {
        match self.anchors.len() {
            0..=2 => &[],
            n => &self.anchors[1..n - 1],
        }
    }

    /// Number of anchors, including both sentinels.
    #[inline]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// True when the set holds no anchors at all, not even sentinels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    #[inline]
    pub fn len_ref(&self) -> I {
        self.len_ref
    }

    #[inline]
    pub fn len_qry(&self) -> I {
        self.len_qry
    }

    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    /// Length of the longest anchor, sentinels included.
    pub fn max_anchor_len(&self) -> I {
        self.anchors.iter().map(|a| a.len).max().unwrap_or(0)
    }

    /// Sum of the lengths of all anchors, sentinels included.
    pub fn total_anchor_len(&self) -> usize {
        self.anchors.iter().map(|a| a.len as usize).sum()
    }

    /// Fail with `InvalidAnchorSet` when the sentinels are missing.
    pub(crate) fn check(&self) -> Result<()> {
        if self.anchors.len() < 2 {
            return Err(ChainError::InvalidAnchorSet {
                len: self.anchors.len(),
            });
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for AnchorSet {
    type Output = Anchor;

    #[inline]
    fn index(&self, index: usize) -> &Anchor {
        &self.anchors[index]
    }
}
