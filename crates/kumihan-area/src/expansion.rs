//! How adding a child grows its parent.

use std::fmt;
use std::ops::BitOr;

use crate::geometry::Geometry;

/// A set of expansion rules applied when a child is added.
///
/// Per dimension, EXPAND adds the child's size to the parent and wins over
/// ENCLOSE, which only grows the parent to fit the child. CROSS applies the
/// child's IPD to the parent's BPD and the other way round.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Expansion(u8);

impl Expansion {
    /// Leave the parent alone.
    pub const NONE: Self = Self(0);
    /// Grow the parent IPD to fit the child.
    pub const ENCLOSE_IPD: Self = Self(1);
    /// Grow the parent BPD to fit the child.
    pub const ENCLOSE_BPD: Self = Self(1 << 1);
    /// Add the child IPD to the parent.
    pub const EXPAND_IPD: Self = Self(1 << 2);
    /// Add the child BPD to the parent.
    pub const EXPAND_BPD: Self = Self(1 << 3);
    /// Swap the child's dimensions.
    pub const CROSS: Self = Self(1 << 4);

    /// Enclose in both dimensions.
    pub const ENCLOSE_ALL: Self = Self::ENCLOSE_IPD.union(Self::ENCLOSE_BPD);
    /// Enclose in both dimensions, crossed.
    pub const ENCLOSE_ALL_CROSS: Self = Self::ENCLOSE_ALL.union(Self::CROSS);
    /// Expand in both dimensions.
    pub const EXPAND_ALL: Self = Self::EXPAND_IPD.union(Self::EXPAND_BPD);
    /// Stack along the block progression: enclose IPD, expand BPD.
    pub const EXPAND_LINE: Self = Self::ENCLOSE_IPD.union(Self::EXPAND_BPD);

    /// Both sets of rules.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True when every rule of `other` is in this set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True for the empty set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Expansion {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Debug for Expansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::ENCLOSE_IPD, "ENCLOSE_IPD"),
            (Self::ENCLOSE_BPD, "ENCLOSE_BPD"),
            (Self::EXPAND_IPD, "EXPAND_IPD"),
            (Self::EXPAND_BPD, "EXPAND_BPD"),
            (Self::CROSS, "CROSS"),
        ];
        f.debug_set()
            .entries(names.iter().filter(|(e, _)| self.contains(*e)).map(|(_, n)| n))
            .finish()
    }
}

/// Grow `parent` for a child of size `ipd` x `bpd`.
///
/// A NaN parent size counts as zero; a NaN child size is skipped.
pub fn expand(parent: &mut Geometry, ipd: f64, bpd: f64, expansion: Expansion) {
    let current_ipd = if parent.ipd.is_nan() { 0.0 } else { parent.ipd };
    let current_bpd = if parent.bpd.is_nan() { 0.0 } else { parent.bpd };
    let cross = expansion.contains(Expansion::CROSS);
    let (mut new_ipd, mut new_bpd) = (current_ipd, current_bpd);
    if !ipd.is_nan() {
        let target = if cross { &mut new_bpd } else { &mut new_ipd };
        let current = if cross { current_bpd } else { current_ipd };
        if expansion.contains(Expansion::EXPAND_IPD) {
            *target = current + ipd;
        } else if expansion.contains(Expansion::ENCLOSE_IPD) && ipd > current {
            *target = ipd;
        }
    }
    if !bpd.is_nan() {
        let target = if cross { &mut new_ipd } else { &mut new_bpd };
        let current = if cross { current_ipd } else { current_bpd };
        if expansion.contains(Expansion::EXPAND_BPD) {
            *target = current + bpd;
        } else if expansion.contains(Expansion::ENCLOSE_BPD) && bpd > current {
            *target = bpd;
        }
    }
    if !expansion.is_empty() {
        parent.ipd = new_ipd;
        parent.bpd = new_bpd;
    }
}
