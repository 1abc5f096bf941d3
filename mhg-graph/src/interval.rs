use derive_new::new;
use std::cmp::{
    max,
    min,
};

use crate::seq::SeqId;

/// Reading direction of a block-vertex relative to its module's canonical frame (§3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Plus,
    Minus,
}

impl Orientation {
    pub fn flip(self) -> Self {
        match self {
            Orientation::Plus => Orientation::Minus,
            Orientation::Minus => Orientation::Plus,
        }
    }

    pub fn from_coords(start: u64, end: u64) -> Self {
        if start <= end {
            Orientation::Plus
        } else {
            Orientation::Minus
        }
    }
}

/// 1-based half-open coordinate range `[lo, hi)` on a sequence, `lo < hi`.
///
/// Orientation is never carried on `Interval` itself (§3): the same interval can be
/// a block-vertex in either orientation depending on the module it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, new)]
pub struct Interval {
    pub lo: u64,
    pub hi: u64,
}

impl Interval {
    /// Build from a raw, possibly reversed, coordinate pair, normalising to `lo < hi`.
    pub fn from_raw(a: u64, b: u64) -> Self {
        Self::new(min(a, b), max(a, b))
    }

    pub fn len(&self) -> u64 {
        self.hi - self.lo
    }

    pub fn is_empty(&self) -> bool {
        self.hi <= self.lo
    }

    /// Strict intersection: `[a,b) ∩ [c,d) ≠ ∅` (§4.1).
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.lo < other.hi && other.lo < self.hi
    }

    pub fn contains(&self, other: &Interval) -> bool {
        self.lo <= other.lo && other.hi <= self.hi
    }

    pub fn contains_point(&self, p: u64) -> bool {
        self.lo <= p && p < self.hi
    }
}

/// A vertex of the input alignment graph: the maximal region of a sequence covered
/// by any alignment, established during pre-partitioning (§3).
#[derive(Clone, Debug, PartialEq, Eq, Hash, new)]
pub struct Node {
    pub seq: SeqId,
    pub interval: Interval,
}

/// Key identifying a live block in `NodeToPaths` / `PathToModule`: a sequence
/// together with the interval it currently occupies. Orientation is not part of
/// the key because it is a module-local property of the block-vertex (§3).
#[derive(Clone, Debug, PartialEq, Eq, Hash, new)]
pub struct BlockKey {
    pub seq: SeqId,
    pub interval: Interval,
}

/// A vertex of a module: a block together with the orientation it carries within
/// that module's canonical frame (§3).
#[derive(Clone, Debug, PartialEq, Eq, Hash, new)]
pub struct BlockVertex {
    pub seq: SeqId,
    pub interval: Interval,
    pub orientation: Orientation,
}

impl BlockVertex {
    pub fn key(&self) -> BlockKey {
        BlockKey::new(self.seq.clone(), self.interval)
    }

    pub fn flip(&self) -> Self {
        Self::new(self.seq.clone(), self.interval, self.orientation.flip())
    }
}
