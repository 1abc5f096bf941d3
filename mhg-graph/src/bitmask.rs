//! Gap-bitmask storage and the `chop_index` coordinate↔column translation primitive (§4.2).

use fixedbitset::FixedBitSet;

use crate::error::{
    MhgError,
    MhgResult,
};

/// `0` = gap column, `1` = aligned column (§3). Stored packed via `fixedbitset`
/// rather than a byte-per-bit `Vec<bool>`, matching the teacher's transitive
/// dependency on `fixedbitset` through `petgraph`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmask(FixedBitSet);

impl Bitmask {
    pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> Self {
        let mut set = FixedBitSet::new();
        for (i, b) in bits.into_iter().enumerate() {
            set.grow(i + 1);
            set.set(i, b);
        }
        Self(set)
    }

    pub fn ones(len: u64) -> Self {
        let len = len as usize;
        let mut set = FixedBitSet::with_capacity(len);
        set.set_range(0..len, true);
        Self(set)
    }

    pub fn len(&self) -> u64 {
        self.0.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.0.len() == 0
    }

    pub fn popcount(&self) -> u64 {
        self.0.count_ones(..) as u64
    }

    pub fn get(&self, i: u64) -> bool {
        self.0.contains(i as usize)
    }

    /// Popcount of the prefix `[0, j)`.
    pub fn popcount_prefix(&self, j: u64) -> u64 {
        self.0.count_ones(0..j as usize) as u64
    }

    /// Smallest index `j` such that `popcount(mask[0..j]) = k` (`k = 0` treated as
    /// `k = 1`). This is the single translation point between a coordinate offset
    /// on one sequence and a column offset on the alignment (§4.2): every split
    /// computed anywhere in the partitioner goes through this function, never an
    /// arithmetic shortcut (§4.8).
    pub fn chop_index(&self, k: u64) -> MhgResult<u64> {
        let k = if k == 0 { 1 } else { k };
        let mut seen = 0u64;
        for i in 0..self.0.len() {
            if self.0.contains(i) {
                seen += 1;
                if seen == k {
                    return Ok(i as u64 + 1);
                }
            }
        }
        Err(MhgError::IndexLookup {
            k,
            popcount: self.popcount(),
        })
    }

    /// Slice `[from, to)` of the mask as a standalone `Bitmask`.
    pub fn slice(&self, from: u64, to: u64) -> Self {
        let mut set = FixedBitSet::with_capacity((to - from) as usize);
        for i in from..to {
            if self.0.contains(i as usize) {
                set.insert((i - from) as usize);
            }
        }
        Self(set)
    }

    /// Reverse the bit order, used whenever a block-vertex is created with
    /// orientation opposite to the alignment's natural direction (§4.8).
    pub fn reversed(&self) -> Self {
        let n = self.0.len();
        let mut set = FixedBitSet::with_capacity(n);
        for i in 0..n {
            if self.0.contains(i) {
                set.insert(n - 1 - i);
            }
        }
        Self(set)
    }

    pub fn concat(parts: impl IntoIterator<Item = Bitmask>) -> Self {
        let mut out = FixedBitSet::new();
        let mut offset = 0usize;
        for part in parts {
            out.grow(offset + part.0.len());
            for i in 0..part.0.len() {
                if part.0.contains(i) {
                    out.insert(offset + i);
                }
            }
            offset += part.0.len();
        }
        Self(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(bits: &str) -> Bitmask {
        Bitmask::from_bits(bits.chars().map(|c| c == '1'))
    }

    #[test]
    fn chop_index_locates_kth_one() {
        let m = mask("0110100110");
        assert_eq!(m.chop_index(1).unwrap(), 2);
        assert_eq!(m.chop_index(2).unwrap(), 3);
        assert_eq!(m.chop_index(3).unwrap(), 6);
        assert_eq!(m.chop_index(4).unwrap(), 9);
    }

    #[test]
    fn chop_index_zero_is_treated_as_one() {
        let m = mask("001");
        assert_eq!(m.chop_index(0).unwrap(), m.chop_index(1).unwrap());
    }

    #[test]
    fn chop_index_past_popcount_errors() {
        let m = mask("0101");
        assert!(m.chop_index(3).is_err());
    }

    #[test]
    fn reversed_mirrors_bits() {
        let m = mask("1100");
        assert_eq!(m.reversed(), mask("0011"));
    }

    #[test]
    fn slice_and_popcount_prefix_agree_with_chop_index() {
        let m = mask("101101");
        let j = m.chop_index(2).unwrap();
        let left = m.slice(0, j);
        assert_eq!(left.popcount(), 2);
        assert_eq!(m.popcount_prefix(j), 2);
    }
}
