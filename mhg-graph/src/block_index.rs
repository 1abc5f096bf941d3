//! Block index: `NodeToPaths`, the live per-sequence interval set (§4.1).
//!
//! A pure in-memory sorted container, not the reference's per-query shell-out to a
//! BED-intersect tool (§4.1 design note): each sequence keeps its live intervals in
//! a `BTreeMap` keyed by `lo`, so overlap queries are a forward scan from the
//! predecessor of the query's start.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::interval::Interval;
use crate::seq::SeqId;

#[derive(Debug, Default, Clone)]
pub struct BlockIndex {
    by_seq: IndexMap<SeqId, BTreeMap<u64, Interval>>,
}

impl BlockIndex {
    pub fn insert(&mut self, seq: SeqId, interval: Interval) {
        self.by_seq.entry(seq).or_default().insert(interval.lo, interval);
    }

    pub fn remove(&mut self, seq: &SeqId, interval: &Interval) {
        if let Some(map) = self.by_seq.get_mut(seq) {
            map.remove(&interval.lo);
        }
    }

    pub fn contains(&self, seq: &SeqId, interval: &Interval) -> bool {
        self.by_seq
            .get(seq)
            .and_then(|map| map.get(&interval.lo))
            .is_some_and(|found| found == interval)
    }

    /// All live blocks on `seq` whose interval intersects `q` (§4.1). Queries over
    /// a sequence never seen return the empty set.
    pub fn overlapping(&self, seq: &SeqId, q: &Interval) -> Vec<Interval> {
        let Some(map) = self.by_seq.get(seq) else {
            return Vec::new();
        };
        // Scan from the predecessor of q.lo: the last block starting at or before
        // q.lo may still extend into q, then continue while block.lo < q.hi.
        let start_key = map
            .range(..=q.lo)
            .next_back()
            .map(|(k, _)| *k)
            .unwrap_or(q.lo);
        map.range(start_key..)
            .take_while(|(lo, _)| **lo < q.hi)
            .map(|(_, iv)| *iv)
            .filter(|iv| iv.overlaps(q))
            .collect()
    }

    pub fn live_intervals(&self, seq: &SeqId) -> Vec<Interval> {
        self.by_seq
            .get(seq)
            .map(|m| m.values().copied().collect())
            .unwrap_or_default()
    }

    /// Invariant 1 (§3): for every sequence, live intervals are pairwise disjoint.
    pub fn all_disjoint(&self) -> bool {
        self.by_seq.values().all(|map| {
            let mut prev_hi = None;
            for iv in map.values() {
                if let Some(hi) = prev_hi {
                    if iv.lo < hi {
                        return false;
                    }
                }
                prev_hi = Some(iv.hi);
            }
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_query_on_unseen_sequence_is_empty() {
        let idx = BlockIndex::default();
        let seq = SeqId::from("s1");
        assert!(idx.overlapping(&seq, &Interval::new(1, 10)).is_empty());
    }

    #[test]
    fn overlap_query_finds_intersecting_blocks_only() {
        let mut idx = BlockIndex::default();
        let seq = SeqId::from("s1");
        idx.insert(seq.clone(), Interval::new(1, 20));
        idx.insert(seq.clone(), Interval::new(20, 60));
        idx.insert(seq.clone(), Interval::new(60, 100));

        let hits = idx.overlapping(&seq, &Interval::new(15, 65));
        assert_eq!(hits.len(), 3);
        assert!(hits.contains(&Interval::new(1, 20)));
        assert!(hits.contains(&Interval::new(20, 60)));
        assert!(hits.contains(&Interval::new(60, 100)));
    }

    #[test]
    fn disjoint_check_catches_overlap() {
        let mut idx = BlockIndex::default();
        let seq = SeqId::from("s1");
        idx.insert(seq.clone(), Interval::new(1, 20));
        assert!(idx.all_disjoint());
        idx.insert(seq, Interval::new(10, 30));
        assert!(!idx.all_disjoint());
    }
}
