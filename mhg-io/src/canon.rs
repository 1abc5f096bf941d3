//! Turn a flat list of BLAST HSPs into the `mhg_graph::AlignmentGraph` the
//! partitioner consumes: normalising coordinates into half-open intervals,
//! deriving per-side gap bitmasks from the aligned strings, and assigning a
//! deterministic bundle index to parallel edges between the same endpoints.

use std::collections::HashMap;

use mhg_graph::{
    Alignment,
    AlignmentGraph,
    Bitmask,
    Interval,
    Orientation,
    SeqId,
};

use crate::blast::Hsp;

/// Build the bitmask for one side of an alignment from its aligned string:
/// `1` at every column carrying a real base, `0` at a gap column.
fn side_mask(aligned: &str) -> Bitmask {
    Bitmask::from_bits(aligned.chars().map(|c| c != '-'))
}

/// Canonical key for grouping parallel edges between the same unordered pair
/// of endpoints, used only to assign a deterministic `bundle_index`.
fn endpoint_key(seq_a: &SeqId, a: Interval, seq_b: &SeqId, b: Interval) -> (SeqId, Interval, SeqId, Interval) {
    let left = (seq_a.clone(), a);
    let right = (seq_b.clone(), b);
    if left <= right {
        (left.0, left.1, right.0, right.1)
    } else {
        (right.0, right.1, left.0, left.1)
    }
}

/// Build the alignment graph the core partitioner consumes out of a
/// bitscore-filtered HSP list. `mhg-graph`'s own block index handles the
/// progressive merging of overlapping endpoints during partitioning — this
/// step only needs to normalise each HSP into one well-formed `Alignment`.
pub fn build_alignment_graph(hsps: &[Hsp]) -> AlignmentGraph {
    let mut graph = AlignmentGraph::default();
    let mut bundle_counts: HashMap<(SeqId, Interval, SeqId, Interval), usize> = HashMap::new();

    for hsp in hsps {
        if hsp.qseq.len() != hsp.hseq.len() || hsp.qseq.is_empty() {
            continue;
        }
        let path_a = Interval::from_raw(hsp.q_start, hsp.q_end);
        let path_b = Interval::from_raw(hsp.s_start, hsp.s_end);
        if path_a.is_empty() || path_b.is_empty() {
            continue;
        }
        let seq_a = SeqId::from(hsp.query_id.as_str());
        let seq_b = SeqId::from(hsp.subject_id.as_str());
        let orient_a = Orientation::from_coords(hsp.q_start, hsp.q_end);
        let orient_b = Orientation::from_coords(hsp.s_start, hsp.s_end);

        // mask_ab carries B's gap pattern (popcount = len(B)); mask_ba
        // carries A's (popcount = len(A)) — the convention the core
        // partitioner's coordinate translation is built against.
        let mask_ab = side_mask(&hsp.hseq);
        let mask_ba = side_mask(&hsp.qseq);

        let key = endpoint_key(&seq_a, path_a, &seq_b, path_b);
        let bundle_index = {
            let counter = bundle_counts.entry(key).or_insert(0);
            let idx = *counter;
            *counter += 1;
            idx
        };

        graph.add_alignment(Alignment::new(
            seq_a, path_a, orient_a, seq_b, path_b, orient_b, mask_ab, mask_ba, bundle_index,
        ));
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hsp(q: (u64, u64), s: (u64, u64), qseq: &str, hseq: &str) -> Hsp {
        Hsp {
            query_id: "A".into(),
            subject_id: "B".into(),
            q_start: q.0,
            q_end: q.1,
            s_start: s.0,
            s_end: s.1,
            bit_score: 1000.0,
            align_len: qseq.len() as u64,
            qseq: qseq.into(),
            hseq: hseq.into(),
        }
    }

    #[test]
    fn builds_one_alignment_per_well_formed_hsp() {
        let hsps = vec![hsp((1, 5), (1, 5), "ACGT", "ACGT")];
        let graph = build_alignment_graph(&hsps);
        assert_eq!(graph.alignments().len(), 1);
        let a = &graph.alignments()[0];
        assert_eq!(a.mask_ab.popcount(), a.path_b.len());
        assert_eq!(a.mask_ba.popcount(), a.path_a.len());
    }

    #[test]
    fn minus_strand_hit_gets_minus_orientation() {
        let hsps = vec![hsp((1, 5), (100, 96), "ACGT", "ACGT")];
        let graph = build_alignment_graph(&hsps);
        let a = &graph.alignments()[0];
        assert_eq!(a.orient_b, Orientation::Minus);
        assert_eq!(a.path_b, Interval::new(96, 100));
    }

    #[test]
    fn parallel_edges_get_distinct_bundle_indices() {
        let hsps = vec![hsp((1, 5), (1, 5), "ACGT", "ACGT"), hsp((1, 5), (1, 5), "ACGT", "ACGT")];
        let graph = build_alignment_graph(&hsps);
        let indices: Vec<usize> = graph.alignments().iter().map(|a| a.bundle_index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn mismatched_aligned_string_lengths_are_skipped() {
        let hsps = vec![hsp((1, 5), (1, 4), "ACGT", "ACG")];
        let graph = build_alignment_graph(&hsps);
        assert!(graph.alignments().is_empty());
    }
}
