//! Interval-graph partitioner: groups pairwise sequence alignments into
//! homology modules (small multi-genome graphs of aligned blocks connected by
//! gap-bitmask edges). See `SPEC_FULL.md` for the full specification this crate
//! implements; module-level docs below point back at the relevant section.

pub mod alignment;
pub mod bitmask;
pub mod block_index;
pub mod constants;
pub mod error;
pub mod indexes;
pub mod interval;
pub mod module;
pub mod output;
pub mod partition;
pub mod scc;
pub mod seq;

pub use alignment::{
    Alignment,
    AlignmentGraph,
    DirectedEdge,
};
pub use bitmask::Bitmask;
pub use error::{
    MhgError,
    MhgResult,
};
pub use interval::{
    BlockKey,
    BlockVertex,
    Interval,
    Node,
    Orientation,
};
pub use module::{
    Module,
    ModuleArena,
    ModuleId,
};
pub use scc::partition_alignment_graph;
pub use seq::SeqId;

#[cfg(test)]
mod tests {
    use super::*;

    /// §8 boundary scenario 3: anti-parallel alignment reverses one mask.
    #[test]
    fn anti_parallel_alignment_flips_orientation_and_mask() {
        let mut graph = AlignmentGraph::default();
        let seq_a = SeqId::from("A");
        let seq_d = SeqId::from("D");
        graph.add_alignment(Alignment::new(
            seq_a.clone(),
            Interval::new(1, 50),
            Orientation::Plus,
            seq_d.clone(),
            Interval::new(1, 50),
            Orientation::Minus,
            Bitmask::ones(49),
            Bitmask::ones(49).reversed(),
            0,
        ));
        let modules = partition_alignment_graph(&graph);
        assert_eq!(modules.len(), 1);
        let module = &modules[0];
        let a_key = BlockKey::new(seq_a, Interval::new(1, 50));
        let d_key = BlockKey::new(seq_d, Interval::new(1, 50));
        assert_eq!(module.orientation_of(&a_key), Some(Orientation::Plus));
        assert_eq!(module.orientation_of(&d_key), Some(Orientation::Minus));
    }

    /// §8 boundary scenario 2: a second alignment lands on a sequence already
    /// owned by a module. Regression test for a bug where `new_module` left
    /// the block index empty, so `modules_overlapping` never found the
    /// existing module and this case fell through to `node_node` instead of
    /// `node_module`, corrupting the disjoint-block invariant.
    #[test]
    fn second_alignment_into_an_existing_module_reaches_node_module() {
        let mut graph = AlignmentGraph::default();
        let seq_a = SeqId::from("A");
        let seq_b = SeqId::from("B");
        let seq_c = SeqId::from("C");

        graph.add_alignment(Alignment::new(
            seq_a.clone(),
            Interval::new(1, 100),
            Orientation::Plus,
            seq_b.clone(),
            Interval::new(1, 100),
            Orientation::Plus,
            Bitmask::ones(99),
            Bitmask::ones(99),
            0,
        ));
        graph.add_alignment(Alignment::new(
            seq_a.clone(),
            Interval::new(20, 60),
            Orientation::Plus,
            seq_c.clone(),
            Interval::new(1, 41),
            Orientation::Plus,
            Bitmask::ones(40),
            Bitmask::ones(40),
            1,
        ));

        let modules = partition_alignment_graph(&graph);

        // A must end up split into exactly three disjoint fragments across
        // the surviving modules: [1,20), [20,60), [60,100).
        let mut a_intervals: Vec<Interval> = modules
            .iter()
            .flat_map(|m| m.vertices())
            .filter(|v| v.seq == seq_a)
            .map(|v| v.interval)
            .collect();
        a_intervals.sort_by_key(|iv| iv.lo);
        assert_eq!(
            a_intervals,
            vec![Interval::new(1, 20), Interval::new(20, 60), Interval::new(60, 100)]
        );

        // C must share a module with the A[20,60)/B[20,60) fragment it aligned to.
        let c_module = modules
            .iter()
            .find(|m| m.vertices().any(|v| v.seq == seq_c))
            .expect("C was never linked into any module");
        let mid = BlockKey::new(seq_a, Interval::new(20, 60));
        assert!(c_module.contains(&mid));
        assert!(c_module.contains(&BlockKey::new(seq_b, Interval::new(20, 60))));

        // No sequence has overlapping live blocks across the final module set.
        for module in &modules {
            assert!(!module.has_overlap_on_any_sequence());
        }
    }

    /// §8 boundary scenario 5: nothing shorter than the trim threshold survives.
    #[test]
    fn every_surviving_block_meets_the_trim_threshold() {
        let mut graph = AlignmentGraph::default();
        let seq_a = SeqId::from("A");
        let seq_b = SeqId::from("B");
        graph.add_alignment(Alignment::new(
            seq_a.clone(),
            Interval::new(1, 100),
            Orientation::Plus,
            seq_b.clone(),
            Interval::new(1, 100),
            Orientation::Plus,
            Bitmask::ones(99),
            Bitmask::ones(99),
            0,
        ));
        let modules = partition_alignment_graph(&graph);
        for module in &modules {
            for v in module.vertices() {
                assert!(v.interval.len() >= constants::MIN_BLOCK_LEN_TRIM);
            }
        }
    }
}
