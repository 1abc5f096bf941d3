//! Input to the core: the `AlignmentGraph` (§2, §6).
//!
//! Vertices are `(SeqId, Interval)` nodes with normalised, half-open
//! coordinates. Endpoints on the same sequence are free to overlap across
//! different alignments — reconciling those overlaps into disjoint modules is
//! exactly what `partition` does; an external collaborator (`mhg-io`) only
//! has to hand over well-formed coordinates and masks.

use derive_new::new;
use indexmap::IndexMap;

use crate::bitmask::Bitmask;
use crate::interval::{
    Interval,
    Orientation,
};
use crate::seq::SeqId;

/// One directed half of an alignment: the path on the *other* endpoint's sequence
/// and the gap bitmask from this side's point of view (§6).
#[derive(Clone, Debug, new)]
pub struct DirectedEdge {
    pub from_seq: SeqId,
    pub from_path: Interval,
    pub to_seq: SeqId,
    pub to_path: Interval,
    pub to_orientation: Orientation,
    pub mask: Bitmask,
}

/// Both directed halves of one alignment plus the orientation of each side,
/// grouped as the multi-edge bundle §6 describes ("edges between the same pair
/// are indexed 0,1,…").
#[derive(Clone, Debug, new)]
pub struct Alignment {
    pub seq_a: SeqId,
    pub path_a: Interval,
    pub orient_a: Orientation,
    pub seq_b: SeqId,
    pub path_b: Interval,
    pub orient_b: Orientation,
    pub mask_ab: Bitmask,
    pub mask_ba: Bitmask,
    /// Index among parallel edges between the same unordered endpoint pair.
    pub bundle_index: usize,
}

/// The directed multigraph the core consumes for one run (§2 "Alignment graph
/// `G`"). Read-only after construction.
#[derive(Debug, Default)]
pub struct AlignmentGraph {
    nodes: IndexMap<SeqId, Vec<Interval>>,
    alignments: Vec<Alignment>,
}

impl AlignmentGraph {
    pub fn add_node(&mut self, seq: SeqId, interval: Interval) {
        let entry = self.nodes.entry(seq).or_default();
        if !entry.contains(&interval) {
            entry.push(interval);
        }
    }

    pub fn add_alignment(&mut self, alignment: Alignment) {
        self.add_node(alignment.seq_a.clone(), alignment.path_a);
        self.add_node(alignment.seq_b.clone(), alignment.path_b);
        self.alignments.push(alignment);
    }

    pub fn alignments(&self) -> &[Alignment] {
        &self.alignments
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&SeqId, &Interval)> {
        self.nodes.iter().flat_map(|(s, ivs)| ivs.iter().map(move |iv| (s, iv)))
    }
}
