//! §4.6 Module↔Module Partition: both endpoints of the alignment edge already lie
//! in existing modules.

use tracing::{
    debug,
    warn,
};

use crate::alignment::Alignment;
use crate::constants::MIN_BLOCK_LEN_CREATE;
use crate::error::MhgResult;
use crate::indexes::Indexes;
use crate::interval::Interval;
use crate::seq::SeqId;

use super::reconcile::{
    clamp_overlap,
    fragments_within,
    link,
    reconcile_boundaries,
    translate,
};
use super::Side;

/// Narrower form of §4.6's long-overlap guard rail: only partial (non-nested)
/// overlaps with an already-owned region are clamped or dropped. Intervals that
/// simply nest inside an existing block are left alone — that is the ordinary
/// composition case `reconcile_boundaries`/`fragments_within` already handle.
fn clamp_against_foreign_overlap(indexes: &Indexes, seq: &SeqId, requested: Interval) -> Option<Interval> {
    let mut cur = requested;
    for iv in indexes.blocks.overlapping(seq, &requested) {
        if iv.contains(&cur) || cur.contains(&iv) {
            continue;
        }
        match clamp_overlap(cur, iv) {
            Some(c) if !c.is_empty() => cur = c,
            _ => return None,
        }
    }
    Some(cur)
}

pub fn partition(indexes: &mut Indexes, side_a: Side, side_b: Side, alignment: &Alignment) -> MhgResult<()> {
    if side_a.path.len() < MIN_BLOCK_LEN_CREATE || side_b.path.len() < MIN_BLOCK_LEN_CREATE {
        debug!("dropping module-module alignment below minimum block length");
        return Ok(());
    }

    let snapshot = indexes.snapshot();

    // §4.6 step 1: reconcile the destination side (B) first.
    reconcile_boundaries(indexes, &side_b.node.seq, &[side_b.path.lo, side_b.path.hi])?;
    let b_fragments = fragments_within(indexes, &side_b.node.seq, side_b.path);

    let mut any_invariant_broken = false;

    for fragment in b_fragments {
        let a_interval = match translate(
            side_b.path,
            alignment.orient_b,
            side_a.path,
            alignment.orient_a,
            &alignment.mask_ba,
            &alignment.mask_ab,
            fragment.interval,
        ) {
            Ok(iv) => iv,
            Err(err) => {
                warn!(?err, "coordinate translation failed, dropping fragment");
                continue;
            }
        };
        if a_interval.is_empty() {
            continue;
        }

        let Some(a_interval) = clamp_against_foreign_overlap(indexes, &side_a.node.seq, a_interval) else {
            debug!("dropping alignment fragment: long overlap on source sequence");
            continue;
        };
        if a_interval.len() < MIN_BLOCK_LEN_CREATE {
            continue;
        }

        // §4.6 step 3: recursively reconcile the corresponding sub-interval on A.
        reconcile_boundaries(indexes, &side_a.node.seq, &[a_interval.lo, a_interval.hi])?;
        let a_fragments = fragments_within(indexes, &side_a.node.seq, a_interval);

        for a_fragment in a_fragments {
            let mask_a_to_b = alignment.mask_ab.slice_within(side_a.path, a_fragment.interval);
            let mask_b_to_a = alignment.mask_ba.slice_within(side_a.path, a_fragment.interval);

            let outcome = link(
                indexes,
                &side_b.node.seq,
                &fragment,
                alignment.orient_b,
                &side_a.node.seq,
                a_fragment.interval,
                a_fragment.module,
                alignment.orient_a,
                mask_b_to_a,
                mask_a_to_b,
            );
            if let Err(err) = outcome {
                warn!(?err, "module composition failed, pruning affected modules");
                any_invariant_broken = true;
            }
        }
    }

    if any_invariant_broken {
        // §4.6 guard rail: on a raised invariant violation restore the
        // pre-edge snapshot rather than leave a partially composed mess behind.
        indexes.restore(snapshot);
    }

    Ok(())
}

trait SliceWithin {
    fn slice_within(&self, path: Interval, sub: Interval) -> crate::bitmask::Bitmask;
}

impl SliceWithin for crate::bitmask::Bitmask {
    fn slice_within(&self, path: Interval, sub: Interval) -> crate::bitmask::Bitmask {
        let lo_off = sub.lo.saturating_sub(path.lo).min(path.len());
        let hi_off = sub.hi.saturating_sub(path.lo).min(path.len());
        let c_lo = if lo_off == 0 { 0 } else { self.chop_index(lo_off).unwrap_or(0) };
        let c_hi = if hi_off >= path.len() {
            self.len()
        } else {
            self.chop_index(hi_off).unwrap_or(self.len())
        };
        self.slice(c_lo.min(c_hi), c_hi.max(c_lo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmask::Bitmask;
    use crate::interval::{
        Node,
        Orientation,
    };
    use crate::partition::node_node::partition as node_node_partition;

    #[test]
    fn module_module_reuses_existing_blocks_on_exact_match() {
        let mut indexes = Indexes::default();
        let seq_a = SeqId::from("A");
        let seq_b = SeqId::from("B");
        let seq_c = SeqId::from("C");
        let seq_d = SeqId::from("D");

        let align_ab = Alignment::new(
            seq_a.clone(),
            Interval::new(1, 100),
            Orientation::Plus,
            seq_b.clone(),
            Interval::new(1, 100),
            Orientation::Plus,
            Bitmask::ones(99),
            Bitmask::ones(99),
            0,
        );
        node_node_partition(
            &mut indexes,
            Side { node: Node::new(seq_a.clone(), Interval::new(1, 100)), path: Interval::new(1, 100) },
            Side { node: Node::new(seq_b.clone(), Interval::new(1, 100)), path: Interval::new(1, 100) },
            &align_ab,
        )
        .unwrap();

        let align_cd = Alignment::new(
            seq_c.clone(),
            Interval::new(1, 100),
            Orientation::Plus,
            seq_d.clone(),
            Interval::new(1, 100),
            Orientation::Plus,
            Bitmask::ones(99),
            Bitmask::ones(99),
            0,
        );
        node_node_partition(
            &mut indexes,
            Side { node: Node::new(seq_c.clone(), Interval::new(1, 100)), path: Interval::new(1, 100) },
            Side { node: Node::new(seq_d.clone(), Interval::new(1, 100)), path: Interval::new(1, 100) },
            &align_cd,
        )
        .unwrap();

        let align_ac = Alignment::new(
            seq_a.clone(),
            Interval::new(1, 100),
            Orientation::Plus,
            seq_c.clone(),
            Interval::new(1, 100),
            Orientation::Plus,
            Bitmask::ones(99),
            Bitmask::ones(99),
            0,
        );
        partition(
            &mut indexes,
            Side { node: Node::new(seq_a.clone(), Interval::new(1, 100)), path: Interval::new(1, 100) },
            Side { node: Node::new(seq_c.clone(), Interval::new(1, 100)), path: Interval::new(1, 100) },
            &align_ac,
        )
        .unwrap();

        assert!(indexes.blocks.all_disjoint());
        // all four sequences now share one module.
        let id = indexes
            .module_of(&crate::interval::BlockKey::new(seq_a.clone(), Interval::new(1, 100)))
            .unwrap();
        let module = indexes.arena.get(id).unwrap();
        assert_eq!(module.sequences().len(), 4);
    }
}
