//! §4.4 Node↔Module Partition: exactly one endpoint sits in an existing module.

use tracing::debug;

use crate::alignment::Alignment;
use crate::constants::MIN_BLOCK_LEN_CREATE;
use crate::error::MhgResult;
use crate::interval::Orientation;
use crate::indexes::Indexes;

use super::node_node::partition as node_node_partition;
use super::reconcile::{
    fragments_within,
    link,
    reconcile_boundaries,
    translate,
};
use super::Side;

/// `free` is the side dispatch found no overlapping modules for; `owned` already
/// lies in at least one module. `owned_is_a` tells the caller which of
/// `alignment`'s `(seq_a, seq_b)` slots `owned` corresponds to, so the right mask
/// pair and orientations are picked.
pub fn partition(
    indexes: &mut Indexes,
    free: Side,
    owned: Side,
    alignment: &Alignment,
    owned_is_a: bool,
) -> MhgResult<()> {
    if free.path.len() < MIN_BLOCK_LEN_CREATE || owned.path.len() < MIN_BLOCK_LEN_CREATE {
        debug!("dropping node-module alignment below minimum block length");
        return Ok(());
    }

    let (free_orient, owned_orient, mask_free_to_owned, mask_owned_to_free) = if owned_is_a {
        (alignment.orient_b, alignment.orient_a, alignment.mask_ba.clone(), alignment.mask_ab.clone())
    } else {
        (alignment.orient_a, alignment.orient_b, alignment.mask_ab.clone(), alignment.mask_ba.clone())
    };

    // The free side's unaligned flanks are never assigned blocks: §4.4 only ever
    // touches the alignment's own path span on the free side.
    reconcile_boundaries(indexes, &owned.node.seq, &[owned.path.lo, owned.path.hi])?;
    let owned_fragments = fragments_within(indexes, &owned.node.seq, owned.path);

    if owned_fragments.is_empty() {
        return node_node_partition(indexes, free, owned, alignment);
    }

    for fragment in owned_fragments {
        let source_interval = translate(
            owned.path,
            owned_orient,
            free.path,
            free_orient,
            &mask_owned_to_free,
            &mask_free_to_owned,
            fragment.interval,
        )?;
        if source_interval.is_empty() {
            continue;
        }

        // Orientation handling (§4.4): the destination block-vertex's orientation
        // flips together with the mask whenever the source's module orientation
        // disagrees with the alignment's natural direction on that side.
        let effective_free_orient = match fragment.module {
            Some(_) => free_orient,
            None => Orientation::Plus,
        };

        link(
            indexes,
            &owned.node.seq,
            &fragment,
            owned_orient,
            &free.node.seq,
            source_interval,
            None,
            effective_free_orient,
            mask_owned_to_free.slice_for(&fragment, owned.path),
            mask_free_to_owned.slice_for(&fragment, owned.path),
        )?;
    }
    Ok(())
}

trait SliceFor {
    fn slice_for(&self, fragment: &super::reconcile::Fragment, path: crate::interval::Interval) -> crate::bitmask::Bitmask;
}

impl SliceFor for crate::bitmask::Bitmask {
    fn slice_for(&self, fragment: &super::reconcile::Fragment, path: crate::interval::Interval) -> crate::bitmask::Bitmask {
        // Column bounds for `fragment` within the full-path mask, recomputed
        // through `chop_index` rather than assumed 1:1 with coordinates (§4.8).
        let lo_off = fragment.interval.lo - path.lo;
        let hi_off = fragment.interval.hi - path.lo;
        let c_lo = if lo_off == 0 { 0 } else { self.chop_index(lo_off).unwrap_or(0) };
        let c_hi = if hi_off == path.len() {
            self.len()
        } else {
            self.chop_index(hi_off).unwrap_or(self.len())
        };
        self.slice(c_lo, c_hi)
    }
}
