//! Shared machinery behind §4.4 (node↔module) and §4.6 (module↔module): cutting
//! an existing module's blocks to the boundaries of an incoming alignment path,
//! then linking the resulting fragments to the other side of the alignment.
//!
//! Rather than the mutually-recursive case-a/b/c/d descent spec.md spells out
//! verbatim, this crate reconciles a path's boundaries against its existing
//! modules in one linear pass (`reconcile_boundaries`) and then walks the
//! resulting, now-boundary-aligned fragments (`fragments_within`). The two
//! produce the same end state — q exactly chopped at every module boundary it
//! crosses, every uncovered stretch left for the caller to create — with less
//! code than threading the explicit recursive cases; see DESIGN.md.

use tracing::{
    debug,
    trace,
    warn,
};

use crate::bitmask::Bitmask;
use crate::constants::{
    LONG_OVERLAP_BOUND,
    MIN_BLOCK_LEN_CREATE,
};
use crate::error::MhgResult;
use crate::indexes::Indexes;
use crate::interval::{
    BlockKey,
    BlockVertex,
    Interval,
    Orientation,
};
use crate::module::{
    Module,
    ModuleId,
};
use crate::seq::SeqId;

use super::chop::two_way_chop;

/// A `path`-sized slice already resolved against the live index: either the
/// exact extent of a pre-existing block (`module = Some`) or an uncovered
/// stretch of `path` that will need a brand-new block-vertex (`module = None`).
#[derive(Clone, Debug)]
pub struct Fragment {
    pub interval: Interval,
    pub module: Option<ModuleId>,
}

/// Chop every live block on `seq` that straddles one of `cut_points` so that,
/// afterwards, no live block on `seq` has an interior point equal to a cut point
/// (§4.4 cases a/b/c/d collapse to this once boundaries are aligned).
pub fn reconcile_boundaries(indexes: &mut Indexes, seq: &SeqId, cut_points: &[u64]) -> MhgResult<()> {
    for &c in cut_points {
        loop {
            let probe = Interval::new(c, c + 1);
            let hit = indexes
                .blocks
                .overlapping(seq, &probe)
                .into_iter()
                .find(|iv| iv.lo < c && c < iv.hi);
            let Some(iv) = hit else { break };
            let key = BlockKey::new(seq.clone(), iv);
            let Some(module_id) = indexes.module_of(&key) else {
                break;
            };
            let Some(module) = indexes.arena.get(module_id) else {
                break;
            };
            let k = c - iv.lo;
            match two_way_chop(module, &key, k) {
                Ok((m1, m2)) => {
                    indexes.replace_module(module_id, vec![m1, m2]);
                }
                Err(err) => {
                    // IndexLookup: mask and coordinate drifted out of sync (§7).
                    // Drop this cut attempt and move on; the edge that triggered
                    // it is handled by the caller's own guard rails.
                    warn!(?err, "chop_index failed during boundary reconciliation");
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Resolve `path` into the ordered list of fragments covering it, after
/// `reconcile_boundaries` has already run for `path`'s endpoints (and, for
/// module↔module, any interior translated boundaries).
pub fn fragments_within(indexes: &Indexes, seq: &SeqId, path: Interval) -> Vec<Fragment> {
    let mut hits: Vec<Interval> = indexes
        .blocks
        .overlapping(seq, &path)
        .into_iter()
        .map(|iv| Interval::new(iv.lo.max(path.lo), iv.hi.min(path.hi)))
        .filter(|iv| !iv.is_empty())
        .collect();
    hits.sort_by_key(|iv| iv.lo);

    let mut out = Vec::new();
    let mut cursor = path.lo;
    for iv in hits {
        if iv.lo > cursor {
            out.push(Fragment {
                interval: Interval::new(cursor, iv.lo),
                module: None,
            });
        }
        let module = indexes.module_of(&BlockKey::new(seq.clone(), iv));
        out.push(Fragment { interval: iv, module });
        cursor = iv.hi.max(cursor);
    }
    if cursor < path.hi {
        out.push(Fragment {
            interval: Interval::new(cursor, path.hi),
            module: None,
        });
    }
    out
}

/// Translate a sub-interval of `from_path` into the corresponding sub-interval of
/// `to_path`, via `chop_index` on `mask_from_to` (popcount aligned with `to`) and
/// a prefix-popcount read on `mask_to_from` (popcount aligned with `from`) — the
/// convention this crate settled on for §4.2/§4.6's coordinate correspondence;
/// see DESIGN.md.
pub fn translate(
    from_path: Interval,
    from_orient: Orientation,
    to_path: Interval,
    to_orient: Orientation,
    mask_from_to: &Bitmask,
    mask_to_from: &Bitmask,
    sub: Interval,
) -> MhgResult<Interval> {
    let l = sub.lo - from_path.lo;
    let r = sub.hi - from_path.lo;
    let c_l = if l == 0 { 0 } else { mask_to_from.chop_index(l)? };
    let c_r = if r == from_path.len() {
        mask_to_from.len()
    } else {
        mask_to_from.chop_index(r)?
    };
    let left_pop = mask_from_to.popcount_prefix(c_l);
    let right_pop = mask_from_to.popcount_prefix(c_r);
    Ok(if from_orient == to_orient {
        Interval::new(to_path.lo + left_pop, to_path.lo + right_pop)
    } else {
        Interval::new(to_path.hi - right_pop, to_path.hi - left_pop)
    })
}

/// §4.6 guard rail: an overlap beyond the long-overlap bound drops the edge,
/// otherwise it is truncated to the non-overlapping remainder.
pub fn clamp_overlap(requested: Interval, already_owned: Interval) -> Option<Interval> {
    let overlap = requested.overlaps(&already_owned);
    if !overlap {
        return Some(requested);
    }
    let overlap_len = requested.lo.max(already_owned.lo)..requested.hi.min(already_owned.hi);
    let overlap_len = overlap_len.end.saturating_sub(overlap_len.start);
    if overlap_len > LONG_OVERLAP_BOUND {
        None
    } else if requested.lo < already_owned.lo {
        Some(Interval::new(requested.lo, already_owned.lo))
    } else {
        Some(Interval::new(already_owned.hi, requested.hi))
    }
}

/// Link one `dest` fragment to its corresponding `source` interval, creating
/// whichever side is not yet backed by a module and composing the two when both
/// already are (§4.4 orientation handling, §4.6 composition).
#[allow(clippy::too_many_arguments)]
pub fn link(
    indexes: &mut Indexes,
    dest_seq: &SeqId,
    dest_fragment: &Fragment,
    dest_orientation: Orientation,
    source_seq: &SeqId,
    source_interval: Interval,
    source_module: Option<ModuleId>,
    source_orientation: Orientation,
    mask_dest_to_source: Bitmask,
    mask_source_to_dest: Bitmask,
) -> MhgResult<()> {
    if source_interval.len() < MIN_BLOCK_LEN_CREATE && source_module.is_none() {
        trace!("dropping sub-minimum newly created source fragment");
        return Ok(());
    }
    if dest_fragment.interval.len() < MIN_BLOCK_LEN_CREATE && dest_fragment.module.is_none() {
        trace!("dropping sub-minimum newly created dest fragment");
        return Ok(());
    }

    let dest_key = BlockKey::new(dest_seq.clone(), dest_fragment.interval);
    let source_key = BlockKey::new(source_seq.clone(), source_interval);

    match (dest_fragment.module, source_module) {
        (Some(mb), Some(ma)) if mb == ma => {
            // Family-membership guard (§4.6): both sides already assert this
            // homology, nothing to do.
            Ok(())
        }
        (Some(mb), Some(ma)) => {
            let source_module_value = indexes
                .arena
                .get(ma)
                .cloned()
                .ok_or(crate::error::MhgError::MissingModule(ma))?;
            let dest_module_value = indexes
                .arena
                .get(mb)
                .cloned()
                .ok_or(crate::error::MhgError::MissingModule(mb))?;

            let mut merged = source_module_value;
            let to_absorb = if dest_module_value.orientation_of(&dest_key) == Some(dest_orientation)
            {
                dest_module_value
            } else {
                dest_module_value.sign_reversed()
            };
            merged.absorb(&to_absorb);
            merged.add_edge(source_key.clone(), dest_key.clone(), mask_source_to_dest);
            merged.add_edge(dest_key.clone(), source_key.clone(), mask_dest_to_source);

            if merged.has_overlap_on_any_sequence() {
                warn!("module union broke the disjoint-block invariant, dropping union");
                return Err(crate::error::MhgError::InvariantViolation {
                    seq: dest_seq.clone(),
                });
            }

            indexes.destroy_module(ma);
            indexes.destroy_module(mb);
            indexes.new_module(merged);
            Ok(())
        }
        (Some(mb), None) => {
            let source_vertex = BlockVertex::new(source_seq.clone(), source_interval, source_orientation);
            if let Some(module) = indexes.arena.get_mut(mb) {
                module.insert_vertex(source_vertex);
                module.add_edge(source_key.clone(), dest_key.clone(), mask_source_to_dest);
                module.add_edge(dest_key.clone(), source_key.clone(), mask_dest_to_source);
            }
            indexes.register_block(mb, source_key);
            Ok(())
        }
        (None, Some(ma)) => {
            let dest_vertex = BlockVertex::new(dest_seq.clone(), dest_fragment.interval, dest_orientation);
            if let Some(module) = indexes.arena.get_mut(ma) {
                module.insert_vertex(dest_vertex);
                module.add_edge(source_key.clone(), dest_key.clone(), mask_source_to_dest);
                module.add_edge(dest_key.clone(), source_key.clone(), mask_dest_to_source);
            }
            indexes.register_block(ma, dest_key);
            Ok(())
        }
        (None, None) => {
            let dest_vertex = BlockVertex::new(dest_seq.clone(), dest_fragment.interval, dest_orientation);
            let source_vertex = BlockVertex::new(source_seq.clone(), source_interval, source_orientation);
            let module = Module::new_pair(source_vertex, dest_vertex, mask_source_to_dest, mask_dest_to_source);
            indexes.new_module(module);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_overlap_passes_through_disjoint_requests() {
        let req = Interval::new(100, 200);
        let owned = Interval::new(0, 50);
        assert_eq!(clamp_overlap(req, owned), Some(req));
    }

    #[test]
    fn clamp_overlap_drops_beyond_bound() {
        let req = Interval::new(0, 200);
        let owned = Interval::new(50, 300);
        assert_eq!(clamp_overlap(req, owned), None);
    }

    #[test]
    fn clamp_overlap_truncates_small_overlap() {
        let req = Interval::new(0, 200);
        let owned = Interval::new(190, 300);
        assert_eq!(clamp_overlap(req, owned), Some(Interval::new(0, 190)));
    }
}
