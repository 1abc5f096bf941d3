//! §4.5 Two-Way Module Chop and the §4.4 "middle-split" three-way chop.
//!
//! Both operations build their replacement module(s) as fresh, disconnected
//! values and let the caller register them through `Indexes::replace_module` —
//! this crate never mutates a module in place while a chop is still in progress,
//! matching §9's "work queue, never mutates indexes an outer loop is reading".

use std::collections::VecDeque;

use indexmap::{
    IndexMap,
    IndexSet,
};

use crate::bitmask::Bitmask;
use crate::constants::MIN_BLOCK_LEN_TRIM;
use crate::error::MhgResult;
use crate::interval::{
    BlockKey,
    BlockVertex,
    Interval,
    Orientation,
};
use crate::module::Module;

/// Coordinate offset `0..=len` of the split point, measured from a block's `lo`
/// in absolute (not orientation-relative) terms — see DESIGN.md for why this
/// crate treats mask column 0 as aligned with a block's `lo`, not its orientation
/// reading start.
type Offsets = IndexMap<BlockKey, u64>;

/// Breadth-first propagate a split at `offsets[v_key]` to every block reachable
/// from `v_key` via dual edges, recomputing each hop's column through
/// `chop_index` (§4.5, §4.8: "never by an arithmetic shortcut").
fn propagate_offsets(module: &Module, v_key: &BlockKey, k: u64) -> MhgResult<Offsets> {
    let mut offsets = Offsets::new();
    offsets.insert(v_key.clone(), k);
    let mut visited: IndexSet<BlockKey> = IndexSet::new();
    visited.insert(v_key.clone());
    let mut queue: VecDeque<BlockKey> = VecDeque::new();
    queue.push_back(v_key.clone());

    while let Some(cur) = queue.pop_front() {
        let cur_v = module
            .vertex(&cur)
            .expect("BFS only visits blocks present in the module");
        let cur_len = cur_v.interval.len();
        let cur_offset = offsets[&cur];

        for (other, masks) in module.edges_from(&cur) {
            if visited.contains(other) {
                continue;
            }
            let Some(mask_fwd) = masks.first() else {
                continue;
            };
            let Some(mask_bwd) = module
                .edge_masks(other, &cur)
                .and_then(|ms| ms.first())
            else {
                continue;
            };

            let column = if cur_offset == 0 {
                0
            } else if cur_offset == cur_len {
                mask_bwd.len()
            } else {
                mask_bwd.chop_index(cur_offset)?
            };
            let other_v = module.vertex(other).unwrap();
            let other_offset = if column == 0 {
                0
            } else if column == mask_fwd.len() {
                other_v.interval.len()
            } else {
                mask_fwd.popcount_prefix(column)
            };

            offsets.insert(other.clone(), other_offset);
            visited.insert(other.clone());
            queue.push_back(other.clone());
        }
    }
    Ok(offsets)
}

/// Fragment of a block-vertex on one side of a split: `None` when the split
/// lands exactly on that side's boundary (the whole block stays on the other
/// side) or the fragment is shorter than the retroactive-trim minimum (§7
/// ShortBlock).
fn fragment(v: &BlockVertex, lo: u64, hi: u64) -> Option<BlockVertex> {
    if hi <= lo || hi - lo < MIN_BLOCK_LEN_TRIM {
        return None;
    }
    Some(BlockVertex::new(
        v.seq.clone(),
        Interval::new(lo, hi),
        v.orientation,
    ))
}

/// Split `module` at `offsets[key]` for every key, returning `(left, right)`
/// modules holding `[lo, lo+offset)` and `[lo+offset, hi)` respectively, with
/// edges re-sliced through the same columns used to compute the offsets.
fn split_module(module: &Module, offsets: &Offsets) -> (Module, Module) {
    let mut left = Module::default();
    let mut right = Module::default();
    let mut left_of: IndexMap<BlockKey, BlockVertex> = IndexMap::new();
    let mut right_of: IndexMap<BlockKey, BlockVertex> = IndexMap::new();

    for (key, v) in module.keys().map(|k| (k, module.vertex(k).unwrap())) {
        let offset = offsets.get(key).copied().unwrap_or(v.interval.len());
        if let Some(lv) = fragment(v, v.interval.lo, v.interval.lo + offset) {
            left.insert_vertex(lv.clone());
            left_of.insert(key.clone(), lv);
        }
        if let Some(rv) = fragment(v, v.interval.lo + offset, v.interval.hi) {
            right.insert_vertex(rv.clone());
            right_of.insert(key.clone(), rv);
        }
    }

    for key in module.keys() {
        let v = module.vertex(key).unwrap();
        let offset = offsets.get(key).copied().unwrap_or(v.interval.len());
        for (other, masks) in module.edges_from(key) {
            for mask in masks {
                let Ok(col) = (if offset == 0 {
                    Ok(0)
                } else if offset == v.interval.len() {
                    Ok(mask.len())
                } else {
                    module
                        .edge_masks(other, key)
                        .and_then(|ms| ms.first())
                        .map(|m| m.chop_index(offset))
                        .unwrap_or(Ok(mask.len()))
                }) else {
                    continue;
                };

                if let (Some(lk), Some(lo)) = (left_of.get(key), left_of.get(other)) {
                    left.add_edge(lk.key(), lo.key(), mask.slice(0, col));
                }
                if let (Some(rk), Some(ro)) = (right_of.get(key), right_of.get(other)) {
                    right.add_edge(rk.key(), ro.key(), mask.slice(col, mask.len()));
                }
            }
        }
    }

    (left, right)
}

/// §4.5 two-way module chop: split `module` at block `v_key`'s coordinate
/// `lo + k`. Returns `(m1, m2)` such that `v`'s `[lo, lo+k)` fragment is in `m1`
/// when `v`'s orientation is `+`, in `m2` when `-` (so the caller's remaining
/// interval logic never has to branch on orientation itself).
pub fn two_way_chop(module: &Module, v_key: &BlockKey, k: u64) -> MhgResult<(Module, Module)> {
    let v = module
        .vertex(v_key)
        .expect("two_way_chop called with a key not present in the module");
    let offsets = propagate_offsets(module, v_key, k)?;
    let (left, right) = split_module(module, &offsets);
    Ok(match v.orientation {
        Orientation::Plus => (left, right),
        Orientation::Minus => (right, left),
    })
}

/// §4.4 "middle-split": cut block `(seq,[bs,be),o)` at two interior points
/// `bs <= c1 < c2 <= be` into up to three fragments, returned in module
/// traversal order (reversed when `o = -`, since that module reads the block
/// right-to-left).
pub fn three_way_split(v: &BlockVertex, c1: u64, c2: u64) -> Vec<BlockVertex> {
    let bs = v.interval.lo;
    let be = v.interval.hi;
    let mut pieces: Vec<BlockVertex> = [(bs, c1), (c1, c2), (c2, be)]
        .into_iter()
        .filter_map(|(lo, hi)| fragment(v, lo, hi))
        .collect();
    if v.orientation == Orientation::Minus {
        pieces.reverse();
    }
    pieces
}

/// Re-slice `mask` at internal column `col`, producing the left/right fragments
/// attached to each half of a three-way or two-way split (§4.4 orientation
/// handling: reversed when the block's orientation disagrees with the
/// alignment's).
pub fn split_mask_at(mask: &Bitmask, col: u64) -> (Bitmask, Bitmask) {
    (mask.slice(0, col), mask.slice(col, mask.len()))
}
