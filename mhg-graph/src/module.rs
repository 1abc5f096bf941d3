//! Module data structure and composition (§3, §9).
//!
//! Modules are allocated in an arena and referenced by `ModuleId` everywhere else
//! in the crate (`PathToModule` stores ids, not module values) so that a module
//! can be replaced wholesale by its chopped descendants without invalidating keys
//! held elsewhere (§9 "Module sharing").

use derive_more::{
    Display,
    From,
};
use indexmap::{
    IndexMap,
    IndexSet,
};

use crate::bitmask::Bitmask;
use crate::interval::{
    BlockKey,
    BlockVertex,
    Orientation,
};

/// Identifier of a module within a `ModuleArena`. Opaque outside this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, From, Display)]
pub struct ModuleId(u64);

/// A small directed multigraph whose vertices are block-vertices and whose edges
/// carry gap bitmasks (§3). Edges are stored as an adjacency multimap keyed by
/// `BlockKey`, never by pointer, per §9.
#[derive(Clone, Debug, Default)]
pub struct Module {
    blocks: IndexMap<BlockKey, BlockVertex>,
    /// `(from, to) -> bundle of masks`, one entry per parallel edge between the pair.
    edges: IndexMap<(BlockKey, BlockKey), Vec<Bitmask>>,
}

impl Module {
    pub fn singleton(v: BlockVertex) -> Self {
        let mut m = Self::default();
        m.blocks.insert(v.key(), v);
        m
    }

    pub fn new_pair(a: BlockVertex, b: BlockVertex, mask_ab: Bitmask, mask_ba: Bitmask) -> Self {
        let mut m = Self::default();
        let ka = a.key();
        let kb = b.key();
        m.blocks.insert(ka.clone(), a);
        m.blocks.insert(kb.clone(), b);
        m.edges.insert((ka.clone(), kb.clone()), vec![mask_ab]);
        m.edges.insert((kb, ka), vec![mask_ba]);
        m
    }

    pub fn is_singleton(&self) -> bool {
        self.blocks.len() <= 1
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn contains(&self, key: &BlockKey) -> bool {
        self.blocks.contains_key(key)
    }

    pub fn vertex(&self, key: &BlockKey) -> Option<&BlockVertex> {
        self.blocks.get(key)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &BlockVertex> {
        self.blocks.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &BlockKey> + '_ {
        self.blocks.keys()
    }

    pub fn insert_vertex(&mut self, v: BlockVertex) {
        self.blocks.insert(v.key(), v);
    }

    pub fn remove_vertex(&mut self, key: &BlockKey) -> Option<BlockVertex> {
        let removed = self.blocks.shift_remove(key);
        self.edges
            .retain(|(a, b), _| a != key && b != key);
        removed
    }

    pub fn add_edge(&mut self, from: BlockKey, to: BlockKey, mask: Bitmask) {
        self.edges.entry((from, to)).or_default().push(mask);
    }

    /// All outgoing edges from `key`, as `(dest, masks)` pairs.
    pub fn edges_from<'a>(&'a self, key: &'a BlockKey) -> impl Iterator<Item = (&'a BlockKey, &'a [Bitmask])> {
        self.edges
            .iter()
            .filter(move |((a, _), _)| a == key)
            .map(|((_, b), masks)| (b, masks.as_slice()))
    }

    pub fn edge_masks(&self, from: &BlockKey, to: &BlockKey) -> Option<&[Bitmask]> {
        self.edges.get(&(from.clone(), to.clone())).map(Vec::as_slice)
    }

    /// Set of distinct `SeqId`s carried by this module's block-vertices.
    pub fn sequences(&self) -> IndexSet<crate::seq::SeqId> {
        self.blocks.values().map(|v| v.seq.clone()).collect()
    }

    /// Invariant 4 (§3): no two block-vertices on the same sequence overlap.
    pub fn has_overlap_on_any_sequence(&self) -> bool {
        let mut by_seq: IndexMap<crate::seq::SeqId, Vec<&BlockVertex>> = IndexMap::new();
        for v in self.blocks.values() {
            by_seq.entry(v.seq.clone()).or_default().push(v);
        }
        for verts in by_seq.values() {
            for i in 0..verts.len() {
                for j in (i + 1)..verts.len() {
                    if verts[i].interval.overlaps(&verts[j].interval) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Flip every block-vertex's orientation and reverse every edge's mask,
    /// yielding the equivalent module under invariant 5 (§3, §4.6 "re-orient to
    /// match frame").
    pub fn sign_reversed(&self) -> Self {
        let mut out = Module::default();
        for v in self.blocks.values() {
            out.insert_vertex(v.flip());
        }
        for ((from, to), masks) in &self.edges {
            for m in masks {
                out.add_edge(from.clone(), to.clone(), m.reversed());
            }
        }
        out
    }

    /// Graph composition used by module↔module processing (§4.6 "composition"):
    /// merge `other` into `self`, identifying any block-vertices the two already
    /// share by key rather than duplicating them.
    pub fn absorb(&mut self, other: &Module) {
        for v in other.blocks.values() {
            self.blocks.entry(v.key()).or_insert_with(|| v.clone());
        }
        for ((from, to), masks) in &other.edges {
            for m in masks {
                self.add_edge(from.clone(), to.clone(), m.clone());
            }
        }
    }

    /// Orientation of the block-vertex `key` within this module, if present.
    pub fn orientation_of(&self, key: &BlockKey) -> Option<Orientation> {
        self.blocks.get(key).map(|v| v.orientation)
    }
}

/// Arena owning all live modules of one SCC run, addressed by `ModuleId` (§9).
#[derive(Debug, Default)]
pub struct ModuleArena {
    modules: IndexMap<ModuleId, Module>,
    next_id: u64,
}

impl ModuleArena {
    pub fn insert(&mut self, module: Module) -> ModuleId {
        let id = ModuleId(self.next_id);
        self.next_id += 1;
        self.modules.insert(id, module);
        id
    }

    pub fn get(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(&id)
    }

    pub fn get_mut(&mut self, id: ModuleId) -> Option<&mut Module> {
        self.modules.get_mut(&id)
    }

    pub fn remove(&mut self, id: ModuleId) -> Option<Module> {
        self.modules.shift_remove(&id)
    }

    pub fn contains(&self, id: ModuleId) -> bool {
        self.modules.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules.iter().map(|(id, m)| (*id, m))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Snapshot for rollback (§9 "Rollback snapshots"); cheap because `Module`
    /// only holds owned small maps, no shared pointers.
    pub fn snapshot(&self) -> ModuleArenaSnapshot {
        ModuleArenaSnapshot {
            modules: self.modules.clone(),
            next_id: self.next_id,
        }
    }

    pub fn restore(&mut self, snapshot: ModuleArenaSnapshot) {
        self.modules = snapshot.modules;
        self.next_id = snapshot.next_id;
    }
}

#[derive(Debug, Clone)]
pub struct ModuleArenaSnapshot {
    modules: IndexMap<ModuleId, Module>,
    next_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::SeqId;
    use crate::interval::Interval;

    fn bv(seq: &str, lo: u64, hi: u64, o: Orientation) -> BlockVertex {
        BlockVertex::new(SeqId::from(seq), Interval::new(lo, hi), o)
    }

    #[test]
    fn new_pair_has_dual_edges() {
        let a = bv("s1", 1, 100, Orientation::Plus);
        let b = bv("s2", 1, 100, Orientation::Plus);
        let m = Module::new_pair(
            a.clone(),
            b.clone(),
            Bitmask::ones(100),
            Bitmask::ones(100),
        );
        assert_eq!(m.len(), 2);
        assert!(m.edge_masks(&a.key(), &b.key()).is_some());
        assert!(m.edge_masks(&b.key(), &a.key()).is_some());
    }

    #[test]
    fn sign_reversed_flips_orientation_and_mask() {
        let a = bv("s1", 1, 10, Orientation::Plus);
        let b = bv("s2", 1, 10, Orientation::Minus);
        let mask = Bitmask::from_bits([true, false, true]);
        let m = Module::new_pair(a.clone(), b.clone(), mask.clone(), mask.reversed());
        let flipped = m.sign_reversed();
        assert_eq!(
            flipped.orientation_of(&a.key()),
            Some(Orientation::Minus)
        );
        assert_eq!(flipped.orientation_of(&b.key()), Some(Orientation::Plus));
    }

    #[test]
    fn detects_overlap_on_same_sequence() {
        let mut m = Module::default();
        m.insert_vertex(bv("s1", 1, 20, Orientation::Plus));
        m.insert_vertex(bv("s1", 10, 30, Orientation::Plus));
        assert!(m.has_overlap_on_any_sequence());
    }
}
