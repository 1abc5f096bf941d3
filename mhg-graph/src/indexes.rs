//! `Indexes` bundles the three shared structures an SCC run mutates (§2):
//! `NodeToPaths` (`BlockIndex`), `PathToModule`, and the module arena. Bundled
//! together so a single snapshot/restore pair (§9 "Rollback snapshots") covers
//! everything a partition step can have touched.

use indexmap::{
    IndexMap,
    IndexSet,
};

use crate::block_index::BlockIndex;
use crate::interval::{
    BlockKey,
    BlockVertex,
    Interval,
};
use crate::module::{
    Module,
    ModuleArena,
    ModuleArenaSnapshot,
    ModuleId,
};
use crate::seq::SeqId;

#[derive(Debug, Default)]
pub struct Indexes {
    pub blocks: BlockIndex,
    path_to_module: IndexMap<BlockKey, ModuleId>,
    pub arena: ModuleArena,
}

impl Indexes {
    pub fn module_of(&self, key: &BlockKey) -> Option<ModuleId> {
        self.path_to_module.get(key).copied()
    }

    /// Modules with at least one block on `seq` overlapping `q` (§4.1 step 1 of
    /// §4.4's `node_vs_modules`). Returned as distinct `ModuleId`s.
    pub fn modules_overlapping(&self, seq: &SeqId, q: &Interval) -> IndexSet<ModuleId> {
        self.blocks
            .overlapping(seq, q)
            .into_iter()
            .filter_map(|iv| self.module_of(&BlockKey::new(seq.clone(), iv)))
            .collect()
    }

    /// Register a freshly created block-vertex: add it to the live interval set,
    /// record its owning module.
    pub fn register_block(&mut self, module: ModuleId, key: BlockKey) {
        self.blocks.insert(key.seq.clone(), key.interval);
        self.path_to_module.insert(key, module);
    }

    /// Remove a block from both indexes (destroyed by composition or trimming, §3
    /// "Lifecycle").
    pub fn unregister_block(&mut self, key: &BlockKey) {
        self.blocks.remove(&key.seq, &key.interval);
        self.path_to_module.shift_remove(key);
    }

    /// Insert a brand-new singleton module for `v` and register its block.
    pub fn new_singleton(&mut self, v: BlockVertex) -> ModuleId {
        let key = v.key();
        let id = self.arena.insert(Module::singleton(v));
        self.register_block(id, key);
        id
    }

    /// Allocate a module and register every one of its block-vertices, in both
    /// `path_to_module` and the live interval set — without the latter,
    /// `modules_overlapping` (and everything built on it: dispatch, boundary
    /// reconciliation) can never see this module's blocks again.
    pub fn new_module(&mut self, module: Module) -> ModuleId {
        let keys: Vec<BlockKey> = module.keys().cloned().collect();
        let id = self.arena.insert(module);
        for key in keys {
            self.blocks.insert(key.seq.clone(), key.interval);
            self.path_to_module.insert(key, id);
        }
        id
    }

    /// Deregister every block of `id` and drop the module from the arena (§4.6
    /// step 2, "Apply Repl": deregister the old").
    pub fn destroy_module(&mut self, id: ModuleId) {
        if let Some(module) = self.arena.remove(id) {
            for key in module.keys() {
                self.blocks.remove(&key.seq, &key.interval);
                self.path_to_module.shift_remove(key);
            }
        }
    }

    /// Replace `old` with freshly built `new_modules`, re-registering every block
    /// (§4.6 step 2).
    pub fn replace_module(&mut self, old: ModuleId, new_modules: Vec<Module>) -> Vec<ModuleId> {
        self.destroy_module(old);
        new_modules.into_iter().map(|m| self.new_module(m)).collect()
    }

    pub fn snapshot(&self) -> IndexesSnapshot {
        IndexesSnapshot {
            blocks: self.blocks.clone(),
            path_to_module: self.path_to_module.clone(),
            arena: self.arena.snapshot(),
        }
    }

    pub fn restore(&mut self, snapshot: IndexesSnapshot) {
        self.blocks = snapshot.blocks;
        self.path_to_module = snapshot.path_to_module;
        self.arena.restore(snapshot.arena);
    }

    /// Remove every live block shorter than `min_len` from both indexes, dropping
    /// modules left empty or singleton (§4.7 step 4, short-block trimming).
    pub fn trim_short_blocks(&mut self, min_len: u64) {
        let doomed: Vec<(BlockKey, ModuleId)> = self
            .path_to_module
            .iter()
            .filter(|(k, _)| k.interval.len() < min_len)
            .map(|(k, id)| (k.clone(), *id))
            .collect();
        let mut touched: IndexSet<ModuleId> = IndexSet::new();
        for (key, id) in doomed {
            touched.insert(id);
            self.unregister_block(&key);
            if let Some(module) = self.arena.get_mut(id) {
                module.remove_vertex(&key);
            }
        }
        for id in touched {
            if let Some(module) = self.arena.get(id) {
                if module.is_singleton() {
                    self.destroy_module(id);
                }
            }
        }
    }

    /// Invariant 2 (§3, §8 property 2): every live block's module exists and
    /// contains a block-vertex with that exact interval.
    pub fn path_to_module_is_consistent(&self) -> bool {
        self.path_to_module.iter().all(|(key, id)| {
            self.arena
                .get(*id)
                .and_then(|m| m.vertex(key))
                .is_some_and(|v| v.interval == key.interval)
        })
    }
}

#[derive(Debug)]
pub struct IndexesSnapshot {
    blocks: BlockIndex,
    path_to_module: IndexMap<BlockKey, ModuleId>,
    arena: ModuleArenaSnapshot,
}
