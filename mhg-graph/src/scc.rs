//! §4.7 SCC driver and trimming: the strongly-connected-component decomposition
//! of the input alignment graph is the unit of independent, deterministic
//! processing.

use indexmap::IndexMap;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{
    DiGraph,
    NodeIndex,
};
use tracing::{
    debug,
    info,
};

use crate::alignment::{
    Alignment,
    AlignmentGraph,
};
use crate::constants::{
    MIN_BLOCK_LEN_TRIM,
    PROGRESS_SIGNAL_THRESHOLD,
    TRIM_EVERY,
};
use crate::indexes::Indexes;
use crate::interval::Interval;
use crate::module::Module;
use crate::partition::dispatch_edge;
use crate::seq::SeqId;

type NodeKey = (SeqId, Interval);

/// Sort key giving a deterministic, reproducible edge-processing order (§5,
/// §9 Open Question 1): `(min(endpoint), max(endpoint), bundle_index)`.
fn order_key(a: &Alignment) -> (NodeKey, NodeKey, usize) {
    let ka = (a.seq_a.clone(), a.path_a);
    let kb = (a.seq_b.clone(), a.path_b);
    let (lo, hi) = if ka <= kb { (ka, kb) } else { (kb, ka) };
    (lo, hi, a.bundle_index)
}

fn node_index(pg: &mut DiGraph<NodeKey, usize>, index_of: &mut IndexMap<NodeKey, NodeIndex>, key: NodeKey) -> NodeIndex {
    *index_of.entry(key.clone()).or_insert_with(|| pg.add_node(key))
}

/// Partition the whole input graph, returning every surviving module across all
/// SCCs (singleton modules already filtered, §4.7 step 5).
pub fn partition_alignment_graph(graph: &AlignmentGraph) -> Vec<Module> {
    let mut pg = DiGraph::<NodeKey, usize>::new();
    let mut index_of: IndexMap<NodeKey, NodeIndex> = IndexMap::new();

    for (i, alignment) in graph.alignments().iter().enumerate() {
        let ia = node_index(&mut pg, &mut index_of, (alignment.seq_a.clone(), alignment.path_a));
        let ib = node_index(&mut pg, &mut index_of, (alignment.seq_b.clone(), alignment.path_b));
        pg.add_edge(ia, ib, i);
        pg.add_edge(ib, ia, i);
    }

    let sccs = tarjan_scc(&pg);
    let mut output = Vec::new();

    for scc in sccs {
        let members: indexmap::IndexSet<NodeIndex> = scc.into_iter().collect();
        if members.len() < 2 {
            continue;
        }

        let mut edges: Vec<&Alignment> = graph
            .alignments()
            .iter()
            .filter(|a| {
                let ia = index_of[&(a.seq_a.clone(), a.path_a)];
                let ib = index_of[&(a.seq_b.clone(), a.path_b)];
                members.contains(&ia) && members.contains(&ib)
            })
            .collect();
        edges.sort_by_key(|a| order_key(a));

        output.extend(run_scc(&edges));
    }

    output
}

fn run_scc(edges: &[&Alignment]) -> Vec<Module> {
    let mut indexes = Indexes::default();
    let large = edges.len() > PROGRESS_SIGNAL_THRESHOLD;
    let mut last_reported_pct = 0usize;

    for (i, &alignment) in edges.iter().enumerate() {
        let node_a = crate::interval::Node::new(alignment.seq_a.clone(), alignment.path_a);
        let node_b = crate::interval::Node::new(alignment.seq_b.clone(), alignment.path_b);

        if let Err(err) = dispatch_edge(&mut indexes, node_a, node_b, alignment) {
            debug!(?err, "edge dropped after recoverable error");
        }

        if (i + 1) % TRIM_EVERY == 0 {
            indexes.trim_short_blocks(MIN_BLOCK_LEN_TRIM);
        }

        if large {
            let pct = ((i + 1) * 100) / edges.len();
            if pct > last_reported_pct {
                info!(pct, "SCC progress");
                last_reported_pct = pct;
            }
        }
    }

    indexes.trim_short_blocks(MIN_BLOCK_LEN_TRIM);
    compact(indexes)
}

/// §4.7 step 5: drop singleton modules and structurally identical duplicates.
fn compact(indexes: Indexes) -> Vec<Module> {
    let mut seen_signatures = indexmap::IndexSet::new();
    let mut out = Vec::new();
    for (_, module) in indexes.arena.iter() {
        if module.is_singleton() {
            continue;
        }
        let sig = signature(module);
        if seen_signatures.insert(sig) {
            out.push(module.clone());
        }
    }
    out
}

/// Canonical signature for structural-equality dedup: sorted block-vertex keys.
/// Two modules built from the same edges in different orders collapse to one.
fn signature(module: &Module) -> Vec<String> {
    let mut keys: Vec<String> = module
        .vertices()
        .map(|v| format!("{}:{}:{}", v.seq, v.interval.lo, v.interval.hi))
        .collect();
    keys.sort();
    keys
}
