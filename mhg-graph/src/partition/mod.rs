//! Case-dispatched sub-procedures that advance the partition state for one
//! alignment edge (§2, §4.3-§4.6).

pub mod chop;
pub mod module_module;
pub mod node_module;
pub mod node_node;
pub mod reconcile;

use tracing::debug;

use crate::alignment::Alignment;
use crate::constants::MIN_BLOCK_LEN_CREATE;
use crate::error::MhgResult;
use crate::indexes::Indexes;
use crate::interval::{
    BlockKey,
    Interval,
    Node,
};

/// One side of an alignment edge as seen by the dispatcher: the node it was
/// drawn from (for node↔node partitioning) and the path the alignment actually
/// covers on that node's sequence.
#[derive(Clone, Debug)]
pub struct Side {
    pub node: Node,
    pub path: Interval,
}

impl Side {
    pub fn path_key(&self) -> BlockKey {
        BlockKey::new(self.node.seq.clone(), self.path)
    }
}

/// Dispatch one alignment edge by case (§2): node↔node, node↔module, or
/// module↔module, depending on whether each endpoint's path already lies inside
/// a registered module.
pub fn dispatch_edge(
    indexes: &mut Indexes,
    node_a: Node,
    node_b: Node,
    alignment: &Alignment,
) -> MhgResult<()> {
    if alignment.path_a.len() < MIN_BLOCK_LEN_CREATE || alignment.path_b.len() < MIN_BLOCK_LEN_CREATE {
        debug!("dropping alignment below minimum block length at creation");
        return Ok(());
    }

    let side_a = Side {
        node: node_a,
        path: alignment.path_a,
    };
    let side_b = Side {
        node: node_b,
        path: alignment.path_b,
    };

    let module_a = indexes.modules_overlapping(&side_a.node.seq, &side_a.path);
    let module_b = indexes.modules_overlapping(&side_b.node.seq, &side_b.path);

    match (module_a.is_empty(), module_b.is_empty()) {
        (true, true) => node_node::partition(indexes, side_a, side_b, alignment),
        (true, false) => node_module::partition(indexes, side_a, side_b, alignment, false),
        (false, true) => node_module::partition(indexes, side_b, side_a, alignment, true),
        (false, false) => module_module::partition(indexes, side_a, side_b, alignment),
    }
}
