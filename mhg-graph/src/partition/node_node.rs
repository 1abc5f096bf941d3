//! §4.3 Node↔Node Partition: neither endpoint is yet assigned to any module.

use tracing::trace;

use crate::alignment::Alignment;
use crate::constants::MIN_BLOCK_LEN_CREATE;
use crate::error::MhgResult;
use crate::indexes::Indexes;
use crate::interval::{
    BlockVertex,
    Interval,
    Orientation,
};

use super::Side;

/// Cut `node.interval` at `{path.lo, path.hi}` and register every non-`path`
/// fragment as its own singleton `+` module (§4.3). Fragments shorter than the
/// creation threshold are silently dropped (§7 ShortBlock).
fn register_flanks(indexes: &mut Indexes, side: &Side) {
    let node_iv = side.node.interval;
    let path = side.path;
    let flanks = [
        Interval::new(node_iv.lo, path.lo),
        Interval::new(path.hi, node_iv.hi),
    ];
    for flank in flanks {
        if flank.len() >= MIN_BLOCK_LEN_CREATE {
            let v = BlockVertex::new(side.node.seq.clone(), flank, Orientation::Plus);
            indexes.new_singleton(v);
        } else if !flank.is_empty() {
            trace!(len = flank.len(), "dropping sub-minimum flank at node-node split");
        }
    }
}

/// Create a fresh module with `path_A` and `path_B` directly connected (§4.3).
pub fn partition(
    indexes: &mut Indexes,
    side_a: Side,
    side_b: Side,
    alignment: &Alignment,
) -> MhgResult<()> {
    register_flanks(indexes, &side_a);
    register_flanks(indexes, &side_b);

    let v_a = BlockVertex::new(side_a.node.seq.clone(), side_a.path, alignment.orient_a);
    let v_b = BlockVertex::new(side_b.node.seq.clone(), side_b.path, alignment.orient_b);

    let module = crate::module::Module::new_pair(
        v_a,
        v_b,
        alignment.mask_ab.clone(),
        alignment.mask_ba.clone(),
    );
    indexes.new_module(module);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmask::Bitmask;
    use crate::interval::Node;
    use crate::seq::SeqId;

    #[test]
    fn two_whole_nodes_form_one_module_with_no_flanks() {
        let mut indexes = Indexes::default();
        let seq1 = SeqId::from("seq1");
        let seq2 = SeqId::from("seq2");
        let side_a = Side {
            node: Node::new(seq1.clone(), Interval::new(1, 100)),
            path: Interval::new(1, 100),
        };
        let side_b = Side {
            node: Node::new(seq2.clone(), Interval::new(1, 100)),
            path: Interval::new(1, 100),
        };
        let alignment = Alignment::new(
            seq1.clone(),
            Interval::new(1, 100),
            Orientation::Plus,
            seq2.clone(),
            Interval::new(1, 100),
            Orientation::Plus,
            Bitmask::ones(99),
            Bitmask::ones(99),
            0,
        );
        partition(&mut indexes, side_a, side_b, &alignment).unwrap();
        assert_eq!(indexes.arena.len(), 1);
        let (_, module) = indexes.arena.iter().next().unwrap();
        assert_eq!(module.len(), 2);
    }

    #[test]
    fn flanking_fragments_become_singleton_modules() {
        let mut indexes = Indexes::default();
        let seq1 = SeqId::from("seq1");
        let seq2 = SeqId::from("seq2");
        let side_a = Side {
            node: Node::new(seq1.clone(), Interval::new(1, 100)),
            path: Interval::new(20, 60),
        };
        let side_b = Side {
            node: Node::new(seq2.clone(), Interval::new(1, 41)),
            path: Interval::new(1, 41),
        };
        let alignment = Alignment::new(
            seq1.clone(),
            Interval::new(20, 60),
            Orientation::Plus,
            seq2.clone(),
            Interval::new(1, 41),
            Orientation::Plus,
            Bitmask::ones(40),
            Bitmask::ones(40),
            0,
        );
        partition(&mut indexes, side_a, side_b, &alignment).unwrap();
        // one paired module + two flanking singletons on seq1 ([1,20) and [60,100))
        assert_eq!(indexes.arena.len(), 3);
    }
}
