use thiserror::Error;

use crate::interval::Interval;
use crate::seq::SeqId;

/// Result alias used throughout the partitioner. Every `MhgError` is recoverable
/// at the edge-processing level (§7): callers inside this crate handle each
/// variant locally and never propagate it past the edge that produced it.
pub type MhgResult<T> = Result<T, MhgError>;

#[derive(Debug, Error)]
pub enum MhgError {
    /// `chop_index` called with `k` beyond the mask's popcount — the mask and the
    /// coordinate it is sliced against have drifted out of sync. Recovery: drop
    /// the current edge and roll the indexes back to their pre-edge snapshot.
    #[error("chop_index: k={k} exceeds popcount={popcount}")]
    IndexLookup { k: u64, popcount: u64 },

    /// Post-step check found two overlapping block-vertices on one sequence inside
    /// a module. Recovery: remove the offending module, keep processing.
    #[error("module invariant violated: overlapping blocks on {seq} within module")]
    InvariantViolation { seq: SeqId },

    /// An alignment would be placed inside a region already owned by another
    /// module with more than the long-overlap bound of overlap. Recovery: drop
    /// the alignment silently.
    #[error("overlap of {overlap} exceeds long-overlap bound on {seq}")]
    LongOverlap { seq: SeqId, overlap: u64 },

    /// The resulting block would be shorter than the minimum length for its
    /// context (creation or trim). Recovery: drop the would-be block.
    #[error("block {interval:?} on {seq} shorter than minimum length {min_len}")]
    ShortBlock {
        seq: SeqId,
        interval: Interval,
        min_len: u64,
    },

    /// Recursion reached a destination module already destroyed by an earlier
    /// recursive step. Recovery: return early from the recursive call.
    #[error("module {0:?} no longer present in the index")]
    MissingModule(crate::module::ModuleId),
}
