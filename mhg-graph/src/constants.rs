//! Tunable thresholds named in the module design; kept as named constants rather
//! than magic numbers at call sites.

/// Minimum length of a block at the moment it is created (§3 invariant 6).
pub const MIN_BLOCK_LEN_CREATE: u64 = 20;

/// Minimum length a block may retain after retroactive trimming (§4.7 step 4).
pub const MIN_BLOCK_LEN_TRIM: u64 = 10;

/// Overlap beyond which a module↔module edge is dropped rather than truncated (§4.6).
pub const LONG_OVERLAP_BOUND: u64 = 100;

/// Edge cadence at which short-block trimming runs during SCC processing.
pub const TRIM_EVERY: usize = 500;

/// Recursion depth past which the node↔module / module↔module descent should be
/// converted to an explicit work-stack (§9); recursive calls below this depth are
/// accepted directly.
pub const MAX_RECURSION_DEPTH: usize = 256;

/// SCC size above which a progress signal is emitted every 1% of edges processed (§7).
pub const PROGRESS_SIGNAL_THRESHOLD: usize = 10_000;
