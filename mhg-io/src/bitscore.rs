//! Bitscore cut: drop HSPs whose bitscore is too low relative to their length
//! to be trusted as real homology, before they ever reach the partitioner.

use crate::blast::Hsp;

/// Default relative-score threshold (`updateThreshold` in the original
/// reference), tuned against BLASTN's expected-score-per-column curve.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// `bitscore >= threshold * (1.6446838 * align_len + 3)`. The linear term
/// approximates the expected bitscore of a random ungapped hit of the given
/// length, so `threshold` scales how far above chance a hit must sit.
fn passes(hsp: &Hsp, threshold: f64) -> bool {
    hsp.bit_score >= threshold * (1.6446838 * hsp.align_len as f64 + 3.0)
}

/// Keep only the HSPs that clear the bitscore cut.
pub fn bitscore_cut(hsps: Vec<Hsp>, threshold: f64) -> Vec<Hsp> {
    hsps.into_iter().filter(|h| passes(h, threshold)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hsp(bit_score: f64, align_len: u64) -> Hsp {
        Hsp {
            bit_score,
            align_len,
            ..Hsp::default()
        }
    }

    #[test]
    fn drops_hits_below_the_relative_threshold() {
        let kept = hsp(200.0, 100);
        let dropped = hsp(1.0, 100);
        let out = bitscore_cut(vec![kept.clone(), dropped], DEFAULT_THRESHOLD);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].align_len, kept.align_len);
    }

    #[test]
    fn threshold_zero_keeps_everything() {
        let out = bitscore_cut(vec![hsp(0.0, 50), hsp(-5.0, 10)], 0.0);
        assert_eq!(out.len(), 2);
    }
}
