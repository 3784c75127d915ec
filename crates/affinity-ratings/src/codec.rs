// crates/affinity-ratings/src/codec.rs
//
// Fixed-point byte encoding for rating ledgers.
//
// Binary format: one unsigned byte per partner slot, from id 0 up to the
// highest occupied id. Each byte is round(16 * rating) truncated to 8 bits,
// so ratings are stored at 1/16 precision. Gaps below the highest id encode
// as 0x00 and decode as a present 0.0 rating; absence does not survive a
// round trip. Ratings outside [0, 16) wrap rather than fail.

use affinity_core::{Rating, RatingCell, SparseSequence};

/// Steps per rating unit.
const STEPS: Rating = 16.0;

/// Smallest representable difference between two encoded ratings.
pub const QUANTUM: Rating = 1.0 / STEPS;

/// Quantize a rating to one byte.
pub fn encode_rating(rating: Rating) -> u8 {
    (rating * STEPS).round() as i32 as u8
}

pub fn decode_rating(byte: u8) -> Rating {
    byte as Rating / STEPS
}

/// Encode every slot up to the logical length of `cells`.
pub fn encode_ledger(cells: &SparseSequence<RatingCell>) -> Vec<u8> {
    (0..cells.len())
        .map(|i| cells.get(i).map_or(0, |cell| encode_rating(cell.get())))
        .collect()
}

/// Replace the contents of `cells` with the ratings encoded in `bytes`.
pub fn decode_ledger(bytes: &[u8], cells: &mut SparseSequence<RatingCell>) {
    cells.clear();
    cells.ensure_capacity(bytes.len());
    cells.extend(bytes.iter().map(|&b| RatingCell::new(decode_rating(b))));
}
