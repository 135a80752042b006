//! Interval overlap computation
//!
//! All genomic intervals in this crate are half-open `[start, end)` on a
//! 0-based coordinate system. The overlap size between two intervals is
//! computed in closed form rather than by enumerating covered positions,
//! so a check is O(1) regardless of interval length.

/// Default minimum number of overlapping positions a read must share with an
/// annotated feature before it picks up the feature's label.
pub const MIN_OVERLAP: u64 = 50;

/// Number of positions shared by the half-open intervals `[a_start, a_end)`
/// and `[b_start, b_end)`. Disjoint intervals yield 0.
pub fn overlap_size(a_start: u64, a_end: u64, b_start: u64, b_end: u64) -> u64 {
    a_end.min(b_end).saturating_sub(a_start.max(b_start))
}

/// True when the two intervals share strictly more than `min_overlap`
/// positions.
pub fn sufficient_overlap(
    a_start: u64,
    a_end: u64,
    b_start: u64,
    b_end: u64,
    min_overlap: u64,
) -> bool {
    overlap_size(a_start, a_end, b_start, b_end) > min_overlap
}
