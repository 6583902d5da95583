//! Debug assertion macros for bip-buffer invariants.
//!
//! These macros provide runtime checks for the invariants documented in
//! `SPEC_FULL.md` §4.A. They are only active in debug builds
//! (`#[cfg(debug_assertions)]`), so there is zero overhead in release builds.
//!
//! Used by `BipBuffer`.

// =============================================================================
// INV-BIP-01: Conservation of Space
// =============================================================================

/// Assert that committed + free bytes account for the whole buffer.
///
/// **Invariant**: `size_a + size_b + free == capacity`
macro_rules! debug_assert_space_conserved {
    ($size_a:expr, $size_b:expr, $free:expr, $capacity:expr) => {
        debug_assert!(
            $size_a + $size_b + $free == $capacity,
            "INV-BIP-01 violated: size_a {} + size_b {} + free {} != capacity {}",
            $size_a,
            $size_b,
            $free,
            $capacity
        )
    };
}

// =============================================================================
// INV-BIP-02: Region B Precedes Region A
// =============================================================================

/// Assert that a non-empty Region B always lies strictly before Region A.
///
/// **Invariant**: `size_b > 0 ⟹ idx_b == 0 ∧ idx_b + size_b ≤ idx_a`
macro_rules! debug_assert_region_b_before_a {
    ($idx_b:expr, $size_b:expr, $idx_a:expr) => {
        debug_assert!(
            $size_b == 0 || ($idx_b == 0 && $idx_b + $size_b <= $idx_a),
            "INV-BIP-02 violated: region B ({}, {}) does not precede region A at {}",
            $idx_b,
            $size_b,
            $idx_a
        )
    };
}

// =============================================================================
// INV-BIP-03: Reservation Does Not Alias Committed Data
// =============================================================================

/// Assert that an outstanding reservation does not overlap committed bytes.
///
/// **Invariant**: the reserved range `[idx_r, idx_r + size_r)` is disjoint
/// from both committed regions.
macro_rules! debug_assert_reserve_disjoint {
    ($overlaps:expr) => {
        debug_assert!(!$overlaps, "INV-BIP-03 violated: reservation overlaps committed data")
    };
}

// =============================================================================
// INV-Q-01: Frame Boundary Alignment
// =============================================================================

/// Assert that the queue's front always begins on a frame boundary.
///
/// **Invariant**: `frame_len` read from the front never exceeds the
/// committed contiguous block backing it.
macro_rules! debug_assert_frame_fits_block {
    ($frame_len:expr, $block_len:expr) => {
        debug_assert!(
            $frame_len <= $block_len,
            "INV-Q-01 violated: frame_len {} exceeds contiguous block of {}",
            $frame_len,
            $block_len
        )
    };
}

pub(crate) use debug_assert_frame_fits_block;
pub(crate) use debug_assert_region_b_before_a;
pub(crate) use debug_assert_reserve_disjoint;
pub(crate) use debug_assert_space_conserved;
