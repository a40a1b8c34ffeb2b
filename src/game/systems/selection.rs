//! Selection evaluation system.
//!
//! This module applies the core rule: a rectangle clears when its cells sum to
//! the target.

use crate::config::game::TARGET_SUM;
use crate::game::grid::Grid;
use crate::game::rejection::Rejection;
use crate::game::types::{Area, Selection};

/// Evaluate `selection` against `grid`, clearing it on a hit.
///
/// Returns the normalized area and the number of cells that changed. A miss,
/// an out-of-bounds rectangle, or an area with nothing left to clear leaves the
/// grid untouched.
pub fn evaluate_selection(grid: &mut Grid, selection: &Selection) -> Result<(Area, u32), Rejection> {
    let area = selection
        .normalize(grid.rows(), grid.cols())
        .ok_or(Rejection::OutOfBounds)?;

    let sum = grid.range_sum(&area);
    if sum != TARGET_SUM {
        return Err(Rejection::SumMismatch(sum));
    }

    // Only cells that were still set count towards the score. A hit on a
    // positive target always has a set cell, so `NothingCleared` only guards a
    // zero target.
    match grid.clear_range(&area) {
        0 => Err(Rejection::NothingCleared),
        cleared => Ok((area, cleared)),
    }
}
