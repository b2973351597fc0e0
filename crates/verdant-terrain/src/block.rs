//! Block grid constants and alignment helpers.

use glam::DVec2;

use crate::color::Rgb;

/// Width and height of one ground block, in world units.
///
/// Terrain columns and tree slots are both aligned to multiples of this value.
pub const BLOCK_SIZE: i64 = 30;

/// Number of blocks stacked below the surface in every terrain column.
pub const TERRAIN_DEPTH: u32 = 20;

/// One ground block produced by the terrain builder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockDescriptor {
    /// Top-left corner of the block in world units.
    pub position: DVec2,
    /// Block-aligned horizontal coordinate of the column this block belongs to.
    pub column_x: i64,
    /// Layer within the column: 0 is the surface block, increasing downward.
    pub layer: u32,
    /// Total number of blocks in the column.
    pub column_depth: u32,
    /// Cosmetic color variant of the base ground color.
    pub color: Rgb,
}

/// Floor-align `x` to a multiple of `step` (toward negative infinity).
#[inline]
pub fn align_down(x: i64, step: i64) -> i64 {
    x.div_euclid(step) * step
}

/// Ceil-align `x` to a multiple of `step` (toward positive infinity).
#[inline]
pub fn align_up(x: i64, step: i64) -> i64 {
    let down = align_down(x, step);
    if down == x { x } else { down + step }
}
