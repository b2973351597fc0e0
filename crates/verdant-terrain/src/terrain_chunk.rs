//! Materializes ground-block columns over a horizontal span.

use std::sync::Arc;

use glam::DVec2;

use crate::block::{BLOCK_SIZE, BlockDescriptor, TERRAIN_DEPTH, align_down};
use crate::color::{BASE_GROUND_COLOR, ColorSupplier, PositionalJitter};
use crate::height_field::HeightField;

/// Converts horizontal spans into ground-block descriptors.
///
/// Stateless apart from its shared [`HeightField`]: building the same span
/// twice returns identical descriptors, and overlapping spans are allowed.
/// Deduplication across spans is the caller's concern.
pub struct TerrainChunkBuilder {
    height_field: Arc<HeightField>,
    colors: Box<dyn ColorSupplier>,
}

impl TerrainChunkBuilder {
    /// Create a builder that jitters colors deterministically from the world seed.
    pub fn new(height_field: Arc<HeightField>) -> Self {
        let colors = Box::new(PositionalJitter::new(height_field.seed()));
        Self::with_colors(height_field, colors)
    }

    /// Create a builder with a custom color supplier.
    pub fn with_colors(height_field: Arc<HeightField>, colors: Box<dyn ColorSupplier>) -> Self {
        Self {
            height_field,
            colors,
        }
    }

    /// Build every column whose block-aligned `x` lies in
    /// `[align_down(span_min), align_down(span_max)]`.
    ///
    /// Both ends are floor-aligned, so a non-aligned `span_max` drops the
    /// partial column above its aligned value. An inverted span yields nothing.
    pub fn build(&self, span_min: i64, span_max: i64) -> Vec<BlockDescriptor> {
        let aligned_min = align_down(span_min, BLOCK_SIZE);
        let aligned_max = align_down(span_max, BLOCK_SIZE);
        if aligned_max < aligned_min {
            return Vec::new();
        }

        let columns = ((aligned_max - aligned_min) / BLOCK_SIZE + 1) as usize;
        let mut blocks = Vec::with_capacity(columns * TERRAIN_DEPTH as usize);

        let mut x = aligned_min;
        while x <= aligned_max {
            self.push_column(x, &mut blocks);
            x += BLOCK_SIZE;
        }

        blocks
    }

    /// Build a single column at block-aligned `x`.
    pub fn column(&self, x: i64) -> Vec<BlockDescriptor> {
        let mut blocks = Vec::with_capacity(TERRAIN_DEPTH as usize);
        self.push_column(align_down(x, BLOCK_SIZE), &mut blocks);
        blocks
    }

    fn push_column(&self, x: i64, blocks: &mut Vec<BlockDescriptor>) {
        let surface = self.height_field.aligned_surface_at(x as f64);
        let block = BLOCK_SIZE as f64;

        for layer in 0..TERRAIN_DEPTH {
            blocks.push(BlockDescriptor {
                position: DVec2::new(x as f64, surface + f64::from(layer) * block),
                column_x: x,
                layer,
                column_depth: TERRAIN_DEPTH,
                color: self
                    .colors
                    .approximate(BASE_GROUND_COLOR, [x, i64::from(layer)]),
            });
        }
    }

    /// The height field this builder samples.
    pub fn height_field(&self) -> &Arc<HeightField> {
        &self.height_field
    }
}
