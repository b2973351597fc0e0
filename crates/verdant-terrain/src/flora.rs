//! Tree placement: one Bernoulli trial per block-aligned slot, with trunk,
//! leaf, and fruit geometry drawn from a caller-supplied random stream.

use std::sync::Arc;

use glam::DVec2;
use rand::Rng;

use crate::block::{BLOCK_SIZE, align_up};
use crate::color::{ColorSupplier, FRUIT_COLOR, LEAF_COLOR, PositionalJitter, Rgb, TRUNK_COLOR};
use crate::error::TerrainError;
use crate::height_field::HeightField;

/// Shortest trunk, in blocks.
pub const MIN_TRUNK: u32 = 2;
/// Tallest trunk, in blocks.
pub const MAX_TRUNK: u32 = 5;
/// Leaves per tree.
pub const LEAF_COUNT: usize = 50;
/// Fruit per tree.
pub const FRUIT_COUNT: usize = 3;
/// Edge length of a leaf, in world units.
pub const LEAF_SIZE: f64 = 20.0;
/// Edge length of a fruit, in world units.
pub const FRUIT_SIZE: f64 = 15.0;

const TRUNK_WIDTH_RATIO: f64 = 0.5;
const LEAF_SWAY_BASE_SECONDS: f64 = 1.0;

/// Clamp a nominal trunk height into `[MIN_TRUNK, MAX_TRUNK]`.
#[inline]
pub fn clamp_trunk_height(nominal: u32) -> u32 {
    nominal.clamp(MIN_TRUNK, MAX_TRUNK)
}

/// Flora placement rules.
#[derive(Clone, Debug, PartialEq)]
pub struct FloraParams {
    /// Probability of rooting a tree at any block-aligned slot.
    pub tree_probability: f64,
    /// Nominal trunk height before variation, in blocks.
    pub base_trunk_height: u32,
    /// Exclusive upper bound of the random height added to the base.
    pub trunk_height_variation: u32,
}

impl Default for FloraParams {
    fn default() -> Self {
        Self {
            tree_probability: 0.1,
            base_trunk_height: 3,
            trunk_height_variation: 3,
        }
    }
}

impl FloraParams {
    /// Reject probabilities outside `[0, 1]` (including NaN).
    pub fn validate(&self) -> Result<(), TerrainError> {
        if !(0.0..=1.0).contains(&self.tree_probability) {
            return Err(TerrainError::InvalidProbability(self.tree_probability));
        }
        Ok(())
    }
}

/// One block of a tree trunk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrunkSegment {
    /// Top-left corner.
    pub position: DVec2,
    /// Width and height.
    pub size: DVec2,
    /// Bark color.
    pub color: Rgb,
}

/// One leaf in a tree's crown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeafDescriptor {
    /// Top-left corner.
    pub position: DVec2,
    /// Offset from the tree root.
    pub offset: DVec2,
    /// Cosmetic color variant of the leaf color.
    pub color: Rgb,
    /// Period of the back-and-forth sway animation, in seconds.
    pub sway_period: f64,
}

/// One fruit hanging from a leaf.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FruitDescriptor {
    /// Top-left corner.
    pub position: DVec2,
    /// Index into the owning plant's leaves.
    pub leaf_index: usize,
    /// Fruit color.
    pub color: Rgb,
}

/// A complete tree rooted at one slot.
#[derive(Clone, Debug, PartialEq)]
pub struct PlantDescriptor {
    /// Top-left corner of the lowest trunk segment, one block above the surface.
    pub root: DVec2,
    /// Trunk segments from the ground up.
    pub trunk: Vec<TrunkSegment>,
    /// Crown leaves.
    pub leaves: Vec<LeafDescriptor>,
    /// Fruit, each anchored to a leaf.
    pub fruits: Vec<FruitDescriptor>,
}

impl PlantDescriptor {
    /// Trunk height in blocks.
    pub fn trunk_height(&self) -> u32 {
        self.trunk.len() as u32
    }

    /// Number of entities this plant materializes as.
    pub fn part_count(&self) -> usize {
        self.trunk.len() + self.leaves.len() + self.fruits.len()
    }
}

/// Decides where trees grow and builds their geometry.
pub struct FloraPlacer {
    height_field: Arc<HeightField>,
    params: FloraParams,
    colors: Box<dyn ColorSupplier>,
}

impl FloraPlacer {
    /// Create a placer that jitters leaf colors from the world seed.
    pub fn new(height_field: Arc<HeightField>, params: FloraParams) -> Result<Self, TerrainError> {
        let colors = Box::new(PositionalJitter::new(height_field.seed()));
        Self::with_colors(height_field, params, colors)
    }

    /// Create a placer with a custom color supplier.
    pub fn with_colors(
        height_field: Arc<HeightField>,
        params: FloraParams,
        colors: Box<dyn ColorSupplier>,
    ) -> Result<Self, TerrainError> {
        params.validate()?;
        tracing::debug!(
            tree_probability = params.tree_probability,
            "flora placer initialized"
        );
        Ok(Self {
            height_field,
            params,
            colors,
        })
    }

    /// Place trees at block-aligned slots `x` with `min_x <= x < max_x`.
    ///
    /// Every slot consumes exactly one trial from `rng`, so the result depends
    /// only on the span and the stream's starting state.
    pub fn place_in_range<R: Rng + ?Sized>(
        &self,
        min_x: i64,
        max_x: i64,
        rng: &mut R,
    ) -> Vec<PlantDescriptor> {
        let mut plants = Vec::new();

        let mut x = align_up(min_x, BLOCK_SIZE);
        while x < max_x {
            if rng.random::<f64>() < self.params.tree_probability {
                let nominal = self.nominal_trunk_height(rng);
                plants.push(self.grow(x, nominal, rng));
            }
            x += BLOCK_SIZE;
        }

        plants
    }

    fn nominal_trunk_height<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let variation = if self.params.trunk_height_variation > 0 {
            rng.random_range(0..self.params.trunk_height_variation)
        } else {
            0
        };
        self.params.base_trunk_height + variation
    }

    /// Build one tree rooted on the surface at block-aligned `x`.
    ///
    /// The trunk height is clamped to `[MIN_TRUNK, MAX_TRUNK]` regardless of `nominal`.
    pub fn grow<R: Rng + ?Sized>(&self, x: i64, nominal: u32, rng: &mut R) -> PlantDescriptor {
        let block = BLOCK_SIZE as f64;
        let trunk_height = clamp_trunk_height(nominal);
        let root = DVec2::new(x as f64, self.height_field.aligned_surface_at(x as f64) - block);

        let trunk = (0..trunk_height)
            .map(|i| TrunkSegment {
                position: root - DVec2::new(0.0, f64::from(i) * block),
                size: DVec2::new(block * TRUNK_WIDTH_RATIO, block),
                color: TRUNK_COLOR,
            })
            .collect();

        let leaves: Vec<LeafDescriptor> = (0..LEAF_COUNT)
            .map(|i| {
                let dx = -2.0 * block + rng.random::<f64>() * 4.0 * block;
                let dy = -block * f64::from(rng.random_range(0..trunk_height) + 2);
                let offset = DVec2::new(dx, dy);
                LeafDescriptor {
                    position: root + offset,
                    offset,
                    color: self.colors.approximate(LEAF_COLOR, [x, -(i as i64) - 1]),
                    sway_period: LEAF_SWAY_BASE_SECONDS + rng.random::<f64>(),
                }
            })
            .collect();

        let fruits = (0..FRUIT_COUNT)
            .map(|_| {
                let leaf_index = rng.random_range(0..LEAF_COUNT);
                FruitDescriptor {
                    position: leaves[leaf_index].position - DVec2::new(0.0, LEAF_SIZE / 2.0),
                    leaf_index,
                    color: FRUIT_COLOR,
                }
            })
            .collect();

        PlantDescriptor {
            root,
            trunk,
            leaves,
            fruits,
        }
    }

    /// The placement rules in use.
    pub fn params(&self) -> &FloraParams {
        &self.params
    }

    /// The height field trees are rooted on.
    pub fn height_field(&self) -> &Arc<HeightField> {
        &self.height_field
    }
}
