//! Procedural 2D terrain: coherent-noise height field, ground-block columns,
//! and probabilistic tree placement, all derived from a single world seed.
//!
//! Coordinates are screen-style: `x` grows to the right and `y` grows
//! downward, so terrain columns stack toward larger `y` and trees grow
//! toward smaller `y`.

mod block;
mod color;
mod error;
mod flora;
mod fruit;
mod height_field;
mod seed;
mod terrain_chunk;

pub use block::{BLOCK_SIZE, BlockDescriptor, TERRAIN_DEPTH, align_down, align_up};
pub use color::{
    BASE_GROUND_COLOR, BaseColor, COLOR_DELTA, ColorSupplier, FRUIT_COLOR, LEAF_COLOR,
    PositionalJitter, Rgb, TRUNK_COLOR,
};
pub use error::TerrainError;
pub use flora::{
    FRUIT_COUNT, FRUIT_SIZE, FloraParams, FloraPlacer, FruitDescriptor, LEAF_COUNT, LEAF_SIZE,
    LeafDescriptor, MAX_TRUNK, MIN_TRUNK, PlantDescriptor, TrunkSegment, clamp_trunk_height,
};
pub use fruit::{ENERGY_GAIN, FruitState, REAPPEAR_SECONDS};
pub use height_field::{HeightField, HeightFieldParams};
pub use seed::{chunk_rng, derive_chunk_seed, hash_blocks, hash_plants};
pub use terrain_chunk::TerrainChunkBuilder;
