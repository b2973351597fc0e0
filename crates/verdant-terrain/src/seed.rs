//! Deterministic seeded generation utilities.
//!
//! Provides per-chunk RNG derivation from a world seed and chunk index, plus
//! content digests used to verify that regenerated chunks are identical.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::block::BlockDescriptor;
use crate::flora::PlantDescriptor;

// ---------------------------------------------------------------------------
// Seed derivation
// ---------------------------------------------------------------------------

/// Derive a u64 seed for a chunk from the world seed and chunk index.
///
/// Uses SipHash (via std's `DefaultHasher`) to combine the world seed with
/// the chunk index into a well-distributed u64.
pub fn derive_chunk_seed(world_seed: u64, chunk_index: i64) -> u64 {
    let mut hasher = DefaultHasher::new();
    world_seed.hash(&mut hasher);
    chunk_index.hash(&mut hasher);
    hasher.finish()
}

/// Derive a deterministic RNG for a specific chunk.
///
/// The returned RNG produces an identical sequence for the same
/// `(world_seed, chunk_index)` pair, no matter how many chunks were generated
/// before it or in which order.
pub fn chunk_rng(world_seed: u64, chunk_index: i64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_chunk_seed(world_seed, chunk_index))
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

fn hash_vec(v: DVec2, hasher: &mut DefaultHasher) {
    v.x.to_bits().hash(hasher);
    v.y.to_bits().hash(hasher);
}

/// Hash the positions and layout of a block list for determinism comparison.
pub fn hash_blocks(blocks: &[BlockDescriptor]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for block in blocks {
        hash_vec(block.position, &mut hasher);
        block.column_x.hash(&mut hasher);
        block.layer.hash(&mut hasher);
        block.column_depth.hash(&mut hasher);
        block.color.hash(&mut hasher);
    }
    hasher.finish()
}

/// Hash every part of a plant list for determinism comparison.
pub fn hash_plants(plants: &[PlantDescriptor]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for plant in plants {
        hash_vec(plant.root, &mut hasher);
        for segment in &plant.trunk {
            hash_vec(segment.position, &mut hasher);
        }
        for leaf in &plant.leaves {
            hash_vec(leaf.position, &mut hasher);
            leaf.color.hash(&mut hasher);
            leaf.sway_period.to_bits().hash(&mut hasher);
        }
        for fruit in &plant.fruits {
            hash_vec(fruit.position, &mut hasher);
            fruit.leaf_index.hash(&mut hasher);
        }
    }
    hasher.finish()
}
