//! Tests for the chunk streaming cache.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use verdant_terrain::{
    BLOCK_SIZE, ENERGY_GAIN, FRUIT_COUNT, LEAF_COUNT, TERRAIN_DEPTH, hash_blocks,
};

use super::*;
use crate::entity::Layer;
use crate::world::MemoryWorld;

fn config() -> StreamConfig {
    let mut config = StreamConfig::default();
    config.height.seed = 123_458;
    config
}

fn cache_with(config: StreamConfig) -> ChunkStreamCache {
    ChunkStreamCache::new(config).unwrap()
}

fn chunks(indices: &[i64]) -> Vec<ChunkIndex> {
    indices.iter().copied().map(ChunkIndex).collect()
}

fn spawns_of(cache: &ChunkStreamCache, world: &MemoryWorld, index: ChunkIndex) -> Vec<Spawn> {
    cache
        .entities_of(index)
        .unwrap()
        .iter()
        .map(|h| world.get(h.id).unwrap().spawn)
        .collect()
}

fn recorder(cache: &mut ChunkStreamCache) -> Rc<RefCell<Vec<ChunkEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    cache.subscribe(Box::new(move |e: &ChunkEvent| sink.borrow_mut().push(*e)));
    log
}

#[test]
fn test_first_update_materializes_window() {
    let mut cache = cache_with(config());
    let mut world = MemoryWorld::new();

    let report = cache.update(100.0, &mut world).unwrap();

    assert_eq!(report.chunk, ChunkIndex(0));
    assert_eq!(report.materialized, chunks(&[-1, 0, 1]));
    assert!(report.evicted.is_empty());
    assert_eq!(cache.materialized_chunks(), chunks(&[-1, 0, 1]));
    assert_eq!(cache.state().last_chunk, Some(ChunkIndex(0)));
    assert_eq!(world.len(), cache.entity_count());
}

#[test]
fn test_crossing_right_shifts_window() {
    let mut cache = cache_with(config());
    let mut world = MemoryWorld::new();
    cache.update(100.0, &mut world).unwrap();

    let kept_zero = cache.entities_of(ChunkIndex(0)).unwrap().to_vec();
    let kept_one = cache.entities_of(ChunkIndex(1)).unwrap().to_vec();

    let report = cache.update(850.0, &mut world).unwrap();

    assert_eq!(report.chunk, ChunkIndex(1));
    assert_eq!(report.materialized, chunks(&[2]));
    assert_eq!(report.evicted, chunks(&[-1]));
    assert_eq!(cache.materialized_chunks(), chunks(&[0, 1, 2]));
    assert_eq!(world.count_in_chunk(ChunkIndex(-1)), 0);

    // Chunks that stay in the window are not touched.
    assert_eq!(cache.entities_of(ChunkIndex(0)).unwrap(), kept_zero.as_slice());
    assert_eq!(cache.entities_of(ChunkIndex(1)).unwrap(), kept_one.as_slice());
    for handle in kept_zero.iter().chain(&kept_one) {
        assert!(world.get(handle.id).is_some());
    }
}

#[test]
fn test_same_chunk_is_noop() {
    let mut cache = cache_with(config());
    let mut world = MemoryWorld::new();
    cache.update(100.0, &mut world).unwrap();
    let added = world.total_added();

    let report = cache.update(700.0, &mut world).unwrap();

    assert!(report.is_noop());
    assert_eq!(report.chunk, ChunkIndex(0));
    assert_eq!(world.total_added(), added);
    assert_eq!(world.total_removed(), 0);
}

#[test]
fn test_large_jump_replaces_whole_window() {
    let mut cache = cache_with(config());
    let mut world = MemoryWorld::new();
    cache.update(100.0, &mut world).unwrap();

    let report = cache.update(-4_000.5, &mut world).unwrap();

    assert_eq!(report.chunk, ChunkIndex(-6));
    assert_eq!(report.materialized, chunks(&[-7, -6, -5]));
    assert_eq!(report.evicted, chunks(&[-1, 0, 1]));
    assert_eq!(cache.materialized_chunks(), chunks(&[-7, -6, -5]));
    assert_eq!(world.len(), cache.entity_count());
}

#[test]
fn test_random_walk_keeps_exact_window() {
    let mut config = config();
    config.visibility_radius = 2;
    let mut cache = cache_with(config);
    let mut world = MemoryWorld::new();
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let mut x = 0.0;
    for _ in 0..150 {
        x += rng.random_range(-1_500.0..1_500.0);
        let report = cache.update(x, &mut world).unwrap();

        let window = report.chunk.window(2).unwrap();
        assert_eq!(cache.materialized_chunks(), window.iter().collect::<Vec<_>>());
        assert_eq!(cache.window(), Some(window));
        assert_eq!(world.len(), cache.entity_count());
        assert!(world.iter().all(|e| window.contains(e.handle.chunk)));
    }
}

#[test]
fn test_revisited_chunk_is_identical() {
    let mut cache = cache_with(config());
    let mut world = MemoryWorld::new();

    cache.update(100.0, &mut world).unwrap();
    let first = spawns_of(&cache, &world, ChunkIndex(0));
    let first_ids = cache.entities_of(ChunkIndex(0)).unwrap().to_vec();

    cache.update(5_000.0, &mut world).unwrap();
    assert!(!cache.is_materialized(ChunkIndex(0)));

    cache.update(100.0, &mut world).unwrap();
    let second = spawns_of(&cache, &world, ChunkIndex(0));
    let second_ids = cache.entities_of(ChunkIndex(0)).unwrap();

    assert_eq!(first, second);
    // Ids are never reused.
    assert!(first_ids.iter().all(|h| !second_ids.contains(h)));
}

#[test]
fn test_generation_independent_of_history() {
    let a = cache_with(config());
    let mut b = cache_with(config());
    let mut world = MemoryWorld::new();
    for x in [3_000.0, -2_000.0, 12_345.0, 400.0] {
        b.update(x, &mut world).unwrap();
    }

    for c in [-3, 0, 4, 15] {
        assert_eq!(
            a.generate(ChunkIndex(c)).unwrap(),
            b.generate(ChunkIndex(c)).unwrap()
        );
    }
}

#[test]
fn test_different_seeds_differ() {
    let a = cache_with(config());
    let mut other = config();
    other.height.seed = 42;
    let b = cache_with(other);

    let (blocks_a, _) = a.generate(ChunkIndex(0)).unwrap();
    let (blocks_b, _) = b.generate(ChunkIndex(0)).unwrap();
    assert_ne!(hash_blocks(&blocks_a), hash_blocks(&blocks_b));
}

#[test]
fn test_non_finite_viewer_rejected_without_side_effects() {
    let mut cache = cache_with(config());
    let mut world = MemoryWorld::new();

    assert_eq!(
        cache.update(f64::NAN, &mut world).unwrap_err().to_string(),
        "viewer position must be finite, got NaN"
    );
    assert!(cache.materialized_chunks().is_empty());
    assert_eq!(cache.state().last_chunk, None);

    cache.update(100.0, &mut world).unwrap();
    let before = cache.state().clone();
    assert_eq!(
        cache.update(f64::INFINITY, &mut world),
        Err(StreamError::NonFiniteViewer(f64::INFINITY))
    );
    assert_eq!(cache.state(), &before);
    assert_eq!(world.total_removed(), 0);
}

#[test]
fn test_viewer_beyond_world_limits_rejected_without_side_effects() {
    let mut cache = cache_with(config());
    let mut world = MemoryWorld::new();
    cache.update(100.0, &mut world).unwrap();
    let before = cache.state().clone();

    // Finite, but chunk * width overflows i64.
    for x in [1.0e19, -1.0e19, 1.0e300, f64::MAX] {
        assert_eq!(
            cache.update(x, &mut world),
            Err(StreamError::ViewerOutOfRange(x))
        );
        assert_eq!(cache.state(), &before);
    }
    assert_eq!(world.total_removed(), 0);

    // The cache keeps streaming normally afterwards.
    let report = cache.update(850.0, &mut world).unwrap();
    assert_eq!(report.materialized, chunks(&[2]));
}

#[test]
fn test_largest_representable_window_streams() {
    let mut cache = cache_with(config());
    let mut world = MemoryWorld::new();
    // Chunk i64::MAX / 800 - 2 is the last whose radius-1 window fits; stay a
    // little below it since f64 cannot resolve single chunks up here.
    let last = i64::MAX / 800 - 2;
    let x = (last as f64) * 800.0 - 1.0e6;
    let report = cache.update(x, &mut world).unwrap();
    assert!(report.chunk.0 < last);
    assert_eq!(report.materialized.len(), 3);
    assert_eq!(world.len(), cache.entity_count());
}

#[test]
fn test_generate_out_of_range_chunk() {
    let cache = cache_with(config());
    assert_eq!(
        cache.generate(ChunkIndex(i64::MAX)).unwrap_err(),
        StreamError::ChunkOutOfRange(i64::MAX)
    );
}

#[test]
fn test_invalid_config_rejected() {
    let mut bad_width = config();
    bad_width.chunk_width = -5;
    assert_eq!(
        ChunkStreamCache::new(bad_width).unwrap_err(),
        StreamError::InvalidChunkWidth(-5)
    );

    let mut bad_radius = config();
    bad_radius.visibility_radius = 0;
    assert_eq!(
        ChunkStreamCache::new(bad_radius).unwrap_err(),
        StreamError::InvalidVisibilityRadius
    );

    let mut bad_octaves = config();
    bad_octaves.height.octaves = 0;
    assert!(matches!(
        ChunkStreamCache::new(bad_octaves),
        Err(StreamError::Terrain(_))
    ));
}

#[test]
fn test_observers_see_transitions_in_order() {
    let mut cache = cache_with(config());
    let mut world = MemoryWorld::new();
    let log = recorder(&mut cache);

    cache.update(100.0, &mut world).unwrap();
    cache.update(850.0, &mut world).unwrap();

    let seen: Vec<(bool, ChunkIndex)> = log
        .borrow()
        .iter()
        .map(|e| (matches!(e, ChunkEvent::Materialized { .. }), e.chunk()))
        .collect();
    assert_eq!(
        seen,
        vec![
            (true, ChunkIndex(-1)),
            (true, ChunkIndex(0)),
            (true, ChunkIndex(1)),
            (true, ChunkIndex(2)),
            (false, ChunkIndex(-1)),
        ]
    );

    // Event counts match what the world received.
    let events = log.borrow();
    let added: usize = events
        .iter()
        .filter(|e| matches!(e, ChunkEvent::Materialized { .. }))
        .map(ChunkEvent::entity_count)
        .sum();
    assert_eq!(added as u64, world.total_added());
}

#[test]
fn test_unsubscribed_observer_is_silent() {
    let mut cache = cache_with(config());
    let mut world = MemoryWorld::new();
    let log = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&log);
    let id = cache.subscribe(Box::new(move |_: &ChunkEvent| *sink.borrow_mut() += 1));

    cache.update(100.0, &mut world).unwrap();
    assert!(cache.unsubscribe(id));
    cache.update(850.0, &mut world).unwrap();

    assert_eq!(*log.borrow(), 3);
}

#[test]
fn test_block_columns_tile_without_duplicates() {
    let mut cache = cache_with(config());
    let mut world = MemoryWorld::new();
    cache.update(100.0, &mut world).unwrap();

    let mut columns: Vec<i64> = world
        .iter()
        .filter_map(|e| match e.spawn {
            Spawn::Block(b) if b.layer == 0 => Some(b.column_x),
            _ => None,
        })
        .collect();
    columns.sort();

    let unique: HashSet<i64> = columns.iter().copied().collect();
    assert_eq!(unique.len(), columns.len());
    assert_eq!(columns.first(), Some(&-780));
    assert_eq!(columns.last(), Some(&1_590));
    assert!(columns.windows(2).all(|w| w[1] - w[0] == BLOCK_SIZE));
    assert_eq!(world.count_kind(EntityKind::Ground), columns.len() * TERRAIN_DEPTH as usize);

    // 800 is not a multiple of the block size, so chunks own 26 or 27 columns.
    let ground = |c| {
        cache
            .state()
            .chunks
            .get(&ChunkIndex(c))
            .unwrap()
            .count_of(EntityKind::Ground)
    };
    assert_eq!(ground(-1), 26 * TERRAIN_DEPTH as usize);
    assert_eq!(ground(0), 27 * TERRAIN_DEPTH as usize);
    assert_eq!(ground(1), 27 * TERRAIN_DEPTH as usize);
}

#[test]
fn test_full_density_grows_tree_at_every_slot() {
    let mut config = config();
    config.flora.tree_probability = 1.0;
    let mut cache = cache_with(config);
    let mut world = MemoryWorld::new();
    cache.update(100.0, &mut world).unwrap();

    let chunk = cache.state().chunks.get(&ChunkIndex(0)).unwrap();
    assert_eq!(chunk.count_of(EntityKind::Leaf), 27 * LEAF_COUNT);
    assert_eq!(chunk.count_of(EntityKind::Fruit), 27 * FRUIT_COUNT);
    let trunks = chunk.count_of(EntityKind::Trunk);
    assert!((27 * 2..=27 * 5).contains(&trunks), "trunks = {trunks}");

    for entity in world.iter() {
        assert_eq!(entity.layer, entity.handle.kind.layer());
        assert_eq!(entity.fruit.is_some(), entity.handle.kind == EntityKind::Fruit);
    }
    assert_eq!(
        world.get(chunk.entities[0].id).map(|e| e.layer),
        Some(Layer::Ground)
    );
}

#[test]
fn test_zero_density_has_only_ground() {
    let mut config = config();
    config.flora.tree_probability = 0.0;
    let mut cache = cache_with(config);
    let mut world = MemoryWorld::new();
    cache.update(100.0, &mut world).unwrap();

    assert_eq!(world.len(), world.count_kind(EntityKind::Ground));
}

#[test]
fn test_claimed_fruit_resets_after_revisit() {
    let mut config = config();
    config.flora.tree_probability = 1.0;
    let mut cache = cache_with(config);
    let mut world = MemoryWorld::new();
    cache.update(100.0, &mut world).unwrap();

    let fruit = world.available_fruit();
    let target = fruit[0];
    assert_eq!(world.claim_fruit(target, 0.0), Some(ENERGY_GAIN));
    assert_eq!(world.available_fruit().len(), fruit.len() - 1);

    cache.update(10_000.0, &mut world).unwrap();
    cache.update(100.0, &mut world).unwrap();

    assert!(world.get(target).is_none());
    assert_eq!(world.available_fruit().len(), fruit.len());
}

#[test]
fn test_evict_all_empties_world() {
    let mut cache = cache_with(config());
    let mut world = MemoryWorld::new();
    cache.update(100.0, &mut world).unwrap();

    let evicted = cache.evict_all(&mut world);

    assert_eq!(evicted, chunks(&[-1, 0, 1]));
    assert!(world.is_empty());
    assert_eq!(world.total_added(), world.total_removed());
    assert_eq!(cache.state().last_chunk, None);

    // The next update rebuilds the window even in the same chunk.
    let report = cache.update(100.0, &mut world).unwrap();
    assert_eq!(report.materialized, chunks(&[-1, 0, 1]));
}
