//! Headless demo that walks a viewer across a streamed world.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p verdant-demo -- --seed 7 --steps 1200` to walk further.
//!
//! The viewer walks right for the first half of the run and back left for the
//! second, so chunks are evicted and later rebuilt. Fruit within reach is eaten
//! along the way.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use verdant_config::{CliArgs, Config};
use verdant_stream::{
    ChunkEvent, ChunkStreamCache, EntityId, EntityKind, MemoryWorld, Spawn, StreamConfig,
    StreamError,
};

/// Simulated seconds per tick.
const TICK_SECONDS: f64 = 1.0 / 60.0;

/// Horizontal distance at which the viewer can reach a fruit.
const REACH: f64 = 20.0;

struct WalkStats {
    chunk_changes: u32,
    energy: u32,
    fruit_eaten: u32,
    fruit_restored: usize,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .map(|dir| dir.join("verdant"))
            .unwrap_or_else(|| PathBuf::from(".verdant"))
    });

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    verdant_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let mut cache = match ChunkStreamCache::new(StreamConfig::from_config(&config)) {
        Ok(cache) => cache,
        Err(e) => {
            error!("invalid streaming configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    cache.subscribe(Box::new(|event: &ChunkEvent| match event {
        ChunkEvent::Materialized {
            chunk,
            ground,
            flora,
        } => info!("Materialized chunk {chunk}: {ground} ground, {flora} flora"),
        ChunkEvent::Evicted {
            chunk,
            ground,
            flora,
        } => info!("Evicted chunk {chunk}: {ground} ground, {flora} flora"),
    }));

    let mut world = MemoryWorld::new();
    match walk(&mut cache, &mut world, args.steps, args.speed) {
        Ok(stats) => {
            info!(
                chunk_changes = stats.chunk_changes,
                fruit_eaten = stats.fruit_eaten,
                fruit_restored = stats.fruit_restored,
                energy = stats.energy,
                "walk finished"
            );
        }
        Err(e) => {
            error!("streaming failed: {e}");
            return ExitCode::FAILURE;
        }
    }

    info!(
        live = world.len(),
        ground = world.count_kind(EntityKind::Ground),
        trunks = world.count_kind(EntityKind::Trunk),
        leaves = world.count_kind(EntityKind::Leaf),
        fruit = world.count_kind(EntityKind::Fruit),
        added = world.total_added(),
        removed = world.total_removed(),
        "world totals"
    );

    let evicted = cache.evict_all(&mut world);
    info!("Shut down, evicted {} chunks", evicted.len());

    ExitCode::SUCCESS
}

fn walk(
    cache: &mut ChunkStreamCache,
    world: &mut MemoryWorld,
    steps: u32,
    speed: f64,
) -> Result<WalkStats, StreamError> {
    let mut stats = WalkStats {
        chunk_changes: 0,
        energy: 0,
        fruit_eaten: 0,
        fruit_restored: 0,
    };

    let mut x = 0.0;
    for step in 0..steps {
        let now = f64::from(step) * TICK_SECONDS;
        if step < steps / 2 {
            x += speed;
        } else {
            x -= speed;
        }

        let report = cache.update(x, world)?;
        if !report.is_noop() {
            stats.chunk_changes += 1;
        }

        stats.fruit_restored += world.tick_fruits(now);

        for id in fruit_in_reach(world, x) {
            if let Some(energy) = world.claim_fruit(id, now) {
                stats.energy += energy;
                stats.fruit_eaten += 1;
            }
        }
    }

    Ok(stats)
}

fn fruit_in_reach(world: &MemoryWorld, x: f64) -> Vec<EntityId> {
    world
        .available_fruit()
        .into_iter()
        .filter(|id| {
            world.get(*id).is_some_and(|e| match e.spawn {
                Spawn::Fruit(fruit) => (fruit.position.x - x).abs() <= REACH,
                _ => false,
            })
        })
        .collect()
}
