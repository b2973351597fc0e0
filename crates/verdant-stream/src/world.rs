//! The world-collection contract and an in-memory implementation.

use rustc_hash::FxHashMap;
use verdant_terrain::FruitState;

use crate::chunk_index::ChunkIndex;
use crate::entity::{EntityHandle, EntityId, EntityKind, Layer, Spawn};

/// Where materialized entities live.
///
/// The streaming cache is the only caller; it adds every entity of a chunk
/// when the chunk is materialized and removes them all on eviction.
pub trait WorldCollection {
    /// Realize an entity.
    fn add(&mut self, handle: EntityHandle, spawn: &Spawn, layer: Layer);

    /// Retract an entity previously added.
    fn remove(&mut self, handle: EntityHandle);
}

/// An entity stored by [`MemoryWorld`].
#[derive(Clone, Debug, PartialEq)]
pub struct WorldEntity {
    /// Handle assigned by the cache.
    pub handle: EntityHandle,
    /// Geometry.
    pub spawn: Spawn,
    /// Layer hint.
    pub layer: Layer,
    /// Consumption state, present for fruit only.
    pub fruit: Option<FruitState>,
}

/// Hash-map backed world, keyed by [`EntityId`].
#[derive(Debug, Default)]
pub struct MemoryWorld {
    entities: FxHashMap<EntityId, WorldEntity>,
    added: u64,
    removed: u64,
}

impl MemoryWorld {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entities are live.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Look up a live entity.
    pub fn get(&self, id: EntityId) -> Option<&WorldEntity> {
        self.entities.get(&id)
    }

    /// Iterates over all live entities in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &WorldEntity> {
        self.entities.values()
    }

    /// Number of live entities of `kind`.
    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.entities
            .values()
            .filter(|e| e.handle.kind == kind)
            .count()
    }

    /// Number of live entities owned by `chunk`.
    pub fn count_in_chunk(&self, chunk: ChunkIndex) -> usize {
        self.entities
            .values()
            .filter(|e| e.handle.chunk == chunk)
            .count()
    }

    /// Total `add` calls since creation.
    pub fn total_added(&self) -> u64 {
        self.added
    }

    /// Total `remove` calls that found an entity.
    pub fn total_removed(&self) -> u64 {
        self.removed
    }

    /// Eat the fruit `id` at time `now`.
    ///
    /// Returns the energy gained, or `None` if `id` is not a live, available fruit.
    pub fn claim_fruit(&mut self, id: EntityId, now: f64) -> Option<u32> {
        self.entities
            .get_mut(&id)
            .and_then(|e| e.fruit.as_mut())
            .and_then(|fruit| fruit.claim(now))
    }

    /// Advance every fruit's reappear timer. Returns how many became available.
    pub fn tick_fruits(&mut self, now: f64) -> usize {
        self.entities
            .values_mut()
            .filter_map(|e| e.fruit.as_mut())
            .map(|fruit| fruit.tick(now))
            .filter(|restored| *restored)
            .count()
    }

    /// Ids of live fruit that can currently be eaten.
    pub fn available_fruit(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.fruit.is_some_and(|f| !f.is_claimed()))
            .map(|e| e.handle.id)
            .collect();
        ids.sort();
        ids
    }
}

impl WorldCollection for MemoryWorld {
    fn add(&mut self, handle: EntityHandle, spawn: &Spawn, layer: Layer) {
        let fruit = (handle.kind == EntityKind::Fruit).then(FruitState::new);
        let previous = self.entities.insert(
            handle.id,
            WorldEntity {
                handle,
                spawn: *spawn,
                layer,
                fruit,
            },
        );
        if previous.is_some() {
            tracing::warn!(id = handle.id.0, "entity added twice; replaced");
        }
        self.added += 1;
    }

    fn remove(&mut self, handle: EntityHandle) {
        if self.entities.remove(&handle.id).is_some() {
            self.removed += 1;
        } else {
            tracing::warn!(id = handle.id.0, "removing unknown entity");
        }
    }
}
