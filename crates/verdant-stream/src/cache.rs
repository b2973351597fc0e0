//! The chunk streaming cache.
//!
//! Tracks which chunks around the viewer are materialized, generates terrain
//! and flora for chunks entering the visibility window, and retracts every
//! entity of chunks leaving it.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, trace};
use verdant_terrain::{
    BlockDescriptor, FloraPlacer, HeightField, PlantDescriptor, TerrainChunkBuilder, chunk_rng,
};

use crate::chunk_index::{ChunkIndex, ChunkWindow};
use crate::config::StreamConfig;
use crate::entity::{EntityHandle, EntityId, EntityKind, Spawn};
use crate::error::StreamError;
use crate::events::{ChunkEvent, ChunkObserver, SubscriberId, Subscribers};
use crate::world::WorldCollection;

/// Entities owned by one materialized chunk, in creation order.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterializedChunk {
    /// The chunk.
    pub index: ChunkIndex,
    /// Every entity added to the world for this chunk.
    pub entities: Vec<EntityHandle>,
}

impl MaterializedChunk {
    /// Number of owned entities of `kind`.
    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|h| h.kind == kind).count()
    }

    fn flora_count(&self) -> usize {
        self.entities.iter().filter(|h| h.kind.is_flora()).count()
    }
}

/// Bookkeeping of the streaming window.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StreamState {
    /// Chunk the viewer was in at the last update, if any.
    pub last_chunk: Option<ChunkIndex>,
    /// Materialized chunks, ordered by index.
    pub chunks: BTreeMap<ChunkIndex, MaterializedChunk>,
}

/// What a single [`ChunkStreamCache::update`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateReport {
    /// Chunk containing the viewer.
    pub chunk: ChunkIndex,
    /// Chunks materialized during this update, ascending.
    pub materialized: Vec<ChunkIndex>,
    /// Chunks evicted during this update, ascending.
    pub evicted: Vec<ChunkIndex>,
}

impl UpdateReport {
    /// Returns `true` if the update changed nothing.
    pub fn is_noop(&self) -> bool {
        self.materialized.is_empty() && self.evicted.is_empty()
    }
}

/// Keeps the chunks within the visibility radius of the viewer materialized.
///
/// After every successful [`update`](Self::update), the materialized set is
/// exactly the window `[c - r, c + r]` around the viewer's chunk `c`. Content
/// depends only on the world seed and chunk index, so a chunk that is evicted
/// and later revisited is rebuilt identically.
pub struct ChunkStreamCache {
    config: StreamConfig,
    terrain: TerrainChunkBuilder,
    flora: FloraPlacer,
    state: StreamState,
    next_entity_id: u64,
    subscribers: Subscribers,
}

impl ChunkStreamCache {
    /// Create a cache with no materialized chunks.
    pub fn new(config: StreamConfig) -> Result<Self, StreamError> {
        config.validate()?;
        let height_field = Arc::new(HeightField::new(config.height.clone())?);
        let terrain = TerrainChunkBuilder::new(Arc::clone(&height_field));
        let flora = FloraPlacer::new(height_field, config.flora.clone())?;

        info!(
            seed = config.seed(),
            chunk_width = config.chunk_width,
            visibility_radius = config.visibility_radius,
            "chunk stream cache initialized"
        );

        Ok(Self {
            config,
            terrain,
            flora,
            state: StreamState::default(),
            next_entity_id: 0,
            subscribers: Subscribers::new(),
        })
    }

    /// Bring the materialized set in line with the viewer at `viewer_x`.
    ///
    /// Missing chunks in the window are materialized left to right, then
    /// chunks outside it are evicted left to right. Staying in the same chunk
    /// as the previous update does nothing. A non-finite position, or one whose
    /// window would leave the representable world, is rejected before any
    /// state changes.
    pub fn update<W: WorldCollection + ?Sized>(
        &mut self,
        viewer_x: f64,
        world: &mut W,
    ) -> Result<UpdateReport, StreamError> {
        if !viewer_x.is_finite() {
            return Err(StreamError::NonFiniteViewer(viewer_x));
        }

        let width = self.config.chunk_width;
        let chunk = ChunkIndex::containing(viewer_x, width)
            .ok_or(StreamError::ViewerOutOfRange(viewer_x))?;
        if self.state.last_chunk == Some(chunk) {
            trace!(chunk = chunk.0, "viewer still in same chunk");
            return Ok(UpdateReport {
                chunk,
                materialized: Vec::new(),
                evicted: Vec::new(),
            });
        }

        let window = chunk
            .window(self.config.visibility_radius)
            .filter(|window| window.world_span(width).is_some())
            .ok_or(StreamError::ViewerOutOfRange(viewer_x))?;

        let missing: Vec<ChunkIndex> = window
            .iter()
            .filter(|index| !self.state.chunks.contains_key(index))
            .collect();
        for &index in &missing {
            self.materialize(index, world)?;
        }

        let stale: Vec<ChunkIndex> = self
            .state
            .chunks
            .keys()
            .copied()
            .filter(|index| !window.contains(*index))
            .collect();
        for &index in &stale {
            self.evict(index, world);
        }

        debug!(
            from = ?self.state.last_chunk.map(|c| c.0),
            to = chunk.0,
            materialized = missing.len(),
            evicted = stale.len(),
            "viewer changed chunk"
        );
        self.state.last_chunk = Some(chunk);

        Ok(UpdateReport {
            chunk,
            materialized: missing,
            evicted: stale,
        })
    }

    /// Evict every materialized chunk, left to right, and forget the viewer.
    pub fn evict_all<W: WorldCollection + ?Sized>(&mut self, world: &mut W) -> Vec<ChunkIndex> {
        let all: Vec<ChunkIndex> = self.state.chunks.keys().copied().collect();
        for &index in &all {
            self.evict(index, world);
        }
        self.state.last_chunk = None;
        all
    }

    /// Generate the content of `index` without touching the cache or a world.
    ///
    /// Returns the ground blocks and trees the chunk materializes as.
    pub fn generate(
        &self,
        index: ChunkIndex,
    ) -> Result<(Vec<BlockDescriptor>, Vec<PlantDescriptor>), StreamError> {
        let width = self.config.chunk_width;
        let out_of_range = || StreamError::ChunkOutOfRange(index.0);
        let (start, end) = index
            .window(0)
            .and_then(|window| window.world_span(width))
            .ok_or_else(out_of_range)?;
        let (span_min, span_max) = index.column_span(width).ok_or_else(out_of_range)?;

        let blocks = self.terrain.build(span_min, span_max);
        let mut rng = chunk_rng(self.config.seed(), index.0);
        let plants = self.flora.place_in_range(start, end, &mut rng);

        Ok((blocks, plants))
    }

    fn materialize<W: WorldCollection + ?Sized>(
        &mut self,
        index: ChunkIndex,
        world: &mut W,
    ) -> Result<(), StreamError> {
        let (blocks, plants) = self.generate(index)?;

        let mut spawns: Vec<Spawn> = blocks.into_iter().map(Spawn::Block).collect();
        let ground = spawns.len();
        for plant in plants {
            spawns.extend(plant.trunk.into_iter().map(Spawn::Trunk));
            spawns.extend(plant.leaves.into_iter().map(Spawn::Leaf));
            spawns.extend(plant.fruits.into_iter().map(Spawn::Fruit));
        }
        let flora = spawns.len() - ground;

        let mut entities = Vec::with_capacity(spawns.len());
        for spawn in &spawns {
            let handle = EntityHandle {
                id: self.allocate_id(),
                kind: spawn.kind(),
                chunk: index,
            };
            world.add(handle, spawn, handle.kind.layer());
            entities.push(handle);
        }

        self.state
            .chunks
            .insert(index, MaterializedChunk { index, entities });

        debug!(chunk = index.0, ground, flora, "chunk materialized");
        self.subscribers.notify(&ChunkEvent::Materialized {
            chunk: index,
            ground,
            flora,
        });
        Ok(())
    }

    fn evict<W: WorldCollection + ?Sized>(&mut self, index: ChunkIndex, world: &mut W) {
        let Some(chunk) = self.state.chunks.remove(&index) else {
            return;
        };

        for &handle in &chunk.entities {
            world.remove(handle);
        }

        let flora = chunk.flora_count();
        let ground = chunk.entities.len() - flora;
        debug!(chunk = index.0, ground, flora, "chunk evicted");
        self.subscribers.notify(&ChunkEvent::Evicted {
            chunk: index,
            ground,
            flora,
        });
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Register an observer of chunk transitions.
    pub fn subscribe(&mut self, observer: Box<dyn ChunkObserver>) -> SubscriberId {
        self.subscribers.subscribe(observer)
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Is `index` currently materialized?
    pub fn is_materialized(&self, index: ChunkIndex) -> bool {
        self.state.chunks.contains_key(&index)
    }

    /// Materialized chunk indices, ascending.
    pub fn materialized_chunks(&self) -> Vec<ChunkIndex> {
        self.state.chunks.keys().copied().collect()
    }

    /// Entities owned by `index`, if it is materialized.
    pub fn entities_of(&self, index: ChunkIndex) -> Option<&[EntityHandle]> {
        self.state.chunks.get(&index).map(|c| c.entities.as_slice())
    }

    /// Total entities owned by all materialized chunks.
    pub fn entity_count(&self) -> usize {
        self.state.chunks.values().map(|c| c.entities.len()).sum()
    }

    /// The window around the viewer's last chunk, if any update has run.
    pub fn window(&self) -> Option<ChunkWindow> {
        self.state
            .last_chunk
            .and_then(|c| c.window(self.config.visibility_radius))
    }

    /// Current bookkeeping.
    pub fn state(&self) -> &StreamState {
        &self.state
    }

    /// Configuration the cache was built with.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// The shared height field.
    pub fn height_field(&self) -> &Arc<HeightField> {
        self.terrain.height_field()
    }
}

impl std::fmt::Debug for ChunkStreamCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkStreamCache")
            .field("config", &self.config)
            .field("last_chunk", &self.state.last_chunk)
            .field("chunks", &self.state.chunks.len())
            .field("subscribers", &self.subscribers)
            .finish()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
