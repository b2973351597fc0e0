//! Entity handles exchanged with the world collection.

use glam::DVec2;
use verdant_terrain::{BlockDescriptor, FruitDescriptor, LeafDescriptor, TrunkSegment};

use crate::chunk_index::ChunkIndex;

/// Opaque identifier of one materialized entity. Never reused within a cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// What a materialized entity is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A terrain block.
    Ground,
    /// One segment of a tree trunk.
    Trunk,
    /// A leaf in a tree crown.
    Leaf,
    /// A consumable fruit.
    Fruit,
}

impl EntityKind {
    /// Does this entity belong to a tree?
    pub fn is_flora(self) -> bool {
        !matches!(self, EntityKind::Ground)
    }

    /// Draw/collision layer for this kind.
    pub fn layer(self) -> Layer {
        match self {
            EntityKind::Ground => Layer::Ground,
            EntityKind::Trunk => Layer::Trunk,
            EntityKind::Leaf => Layer::Leaf,
            EntityKind::Fruit => Layer::Fruit,
        }
    }
}

/// Layer hint passed to the world collection.
///
/// Trunks sit just behind the ground layer, leaves and fruit in front of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Tree trunks.
    Trunk,
    /// Static terrain.
    Ground,
    /// Tree leaves.
    Leaf,
    /// Fruit.
    Fruit,
}

impl Layer {
    /// Offset from the static-objects layer.
    pub fn offset(self) -> i32 {
        match self {
            Layer::Trunk => -1,
            Layer::Ground => 0,
            Layer::Leaf => 1,
            Layer::Fruit => 2,
        }
    }
}

/// Handle to an entity owned by a materialized chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    /// Unique id.
    pub id: EntityId,
    /// Entity classification.
    pub kind: EntityKind,
    /// Chunk that owns the entity.
    pub chunk: ChunkIndex,
}

/// Geometry of an entity being added to the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Spawn {
    /// A terrain block.
    Block(BlockDescriptor),
    /// A trunk segment.
    Trunk(TrunkSegment),
    /// A leaf.
    Leaf(LeafDescriptor),
    /// A fruit.
    Fruit(FruitDescriptor),
}

impl Spawn {
    /// The classification matching this geometry.
    pub fn kind(&self) -> EntityKind {
        match self {
            Spawn::Block(_) => EntityKind::Ground,
            Spawn::Trunk(_) => EntityKind::Trunk,
            Spawn::Leaf(_) => EntityKind::Leaf,
            Spawn::Fruit(_) => EntityKind::Fruit,
        }
    }

    /// Top-left corner in world units.
    pub fn position(&self) -> DVec2 {
        match self {
            Spawn::Block(b) => b.position,
            Spawn::Trunk(t) => t.position,
            Spawn::Leaf(l) => l.position,
            Spawn::Fruit(f) => f.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_order_matches_offsets() {
        let mut layers = [Layer::Fruit, Layer::Ground, Layer::Leaf, Layer::Trunk];
        layers.sort();
        let offsets: Vec<i32> = layers.iter().map(|l| l.offset()).collect();
        assert_eq!(offsets, vec![-1, 0, 1, 2]);
    }

    #[test]
    fn test_kind_classification() {
        assert!(!EntityKind::Ground.is_flora());
        assert!(EntityKind::Trunk.is_flora());
        assert!(EntityKind::Leaf.is_flora());
        assert!(EntityKind::Fruit.is_flora());
        assert_eq!(EntityKind::Fruit.layer(), Layer::Fruit);
    }
}
