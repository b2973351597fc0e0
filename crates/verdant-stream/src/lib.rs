//! Chunk streaming for an endless horizontal world.
//!
//! [`ChunkStreamCache`] keeps the chunks around the viewer materialized in a
//! [`WorldCollection`], generating terrain and trees the first time a chunk
//! becomes visible and retracting them when it leaves the window. Revisiting
//! a chunk regenerates exactly the same content.

mod cache;
mod chunk_index;
mod config;
mod entity;
mod error;
mod events;
mod world;

pub use cache::{ChunkStreamCache, MaterializedChunk, StreamState, UpdateReport};
pub use chunk_index::{ChunkIndex, ChunkWindow};
pub use config::StreamConfig;
pub use entity::{EntityHandle, EntityId, EntityKind, Layer, Spawn};
pub use error::StreamError;
pub use events::{ChunkEvent, ChunkObserver, SubscriberId, Subscribers};
pub use world::{MemoryWorld, WorldCollection, WorldEntity};
