//! Streaming error types.

use verdant_terrain::TerrainError;

/// Errors raised by [`ChunkStreamCache`](crate::ChunkStreamCache).
///
/// All of them are contract violations by the caller; none are transient.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamError {
    /// Chunk width must be strictly positive.
    #[error("chunk width must be positive, got {0}")]
    InvalidChunkWidth(i64),

    /// The visibility window must include at least one neighbor on each side.
    #[error("visibility radius must be at least 1")]
    InvalidVisibilityRadius,

    /// Viewer position was NaN or infinite.
    #[error("viewer position must be finite, got {0}")]
    NonFiniteViewer(f64),

    /// Viewer position is finite but its visibility window lies outside the
    /// representable world.
    #[error("viewer position {0} is outside the representable world")]
    ViewerOutOfRange(f64),

    /// The requested chunk's span does not fit in world coordinates.
    #[error("chunk {0} is outside the representable world")]
    ChunkOutOfRange(i64),

    /// Generator parameters were rejected.
    #[error(transparent)]
    Terrain(#[from] TerrainError),
}
