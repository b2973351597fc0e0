//! Terrain generation error types.

/// Invalid generator parameters, reported at construction time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// Tree probability is not a finite value in `[0, 1]`.
    #[error("tree probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),

    /// A height-field parameter is unusable.
    #[error("invalid noise parameter `{name}`: {value}")]
    InvalidNoise {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
}
