//! Streaming configuration.

use verdant_config::Config;
use verdant_terrain::{FloraParams, HeightFieldParams};

use crate::error::StreamError;

/// Everything a [`ChunkStreamCache`](crate::ChunkStreamCache) needs to generate
/// and stream chunks.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamConfig {
    /// Chunk width in world units. Typically the viewport width.
    pub chunk_width: i64,
    /// Chunks kept materialized on each side of the viewer's chunk.
    pub visibility_radius: u32,
    /// Terrain surface parameters, including the world seed.
    pub height: HeightFieldParams,
    /// Tree placement parameters.
    pub flora: FloraParams,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_width: 800,
            visibility_radius: 1,
            height: HeightFieldParams::default(),
            flora: FloraParams::default(),
        }
    }
}

impl StreamConfig {
    /// The world seed.
    pub fn seed(&self) -> u64 {
        self.height.seed
    }

    /// Reject configurations the cache cannot stream.
    pub fn validate(&self) -> Result<(), StreamError> {
        if self.chunk_width <= 0 {
            return Err(StreamError::InvalidChunkWidth(self.chunk_width));
        }
        if self.visibility_radius == 0 {
            return Err(StreamError::InvalidVisibilityRadius);
        }
        self.flora.validate()?;
        self.height.validate()?;
        Ok(())
    }

    /// Build from the persisted application config.
    pub fn from_config(config: &Config) -> Self {
        let noise = &config.world.noise;
        Self {
            chunk_width: i64::from(config.effective_chunk_width()),
            visibility_radius: config.streaming.visibility_radius,
            height: HeightFieldParams {
                seed: config.world.seed,
                base_height: config.world.base_height(),
                amplitude: noise.amplitude,
                base_frequency: noise.base_frequency,
                octaves: noise.octaves,
                persistence: noise.persistence,
                lacunarity: noise.lacunarity,
            },
            flora: FloraParams {
                tree_probability: config.flora.tree_probability,
                base_trunk_height: config.flora.base_trunk_height,
                trunk_height_variation: config.flora.trunk_height_variation,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use verdant_terrain::TerrainError;

    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(StreamConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_width() {
        let config = StreamConfig {
            chunk_width: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(StreamError::InvalidChunkWidth(0)));
    }

    #[test]
    fn test_rejects_zero_radius() {
        let config = StreamConfig {
            visibility_radius: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(StreamError::InvalidVisibilityRadius));
    }

    #[test]
    fn test_rejects_bad_probability() {
        let mut config = StreamConfig::default();
        config.flora.tree_probability = 1.5;
        assert_eq!(
            config.validate(),
            Err(StreamError::Terrain(TerrainError::InvalidProbability(1.5)))
        );
    }

    #[test]
    fn test_from_config_maps_fields() {
        let mut app = Config::default();
        app.world.seed = 77;
        app.streaming.visibility_radius = 2;

        let config = StreamConfig::from_config(&app);
        assert_eq!(config.chunk_width, 800);
        assert_eq!(config.visibility_radius, 2);
        assert_eq!(config.seed(), 77);
        assert!((config.height.base_height - 720.0 * 0.66).abs() < 1e-9);
        assert!((config.flora.tree_probability - 0.1).abs() < 1e-12);
    }
}
