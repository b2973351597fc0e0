//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World shape and terrain noise.
    pub world: WorldConfig,
    /// Vegetation placement.
    pub flora: FloraConfig,
    /// Chunk streaming around the viewer.
    pub streaming: StreamingConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed. The only source of randomness for terrain and flora.
    pub seed: u64,
    /// Viewport width in world units.
    pub view_width: u32,
    /// Viewport height in world units. The terrain baseline is derived from it.
    pub view_height: u32,
    /// Fraction of the viewport height at which the ground sits at `x = 0`.
    pub ground_height_ratio: f64,
    /// Coherent noise shaping the surface.
    pub noise: NoiseConfig,
}

/// Fractal noise parameters for the terrain surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    /// Amplitude of the first octave, in world units.
    pub amplitude: f64,
    /// Frequency of the first octave (cycles per world unit).
    pub base_frequency: f64,
    /// Number of octaves to composite.
    pub octaves: u32,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
}

/// Flora placement configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FloraConfig {
    /// Probability that a tree is rooted at any block-aligned slot.
    pub tree_probability: f64,
    /// Nominal trunk height in blocks before random variation.
    pub base_trunk_height: u32,
    /// Exclusive upper bound of the random trunk height added to the base.
    pub trunk_height_variation: u32,
}

/// Streaming window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamingConfig {
    /// Chunk width in world units. Zero means "use the viewport width".
    pub chunk_width: u32,
    /// Number of chunks kept materialized on each side of the viewer's chunk.
    pub visibility_radius: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Also write JSON logs to the config directory in debug builds.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 123_458,
            view_width: 800,
            view_height: 720,
            ground_height_ratio: 0.66,
            noise: NoiseConfig::default(),
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            amplitude: 100.0,
            base_frequency: 0.001,
            octaves: 3,
            persistence: 0.35,
            lacunarity: 2.0,
        }
    }
}

impl Default for FloraConfig {
    fn default() -> Self {
        Self {
            tree_probability: 0.1,
            base_trunk_height: 3,
            trunk_height_variation: 3,
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_width: 0,
            visibility_radius: 1,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: true,
        }
    }
}

impl WorldConfig {
    /// Terrain height at `x = 0`, before noise.
    pub fn base_height(&self) -> f64 {
        f64::from(self.view_height) * self.ground_height_ratio
    }
}

impl Config {
    /// Chunk width in world units, falling back to the viewport width when unset.
    pub fn effective_chunk_width(&self) -> u32 {
        if self.streaming.chunk_width == 0 {
            self.world.view_width
        } else {
            self.streaming.chunk_width
        }
    }
}

// --- Load / Save / Reload ---

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

impl Config {
    /// Read `config.ron` from `config_dir`, writing the defaults there first if it is missing.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!(
                "No config at {}, wrote defaults (seed {})",
                path.display(),
                config.world.seed
            );
            return Ok(config);
        }

        let config = Self::read_from(&path)?;
        log::info!("Loaded config from {} (seed {})", path.display(), config.world.seed);
        Ok(config)
    }

    /// Write this config to `config_dir/config.ron`, creating the directory as needed.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        let path = config_dir.join(CONFIG_FILE);
        std::fs::write(&path, text).map_err(|source| ConfigError::Write { path, source })
    }

    /// Re-read `config.ron` and return it only if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = Self::read_from(&config_dir.join(CONFIG_FILE))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Config changed on disk (seed {} -> {})", self.world.seed, fresh.world.seed);
        Ok(Some(fresh))
    }

    fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
