//! Seeded one-dimensional height field built from fractal Perlin noise.

use noise::{NoiseFn, Perlin};

use crate::block::BLOCK_SIZE;
use crate::error::TerrainError;

/// Configuration for the terrain surface.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightFieldParams {
    /// World seed for deterministic generation.
    pub seed: u64,
    /// Surface height at `x = 0` before noise is applied.
    pub base_height: f64,
    /// Amplitude of the first octave, in world units.
    pub amplitude: f64,
    /// Frequency of the first octave. Default: 0.001 (one cycle per 1000 units).
    pub base_frequency: f64,
    /// Number of noise octaves to composite.
    pub octaves: u32,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
}

impl Default for HeightFieldParams {
    fn default() -> Self {
        Self {
            seed: 0,
            base_height: 720.0 * 0.66,
            amplitude: 100.0,
            base_frequency: 0.001,
            octaves: 3,
            persistence: 0.35,
            lacunarity: 2.0,
        }
    }
}

impl HeightFieldParams {
    /// Check that every parameter produces a finite, smooth surface.
    pub fn validate(&self) -> Result<(), TerrainError> {
        let finite = [
            ("base_height", self.base_height),
            ("amplitude", self.amplitude),
            ("base_frequency", self.base_frequency),
            ("persistence", self.persistence),
            ("lacunarity", self.lacunarity),
        ];
        if let Some(&(name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(TerrainError::InvalidNoise { name, value });
        }
        if self.octaves == 0 {
            return Err(TerrainError::InvalidNoise {
                name: "octaves",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Fold a 64-bit world seed into the 32 bits Perlin accepts, mixing in the high half.
fn fold_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

/// Maps a horizontal coordinate to a terrain surface height.
///
/// Pure and immutable after construction: the permutation table is derived
/// once from the seed, so the same `x` always yields the same height.
#[derive(Clone)]
pub struct HeightField {
    noise: Perlin,
    params: HeightFieldParams,
}

impl std::fmt::Debug for HeightField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeightField")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl HeightField {
    /// Create a height field, validating the parameters.
    pub fn new(params: HeightFieldParams) -> Result<Self, TerrainError> {
        params.validate()?;
        let noise = Perlin::new(fold_seed(params.seed));
        tracing::debug!(
            seed = params.seed,
            base_height = params.base_height,
            octaves = params.octaves,
            "height field initialized"
        );
        Ok(Self { noise, params })
    }

    /// Surface height at `x`: `base_height + fbm(x)`.
    pub fn height_at(&self, x: f64) -> f64 {
        self.params.base_height + self.noise_at(x)
    }

    /// Surface height at `x`, floor-aligned to the block grid.
    pub fn aligned_surface_at(&self, x: f64) -> f64 {
        let block = BLOCK_SIZE as f64;
        (self.height_at(x) / block).floor() * block
    }

    /// The noise contribution alone (without the base height).
    pub fn noise_at(&self, x: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.params.base_frequency;
        let mut amplitude = self.params.amplitude;

        for _ in 0..self.params.octaves {
            total += self.noise.get([x * frequency, 0.0]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        total
    }

    /// Theoretical maximum absolute noise contribution (geometric series sum).
    pub fn max_amplitude(&self) -> f64 {
        let mut sum = 0.0;
        let mut amp = self.params.amplitude.abs();
        for _ in 0..self.params.octaves {
            sum += amp;
            amp *= self.params.persistence.abs();
        }
        sum
    }

    /// World seed this field was built from.
    pub fn seed(&self) -> u64 {
        self.params.seed
    }

    /// Surface height at `x = 0` before noise.
    pub fn base_height(&self) -> f64 {
        self.params.base_height
    }

    /// Return a reference to the parameters.
    pub fn params(&self) -> &HeightFieldParams {
        &self.params
    }
}
