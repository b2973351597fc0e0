//! Cosmetic color variation for generated entities.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// An opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Base color of ground blocks.
pub const BASE_GROUND_COLOR: Rgb = Rgb::new(212, 123, 74);
/// Color of trunk segments.
pub const TRUNK_COLOR: Rgb = Rgb::new(100, 50, 20);
/// Base color of leaves.
pub const LEAF_COLOR: Rgb = Rgb::new(50, 200, 30);
/// Color of fruit.
pub const FRUIT_COLOR: Rgb = Rgb::new(255, 0, 0);

/// Maximum per-channel shift applied by [`PositionalJitter`].
pub const COLOR_DELTA: u8 = 10;

/// Produces a color close to a base color.
///
/// `key` identifies the entity being colored; implementations must return the
/// same color for the same `(base, key)` so regenerated chunks look identical.
pub trait ColorSupplier: Send + Sync {
    /// Returns a variant of `base` for the entity identified by `key`.
    fn approximate(&self, base: Rgb, key: [i64; 2]) -> Rgb;
}

/// No-op supplier: always returns the base color.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseColor;

impl ColorSupplier for BaseColor {
    fn approximate(&self, base: Rgb, _key: [i64; 2]) -> Rgb {
        base
    }
}

/// Shifts each channel by a pseudo-random amount in `[-delta, delta]`,
/// derived from the world seed and the entity key.
#[derive(Clone, Copy, Debug)]
pub struct PositionalJitter {
    seed: u64,
    delta: u8,
}

impl PositionalJitter {
    /// Creates a jitter supplier with the default [`COLOR_DELTA`].
    pub fn new(seed: u64) -> Self {
        Self::with_delta(seed, COLOR_DELTA)
    }

    /// Creates a jitter supplier with a custom maximum shift.
    pub fn with_delta(seed: u64, delta: u8) -> Self {
        Self { seed, delta }
    }

    fn shift(channel: u8, bits: u64, delta: u8) -> u8 {
        let span = 2 * u64::from(delta) + 1;
        let offset = (bits % span) as i16 - i16::from(delta);
        (i16::from(channel) + offset).clamp(0, 255) as u8
    }
}

impl ColorSupplier for PositionalJitter {
    fn approximate(&self, base: Rgb, key: [i64; 2]) -> Rgb {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        key.hash(&mut hasher);
        let bits = hasher.finish();

        Rgb {
            r: Self::shift(base.r, bits, self.delta),
            g: Self::shift(base.g, bits >> 16, self.delta),
            b: Self::shift(base.b, bits >> 32, self.delta),
        }
    }
}
