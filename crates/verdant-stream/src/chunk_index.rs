//! Chunk indices and visibility windows along the horizontal axis.

use verdant_terrain::{BLOCK_SIZE, align_up};

/// Identifies a fixed-width horizontal span of the world.
///
/// Chunk `c` covers `[c * width, (c + 1) * width)` for the lifetime of the
/// process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkIndex(pub i64);

impl ChunkIndex {
    /// The chunk containing world coordinate `x` (`floor(x / width)`).
    ///
    /// Returns `None` if `x` is not finite or the index does not fit in `i64`.
    pub fn containing(x: f64, chunk_width: i64) -> Option<Self> {
        let index = (x / chunk_width as f64).floor();
        // i64::MIN as f64 is exactly -2^63; the upper bound is exclusive.
        let limit = -(i64::MIN as f64);
        (index >= -limit && index < limit).then(|| Self(index as i64))
    }

    /// Half-open world span `[start, end)` covered by this chunk, if representable.
    pub fn span(self, chunk_width: i64) -> Option<(i64, i64)> {
        let start = self.0.checked_mul(chunk_width)?;
        Some((start, start.checked_add(chunk_width)?))
    }

    /// Inclusive span handed to the terrain builder.
    ///
    /// Starts at the first block-aligned column inside the chunk and ends one
    /// unit before the next chunk, so each column belongs to exactly one chunk.
    pub fn column_span(self, chunk_width: i64) -> Option<(i64, i64)> {
        let (start, end) = self.span(chunk_width)?;
        start.checked_add(BLOCK_SIZE)?;
        Some((align_up(start, BLOCK_SIZE), end - 1))
    }

    /// Returns the index offset by `delta` chunks, or `None` on overflow.
    pub fn offset(self, delta: i64) -> Option<Self> {
        self.0.checked_add(delta).map(Self)
    }

    /// The window of chunks within `radius` of this one, or `None` if it
    /// would run past the ends of the index range.
    pub fn window(self, radius: u32) -> Option<ChunkWindow> {
        let r = i64::from(radius);
        Some(ChunkWindow {
            min: self.offset(-r)?,
            max: self.offset(r)?,
        })
    }
}

impl std::fmt::Display for ChunkIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contiguous, inclusive range of chunk indices kept materialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkWindow {
    /// Leftmost chunk in the window.
    pub min: ChunkIndex,
    /// Rightmost chunk in the window.
    pub max: ChunkIndex,
}

impl ChunkWindow {
    /// Is `index` inside the window?
    pub fn contains(&self, index: ChunkIndex) -> bool {
        self.min <= index && index <= self.max
    }

    /// Indices from left to right.
    pub fn iter(&self) -> impl Iterator<Item = ChunkIndex> {
        (self.min.0..=self.max.0).map(ChunkIndex)
    }

    /// Number of chunks in the window.
    pub fn len(&self) -> usize {
        (self.max.0 - self.min.0 + 1) as usize
    }

    /// Always `false`: a window holds at least its center chunk.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// World span `[start, end)` covered by the whole window.
    ///
    /// Returns `None` unless the span, widened by one block on each side,
    /// fits in `i64`, so block-by-block iteration over it cannot overflow.
    pub fn world_span(&self, chunk_width: i64) -> Option<(i64, i64)> {
        let (start, _) = self.min.span(chunk_width)?;
        let (_, end) = self.max.span(chunk_width)?;
        start.checked_sub(BLOCK_SIZE)?;
        end.checked_add(BLOCK_SIZE)?;
        Some((start, end))
    }
}
