#![forbid(unsafe_code)]

//! Per-tile interpolation constants.
//!
//! Every tile shares the same corner offsets and eased weights, so they are
//! computed once for a `tile_size x tile_size` block and reused for every
//! cell in every frame.

use crate::gradient::Vec2;

/// Classical quintic ease curve `6t^5 - 15t^4 + 10t^3`.
///
/// Zero first and second derivatives at both ends keep tile seams invisible.
#[inline]
pub fn ease(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
pub fn lerp(min: f64, max: f64, alpha: f64) -> f64 {
    min + (max - min) * alpha
}

/// Inverse of [`lerp`]: where `pos` sits between `min` and `max`.
#[inline]
pub fn lerp_alpha(min: f64, max: f64, pos: f64) -> f64 {
    (pos - min) / (max - min)
}

/// Constants for one intra-tile pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TileEntry {
    /// Corner-to-center offsets in tile units, NW, NE, SW, SE.
    pub offsets: [Vec2; 4],
    /// Eased blend factors: `x` horizontal, `y` vertical.
    pub weight: Vec2,
}

/// Immutable row-major table of [`TileEntry`] for one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileInterpolationTable {
    tile_size: usize,
    entries: Vec<TileEntry>,
}

impl TileInterpolationTable {
    pub fn build(tile_size: usize) -> Self {
        let size = tile_size as f64;
        let inv = 1.0 / size;
        let mut entries = Vec::with_capacity(tile_size * tile_size);

        for i in 0..tile_size {
            let cy = i as f64 + 0.5;
            let wy = ease(lerp_alpha(0.0, size, cy));
            for j in 0..tile_size {
                let cx = j as f64 + 0.5;
                let offsets = [
                    Vec2::new(cx, cy),
                    Vec2::new(cx - size, cy),
                    Vec2::new(cx, cy - size),
                    Vec2::new(cx - size, cy - size),
                ]
                .map(|v| v.scale(inv));
                let weight = Vec2::new(ease(lerp_alpha(0.0, size, cx)), wy);
                entries.push(TileEntry { offsets, weight });
            }
        }

        Self { tile_size, entries }
    }

    #[inline]
    pub const fn tile_size(&self) -> usize {
        self.tile_size
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> &TileEntry {
        &self.entries[i * self.tile_size + j]
    }

    /// All entries of intra-tile row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> &[TileEntry] {
        let start = i * self.tile_size;
        &self.entries[start..start + self.tile_size]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
