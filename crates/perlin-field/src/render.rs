#![forbid(unsafe_code)]

//! Per-frame noise fill.
//!
//! The viewport is split into tile-row bands of `tile_size` pixel rows. Each
//! band depends only on one row of cells in the gradient grid and owns a
//! disjoint slice of the output, so bands can be rendered in any order or
//! concurrently (`parallel` feature) with byte-identical results.
//!
//! # Determinism
//!
//! Output is a pure function of the gradient grid and the tile table. Every
//! pixel is written exactly once per call.

use crate::buffer::{Channel, PixelBuffer, put_gray};
use crate::gradient::{Gradient, GradientField};
use crate::tile::{TileEntry, TileInterpolationTable, lerp, lerp_alpha};

/// Map a noise value (nominally `[-1, 1]`) to an 8-bit intensity.
///
/// Values outside the nominal range saturate at 0 or 255.
#[inline]
pub fn intensity(value: f64) -> u8 {
    let scaled = lerp(0.0, 255.0, lerp_alpha(-1.0, 1.0, value));
    scaled.round().clamp(0.0, 255.0) as u8
}

/// Bilinear blend of the four corner dot products with eased weights.
///
/// Both row blends use the horizontal weight; the vertical weight blends the
/// two rows.
#[inline]
fn blend(entry: &TileEntry, corners: &[Gradient; 4]) -> f64 {
    let [nw, ne, sw, se] = corners;
    let w = entry.weight;
    let top = lerp(entry.offsets[0].dot(*nw), entry.offsets[1].dot(*ne), w.x);
    let bottom = lerp(entry.offsets[2].dot(*sw), entry.offsets[3].dot(*se), w.x);
    lerp(top, bottom, w.y)
}

/// Stateless renderer combining a [`GradientField`] with a
/// [`TileInterpolationTable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoiseRenderer;

impl NoiseRenderer {
    /// Raw noise value for pixel `(pi, pj)` of cell `(gi, gj)`.
    #[inline]
    pub fn sample(
        grid: &GradientField,
        table: &TileInterpolationTable,
        gi: usize,
        gj: usize,
        pi: usize,
        pj: usize,
    ) -> f64 {
        blend(table.get(pi, pj), &grid.corners(gi, gj))
    }

    /// Fill `out` with the current noise frame.
    ///
    /// Uses the rayon band renderer when the `parallel` feature is enabled.
    ///
    /// # Panics
    ///
    /// Panics if `out` does not match the viewport of `grid` and `table`.
    pub fn render(grid: &GradientField, table: &TileInterpolationTable, out: &mut PixelBuffer) {
        #[cfg(feature = "parallel")]
        Self::render_parallel(grid, table, out);
        #[cfg(not(feature = "parallel"))]
        Self::render_serial(grid, table, out);
    }

    /// Single-threaded fill, bands top to bottom.
    pub fn render_serial(
        grid: &GradientField,
        table: &TileInterpolationTable,
        out: &mut PixelBuffer,
    ) {
        let Some(band_len) = band_len(grid, table, out) else {
            return;
        };
        for (gi, band) in out.as_bytes_mut().chunks_exact_mut(band_len).enumerate() {
            render_band(grid, table, gi, band);
        }
    }

    /// Fill with one rayon task per tile-row band.
    #[cfg(feature = "parallel")]
    pub fn render_parallel(
        grid: &GradientField,
        table: &TileInterpolationTable,
        out: &mut PixelBuffer,
    ) {
        use rayon::prelude::*;

        let Some(band_len) = band_len(grid, table, out) else {
            return;
        };
        out.as_bytes_mut()
            .par_chunks_exact_mut(band_len)
            .enumerate()
            .for_each(|(gi, band)| render_band(grid, table, gi, band));
    }
}

/// Bytes per tile-row band, or `None` for an empty viewport.
fn band_len(
    grid: &GradientField,
    table: &TileInterpolationTable,
    out: &PixelBuffer,
) -> Option<usize> {
    let dims = grid.dimensions();
    let tile = table.tile_size();
    assert!(
        out.width() == dims.width * tile && out.height() == dims.height * tile,
        "buffer {}x{} does not match viewport {}x{}",
        out.width(),
        out.height(),
        dims.width * tile,
        dims.height * tile
    );
    if dims.is_empty() {
        return None;
    }
    Some(out.row_len() * tile)
}

/// Render every tile of cell row `gi` into its band.
fn render_band(grid: &GradientField, table: &TileInterpolationTable, gi: usize, band: &mut [u8]) {
    let tile = table.tile_size();
    let cols = grid.dimensions().width;
    let row_len = cols * tile * Channel::STRIDE;
    let tile_row_len = tile * Channel::STRIDE;

    for gj in 0..cols {
        let corners = grid.corners(gi, gj);
        for pi in 0..tile {
            let start = pi * row_len + gj * tile_row_len;
            let out_row = &mut band[start..start + tile_row_len];
            for (entry, px) in table
                .row(pi)
                .iter()
                .zip(out_row.chunks_exact_mut(Channel::STRIDE))
            {
                put_gray(px, intensity(blend(entry, &corners)));
            }
        }
    }
}
