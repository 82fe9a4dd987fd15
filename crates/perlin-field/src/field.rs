#![forbid(unsafe_code)]

//! Owned animation state: gradients, tile table, and the frame buffers.
//!
//! A driver constructs one [`NoiseField`], calls [`NoiseField::advance`] once
//! per tick with the elapsed milliseconds, and presents
//! [`NoiseField::frame_buffer`]. Rotation always finishes before the render
//! pass reads the grid; `&mut self` rules out any concurrent reader.

use rand::thread_rng;
use web_time::{Duration, Instant};

#[cfg(feature = "tracing")]
use tracing::{debug, trace, warn};

use crate::buffer::{FrameBuffers, FrameView};
use crate::config::{ConfigError, FieldConfig};
use crate::gradient::GradientField;
use crate::render::NoiseRenderer;
use crate::tile::TileInterpolationTable;

/// Running counters for the frames rendered so far.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    /// Frames rendered, including the initial frame.
    pub frames: u64,
    /// Sum of accepted `elapsed_ms` values.
    pub total_elapsed_ms: f64,
    /// Wall-clock duration of the most recent render pass.
    pub last_render: Duration,
}

#[derive(Debug, Clone)]
pub struct NoiseField {
    config: FieldConfig,
    gradients: GradientField,
    table: TileInterpolationTable,
    buffers: FrameBuffers,
    stats: FrameStats,
}

impl NoiseField {
    /// Field with gradients drawn from the thread RNG.
    pub fn new(config: FieldConfig) -> Self {
        let gradients = GradientField::random(config.dimensions(), &mut thread_rng());
        Self::from_parts(config, gradients)
    }

    /// Reproducible field for `seed`.
    pub fn with_seed(config: FieldConfig, seed: u64) -> Self {
        let gradients = GradientField::from_seed(config.dimensions(), seed);
        Self::from_parts(config, gradients)
    }

    /// Field over an existing gradient grid.
    ///
    /// The grid must have the config's dimensions; the config is never
    /// adjusted to fit the grid.
    pub fn with_gradients(
        config: FieldConfig,
        gradients: GradientField,
    ) -> Result<Self, ConfigError> {
        if gradients.dimensions() != config.dimensions() {
            return Err(ConfigError::GridMismatch {
                config: config.dimensions(),
                grid: gradients.dimensions(),
            });
        }
        Ok(Self::from_parts(config, gradients))
    }

    /// Caller guarantees `gradients` matches `config.dimensions()`.
    fn from_parts(config: FieldConfig, gradients: GradientField) -> Self {
        let dims = config.dimensions();
        let tile = config.tile_size();
        let table = TileInterpolationTable::build(tile);
        let buffers = FrameBuffers::new(dims.width * tile, dims.height * tile);

        #[cfg(feature = "tracing")]
        debug!(
            field_width = dims.width,
            field_height = dims.height,
            tile_size = tile,
            rotation_period_ms = config.rotation_period_ms(),
            "noise field: init"
        );

        let mut field = Self {
            config,
            gradients,
            table,
            buffers,
            stats: FrameStats::default(),
        };
        field.render_frame();
        field
    }

    /// Rotate every gradient for `elapsed_ms` of time, then render a frame.
    ///
    /// Negative or non-finite input counts as no time passing.
    pub fn advance(&mut self, elapsed_ms: f64) {
        let elapsed_ms = if elapsed_ms.is_finite() && elapsed_ms >= 0.0 {
            elapsed_ms
        } else {
            #[cfg(feature = "tracing")]
            warn!(elapsed_ms, "noise field: ignoring invalid elapsed time");
            0.0
        };

        self.gradients
            .rotate_all(self.config.rotation_for(elapsed_ms));
        self.stats.total_elapsed_ms += elapsed_ms;
        self.render_frame();
    }

    /// The most recently completed frame.
    #[inline]
    pub fn frame_buffer(&self) -> FrameView<'_> {
        self.buffers.front().view()
    }

    #[inline]
    pub const fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[inline]
    pub const fn gradients(&self) -> &GradientField {
        &self.gradients
    }

    #[inline]
    pub const fn table(&self) -> &TileInterpolationTable {
        &self.table
    }

    #[inline]
    pub const fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Viewport size in pixels.
    #[inline]
    pub fn viewport(&self) -> (usize, usize) {
        let front = self.buffers.front();
        (front.width(), front.height())
    }

    fn render_frame(&mut self) {
        let start = Instant::now();
        NoiseRenderer::render(&self.gradients, &self.table, self.buffers.back_mut());
        self.buffers.swap();
        self.stats.frames += 1;
        self.stats.last_render = start.elapsed();

        #[cfg(feature = "tracing")]
        trace!(
            frame = self.stats.frames,
            render_us = self.stats.last_render.as_micros() as u64,
            "noise field: frame"
        );
    }
}
