#![forbid(unsafe_code)]

//! Field configuration and validation.
//!
//! A [`FieldConfig`] is fixed for the lifetime of a [`NoiseField`]. Values are
//! validated up front and never clamped: a negative dimension, a zero tile
//! size, or a non-positive rotation period is a [`ConfigError`].
//!
//! Environment overrides use the `PERLIN_*` prefix and are read through an
//! injectable lookup so tests never touch the process environment.
//!
//! [`NoiseField`]: crate::NoiseField

use std::env;
use std::fmt;

use crate::buffer::Channel;

/// Default coarse grid width, in cells.
pub const DEFAULT_FIELD_WIDTH: usize = 16;
/// Default coarse grid height, in cells.
pub const DEFAULT_FIELD_HEIGHT: usize = 10;
/// Default tile edge length, in pixels.
pub const DEFAULT_TILE_SIZE: usize = 64;
/// Default time for one full gradient revolution, in milliseconds.
pub const DEFAULT_ROTATION_PERIOD_MS: f64 = 3000.0;

/// Coarse gradient grid size, in cells (not pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldDimensions {
    pub width: usize,
    pub height: usize,
}

impl FieldDimensions {
    #[inline]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// True when the field has no cells to render.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Validated, immutable field configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConfig {
    dimensions: FieldDimensions,
    tile_size: usize,
    rotation_period_ms: f64,
}

/// Configuration error with the offending value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Field width or height below zero.
    NegativeDimension { field: &'static str, value: i64 },
    /// Tile size of zero or less.
    NonPositiveTileSize(i64),
    /// Rotation period that is zero, negative, or not finite.
    InvalidRotationPeriod(f64),
    /// Viewport whose RGBA byte length does not fit in `usize`.
    ViewportTooLarge { width: usize, height: usize },
    /// Hand-specified gradient grid with the wrong number of cells.
    GradientCount { expected: usize, actual: usize },
    /// Hand-specified gradient that is not a unit vector.
    NonUnitGradient { index: usize, length: f64 },
    /// Environment value that does not parse.
    InvalidValue { field: &'static str, value: String },
    /// Hand-built gradient grid whose size differs from the configured field.
    GridMismatch {
        config: FieldDimensions,
        grid: FieldDimensions,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeDimension { field, value } => {
                write!(f, "{field}={value} (must be >= 0)")
            }
            Self::NonPositiveTileSize(value) => write!(f, "tile_size={value} (must be > 0)"),
            Self::InvalidRotationPeriod(value) => {
                write!(f, "rotation_period_ms={value} (must be finite and > 0)")
            }
            Self::ViewportTooLarge { width, height } => {
                write!(f, "viewport {width}x{height} exceeds addressable memory")
            }
            Self::GradientCount { expected, actual } => {
                write!(f, "expected {expected} gradients, got {actual}")
            }
            Self::NonUnitGradient { index, length } => {
                write!(f, "gradient {index} has length {length} (must be 1)")
            }
            Self::InvalidValue { field, value } => write!(f, "invalid {field} value: {value}"),
            Self::GridMismatch { config, grid } => write!(
                f,
                "gradient grid is {}x{} cells, config expects {}x{}",
                grid.width, grid.height, config.width, config.height
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl FieldConfig {
    /// Validate and build a configuration.
    ///
    /// Dimensions arrive signed so that negative input from callers and the
    /// environment is reported instead of wrapped.
    pub fn new(
        field_width: i64,
        field_height: i64,
        tile_size: i64,
        rotation_period_ms: f64,
    ) -> Result<Self, ConfigError> {
        let width = non_negative("field_width", field_width)?;
        let height = non_negative("field_height", field_height)?;
        if tile_size <= 0 {
            return Err(ConfigError::NonPositiveTileSize(tile_size));
        }
        let tile_size = usize::try_from(tile_size)
            .map_err(|_| ConfigError::NonPositiveTileSize(tile_size))?;
        if !rotation_period_ms.is_finite() || rotation_period_ms <= 0.0 {
            return Err(ConfigError::InvalidRotationPeriod(rotation_period_ms));
        }

        let config = Self {
            dimensions: FieldDimensions::new(width, height),
            tile_size,
            rotation_period_ms,
        };
        config.checked_buffer_len()?;
        Ok(config)
    }

    /// Parse config from `PERLIN_*` environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Parse config from an arbitrary key lookup over the defaults.
    pub fn from_env_with<F>(get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut width = DEFAULT_FIELD_WIDTH as i64;
        let mut height = DEFAULT_FIELD_HEIGHT as i64;
        let mut tile = DEFAULT_TILE_SIZE as i64;
        let mut period = DEFAULT_ROTATION_PERIOD_MS;

        if let Some(val) = get_env("PERLIN_FIELD_WIDTH") {
            width = parse_env("PERLIN_FIELD_WIDTH", &val)?;
        }
        if let Some(val) = get_env("PERLIN_FIELD_HEIGHT") {
            height = parse_env("PERLIN_FIELD_HEIGHT", &val)?;
        }
        if let Some(val) = get_env("PERLIN_TILE_SIZE") {
            tile = parse_env("PERLIN_TILE_SIZE", &val)?;
        }
        if let Some(val) = get_env("PERLIN_ROTATION_PERIOD_MS") {
            period = parse_env("PERLIN_ROTATION_PERIOD_MS", &val)?;
        }

        Self::new(width, height, tile, period)
    }

    #[inline]
    pub const fn dimensions(&self) -> FieldDimensions {
        self.dimensions
    }

    #[inline]
    pub const fn tile_size(&self) -> usize {
        self.tile_size
    }

    #[inline]
    pub const fn rotation_period_ms(&self) -> f64 {
        self.rotation_period_ms
    }

    /// Viewport size in pixels: `(field_width * tile, field_height * tile)`.
    #[inline]
    pub const fn viewport(&self) -> (usize, usize) {
        (
            self.dimensions.width * self.tile_size,
            self.dimensions.height * self.tile_size,
        )
    }

    /// Rotation angle in radians for `elapsed_ms` of wall-clock time,
    /// reduced to `[0, 2π)`.
    ///
    /// Whole periods are dropped before scaling, so the angle stays finite
    /// for any finite input.
    #[inline]
    pub fn rotation_for(&self, elapsed_ms: f64) -> f64 {
        (elapsed_ms / self.rotation_period_ms).rem_euclid(1.0) * std::f64::consts::TAU
    }

    fn checked_buffer_len(&self) -> Result<usize, ConfigError> {
        let too_large = || ConfigError::ViewportTooLarge {
            width: self.dimensions.width.saturating_mul(self.tile_size),
            height: self.dimensions.height.saturating_mul(self.tile_size),
        };
        let width = self
            .dimensions
            .width
            .checked_mul(self.tile_size)
            .ok_or_else(too_large)?;
        let height = self
            .dimensions
            .height
            .checked_mul(self.tile_size)
            .ok_or_else(too_large)?;
        width
            .checked_mul(height)
            .and_then(|px| px.checked_mul(Channel::STRIDE))
            .ok_or_else(too_large)
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            dimensions: FieldDimensions::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT),
            tile_size: DEFAULT_TILE_SIZE,
            rotation_period_ms: DEFAULT_ROTATION_PERIOD_MS,
        }
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|_| ConfigError::NegativeDimension { field, value })
}

fn parse_env<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field,
        value: raw.to_string(),
    })
}
