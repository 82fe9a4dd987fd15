#![forbid(unsafe_code)]

//! Animated 2-D Perlin gradient noise rendered into an RGBA8 pixel buffer.
//!
//! # Pipeline
//! - **GradientField**: `(h+1) x (w+1)` unit gradients, rotated every frame.
//! - **TileInterpolationTable**: per-pixel corner offsets and eased weights,
//!   shared by every tile and built once.
//! - **NoiseRenderer**: bilinear blend of the corner dot products, mapped to
//!   grayscale.
//! - **NoiseField**: owns all of the above plus a front/back buffer pair and
//!   exposes `advance(elapsed_ms)` / `frame_buffer()` to a driver.
//!
//! The crate never schedules, sleeps, or presents; that belongs to the driver.
//!
//! # Features
//! - `tracing`: structured events for init, per-frame timing, and ignored input.
//! - `parallel`: render tile-row bands concurrently with rayon.
//!
//! # Example
//!
//! ```
//! use perlin_field::{FieldConfig, NoiseField};
//!
//! let config = FieldConfig::new(4, 3, 8, 3000.0).unwrap();
//! let mut field = NoiseField::with_seed(config, 7);
//! field.advance(16.0);
//! let frame = field.frame_buffer();
//! assert_eq!((frame.width, frame.height), (32, 24));
//! assert_eq!(frame.pixels.len(), 32 * 24 * 4);
//! ```

pub mod buffer;
pub mod config;
pub mod field;
pub mod gradient;
pub mod render;
pub mod tile;

pub use buffer::{Channel, FrameBuffers, FrameView, PixelBuffer};
pub use config::{ConfigError, FieldConfig, FieldDimensions};
pub use field::{FrameStats, NoiseField};
pub use gradient::{Gradient, GradientField, Vec2};
pub use render::{NoiseRenderer, intensity};
pub use tile::{TileEntry, TileInterpolationTable, ease, lerp, lerp_alpha};
