#![forbid(unsafe_code)]

//! Terminal driver for `perlin-field`.
//!
//! Owns everything the noise core leaves out: argument parsing, the frame
//! loop and its timing, logging setup, and presentation.

pub mod cli;
pub mod driver;
pub mod surface;

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
