#![forbid(unsafe_code)]

//! perlin-demo binary entry point.

use std::io;

use perlin_demo::cli::{Opts, SurfaceKind};
use perlin_demo::driver::FrameLoop;
use perlin_demo::init_logging;
use perlin_demo::surface::{AnsiSurface, NullSurface};
use perlin_field::NoiseField;
use web_time::Duration;

fn main() {
    let opts = Opts::parse();
    init_logging();

    let config = match opts.field_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    let field = match opts.seed {
        Some(seed) => NoiseField::with_seed(config, seed),
        None => NoiseField::new(config),
    };
    let mut frame_loop = FrameLoop::new(field, Duration::from_millis(opts.tick_ms), opts.frames);

    let result = match opts.surface {
        SurfaceKind::Ansi => {
            let mut surface = AnsiSurface::new(io::stdout().lock(), opts.cols, opts.rows);
            let run = frame_loop.run(&mut surface);
            run.and_then(|_| surface.finish().map(|_| ()))
        }
        SurfaceKind::Null => {
            let mut surface = NullSurface::new();
            frame_loop.run(&mut surface).map(|summary| {
                tracing::info!(
                    frames = summary.frames,
                    checksum = %format!("{:016x}", surface.last_checksum()),
                    "null surface: last frame"
                );
            })
        }
    };

    if let Err(e) = result {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}
