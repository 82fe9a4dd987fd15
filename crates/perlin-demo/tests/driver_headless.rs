//! Headless end-to-end runs of the frame loop: CLI options in, frames out.

use perlin_demo::cli::{Opts, SurfaceKind};
use perlin_demo::driver::FrameLoop;
use perlin_demo::surface::{AnsiSurface, NullSurface, Surface};
use perlin_field::NoiseField;
use proptest::prelude::*;
use web_time::Duration;

fn opts_from(args: &[&str]) -> Opts {
    Opts::parse_from_env_and_args(args.iter().copied(), |_| None).unwrap()
}

fn loop_from(opts: &Opts) -> FrameLoop {
    let field = NoiseField::with_seed(opts.field_config().unwrap(), opts.seed.unwrap_or(0));
    FrameLoop::new(field, Duration::from_millis(opts.tick_ms), opts.frames)
}

#[test]
fn null_surface_run_from_cli_options() {
    let opts = opts_from(&[
        "--field=4x3",
        "--tile=8",
        "--seed=12",
        "--tick-ms=1",
        "--frames=3",
        "--surface=null",
    ]);
    assert_eq!(opts.surface, SurfaceKind::Null);
    let mut frame_loop = loop_from(&opts);
    let mut surface = NullSurface::new();
    let summary = frame_loop.run(&mut surface).unwrap();
    assert_eq!(summary.frames, 3);
    assert_eq!(surface.presented(), 3);
    assert_eq!(frame_loop.field().viewport(), (32, 24));
}

#[test]
fn ansi_surface_run_writes_every_frame() {
    let opts = opts_from(&["--field=2x2", "--tile=4", "--tick-ms=1", "--frames=2"]);
    let mut frame_loop = loop_from(&opts);
    let mut surface = AnsiSurface::new(Vec::new(), 8, 4);
    frame_loop.run(&mut surface).unwrap();
    let out = String::from_utf8(surface.finish().unwrap()).unwrap();
    assert_eq!(out.matches("\x1b[H").count(), 2);
    assert_eq!(out.matches('\u{2580}').count(), 2 * 8 * 4);
}

#[test]
fn degenerate_field_runs_without_output() {
    let opts = opts_from(&["--field=0x3", "--tick-ms=1", "--frames=2"]);
    let mut frame_loop = loop_from(&opts);
    let mut surface = AnsiSurface::new(Vec::new(), 8, 4);
    let summary = frame_loop.run(&mut surface).unwrap();
    assert_eq!(summary.frames, 2);
    assert!(frame_loop.field().frame_buffer().is_empty());
}

#[test]
fn surfaces_work_as_trait_objects() {
    let opts = opts_from(&["--field=1x1", "--tile=2"]);
    let mut frame_loop = loop_from(&opts);
    let mut surfaces: Vec<Box<dyn Surface>> = vec![
        Box::new(NullSurface::new()),
        Box::new(AnsiSurface::new(Vec::new(), 2, 1)),
    ];
    for surface in &mut surfaces {
        frame_loop.step(16.0, surface.as_mut()).unwrap();
    }
    let names: Vec<_> = surfaces.iter().map(|s| s.name()).collect();
    assert_eq!(names, ["null", "ansi"]);
}

proptest! {
    #[test]
    fn same_seed_same_ticks_same_checksum(
        seed in any::<u64>(),
        ticks in proptest::collection::vec(0.0f64..40.0, 1..6),
    ) {
        let opts = opts_from(&["--field=3x2", "--tile=4"]);
        let config = opts.field_config().unwrap();
        let mut a = FrameLoop::new(NoiseField::with_seed(config, seed), Duration::ZERO, 0);
        let mut b = FrameLoop::new(NoiseField::with_seed(config, seed), Duration::ZERO, 0);
        let mut sa = NullSurface::new();
        let mut sb = NullSurface::new();
        for dt in &ticks {
            a.step(*dt, &mut sa).unwrap();
            b.step(*dt, &mut sb).unwrap();
        }
        prop_assert_eq!(sa.last_checksum(), sb.last_checksum());
    }
}
