#![forbid(unsafe_code)]

//! Frame loop: measure elapsed time, advance the field, present, wait.
//!
//! The first tick reports 0 ms. A stop request takes effect before the next
//! frame is scheduled; the frame in flight always completes.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use perlin_field::NoiseField;
use tracing::{debug, info};
use web_time::{Duration, Instant};

use crate::surface::Surface;

/// Cloneable flag that ends the loop before the next frame.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What a finished run did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoopSummary {
    pub frames: u64,
    /// Simulated time fed to `advance`, in milliseconds.
    pub elapsed_ms: f64,
    /// Slowest single render pass.
    pub max_render: Duration,
}

#[derive(Debug)]
pub struct FrameLoop {
    field: NoiseField,
    tick: Duration,
    max_frames: u64,
    stop: StopHandle,
}

impl FrameLoop {
    /// Loop over `field` at `tick` cadence; `max_frames == 0` runs until stopped.
    pub fn new(field: NoiseField, tick: Duration, max_frames: u64) -> Self {
        Self {
            field,
            tick,
            max_frames,
            stop: StopHandle::default(),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    #[inline]
    pub fn field(&self) -> &NoiseField {
        &self.field
    }

    /// Advance by `elapsed_ms` and present the result. No waiting.
    pub fn step<S: Surface + ?Sized>(&mut self, elapsed_ms: f64, surface: &mut S) -> io::Result<()> {
        self.field.advance(elapsed_ms);
        surface.present(self.field.frame_buffer())
    }

    /// Run against the wall clock until `max_frames` or a stop request.
    pub fn run<S: Surface + ?Sized>(&mut self, surface: &mut S) -> io::Result<LoopSummary> {
        let (width, height) = self.field.viewport();
        info!(
            width,
            height,
            tick_ms = self.tick.as_millis() as u64,
            max_frames = self.max_frames,
            surface = surface.name(),
            "frame loop: start"
        );

        let mut summary = LoopSummary::default();
        let mut last = Instant::now();
        let mut first = true;

        while !self.stop.is_stopped() {
            let now = Instant::now();
            let elapsed_ms = if first {
                first = false;
                0.0
            } else {
                now.duration_since(last).as_secs_f64() * 1000.0
            };
            last = now;

            self.step(elapsed_ms, surface)?;

            let render = self.field.stats().last_render;
            summary.frames += 1;
            summary.elapsed_ms += elapsed_ms;
            summary.max_render = summary.max_render.max(render);
            debug!(
                frame = summary.frames,
                elapsed_ms,
                render_us = render.as_micros() as u64,
                "frame loop: tick"
            );

            if self.max_frames != 0 && summary.frames >= self.max_frames {
                break;
            }

            let spent = now.elapsed();
            if spent < self.tick {
                thread::sleep(self.tick - spent);
            }
        }

        info!(
            frames = summary.frames,
            elapsed_ms = summary.elapsed_ms,
            max_render_us = summary.max_render.as_micros() as u64,
            "frame loop: done"
        );
        Ok(summary)
    }
}
