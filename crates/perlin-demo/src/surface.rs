#![forbid(unsafe_code)]

//! Presentation surfaces.
//!
//! A [`Surface`] receives each completed frame. The ANSI surface samples the
//! RGBA frame down to terminal cells, two pixels per cell (upper half-block
//! foreground, lower half-block background).

use std::io::{self, Write};

use perlin_field::{Channel, FrameView};

const HOME: &[u8] = b"\x1b[H";
const CLEAR: &[u8] = b"\x1b[2J";
const RESET: &[u8] = b"\x1b[0m";
const UPPER_HALF: &str = "\u{2580}";

pub trait Surface {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    /// Present one completed frame.
    fn present(&mut self, frame: FrameView<'_>) -> io::Result<()>;
}

/// Discards frames, keeping a count and a checksum of the last one.
#[derive(Debug, Clone, Default)]
pub struct NullSurface {
    presented: u64,
    last_checksum: u64,
}

impl NullSurface {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// FNV-1a over the RGBA bytes of the last presented frame.
    #[inline]
    pub fn last_checksum(&self) -> u64 {
        self.last_checksum
    }
}

impl Surface for NullSurface {
    fn name(&self) -> &'static str {
        "null"
    }

    fn present(&mut self, frame: FrameView<'_>) -> io::Result<()> {
        self.presented += 1;
        self.last_checksum = fnv1a(frame.pixels);
        Ok(())
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}

/// Truecolor half-block renderer writing to any [`Write`].
#[derive(Debug)]
pub struct AnsiSurface<W: Write> {
    out: W,
    cols: usize,
    rows: usize,
    scratch: Vec<u8>,
    cleared: bool,
}

impl<W: Write> AnsiSurface<W> {
    /// Surface of `cols x rows` terminal cells (`cols x 2*rows` pixels).
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            cols: cols as usize,
            rows: rows as usize,
            scratch: Vec::new(),
            cleared: false,
        }
    }

    /// Reset attributes and hand back the writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.write_all(RESET)?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn encode(&mut self, frame: FrameView<'_>) -> io::Result<()> {
        let buf = &mut self.scratch;
        buf.clear();
        if !self.cleared {
            buf.extend_from_slice(CLEAR);
        }
        buf.extend_from_slice(HOME);

        let px_rows = self.rows * 2;
        for row in 0..self.rows {
            let top_y = (2 * row * frame.height) / px_rows;
            let bottom_y = ((2 * row + 1) * frame.height) / px_rows;
            for col in 0..self.cols {
                let x = (col * frame.width) / self.cols;
                let top = sample(frame, x, top_y);
                let bottom = sample(frame, x, bottom_y);
                write!(
                    buf,
                    "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{UPPER_HALF}",
                    top[0], top[1], top[2], bottom[0], bottom[1], bottom[2]
                )?;
            }
            buf.extend_from_slice(RESET);
            if row + 1 < self.rows {
                buf.extend_from_slice(b"\r\n");
            }
        }
        Ok(())
    }
}

impl<W: Write> Surface for AnsiSurface<W> {
    fn name(&self) -> &'static str {
        "ansi"
    }

    fn present(&mut self, frame: FrameView<'_>) -> io::Result<()> {
        if frame.is_empty() || self.cols == 0 || self.rows == 0 {
            return Ok(());
        }
        self.encode(frame)?;
        self.out.write_all(&self.scratch)?;
        self.out.flush()?;
        self.cleared = true;
        Ok(())
    }
}

#[inline]
fn sample(frame: FrameView<'_>, x: usize, y: usize) -> [u8; 3] {
    let at = (y * frame.width + x) * Channel::STRIDE;
    [
        frame.pixels[at + Channel::RED],
        frame.pixels[at + Channel::GREEN],
        frame.pixels[at + Channel::BLUE],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_frame(width: usize, height: usize, value: u8) -> Vec<u8> {
        let mut px = Vec::with_capacity(width * height * Channel::STRIDE);
        for _ in 0..width * height {
            px.extend_from_slice(&[value, value, value, 255]);
        }
        px
    }

    #[test]
    fn null_surface_counts_and_checksums() {
        let pixels = gray_frame(2, 2, 10);
        let frame = FrameView {
            width: 2,
            height: 2,
            pixels: &pixels,
        };
        let mut surface = NullSurface::new();
        surface.present(frame).unwrap();
        surface.present(frame).unwrap();
        assert_eq!(surface.presented(), 2);
        assert_eq!(surface.last_checksum(), fnv1a(&pixels));
        assert_ne!(surface.last_checksum(), fnv1a(&gray_frame(2, 2, 11)));
    }

    #[test]
    fn ansi_surface_emits_one_cell_per_column_and_row() {
        let pixels = gray_frame(8, 8, 200);
        let frame = FrameView {
            width: 8,
            height: 8,
            pixels: &pixels,
        };
        let mut surface = AnsiSurface::new(Vec::new(), 4, 3);
        surface.present(frame).unwrap();
        let out = String::from_utf8(surface.finish().unwrap()).unwrap();
        assert!(out.starts_with("\x1b[2J\x1b[H"));
        assert_eq!(out.matches(UPPER_HALF).count(), 12);
        assert_eq!(out.matches("\r\n").count(), 2);
        assert!(out.contains("\x1b[38;2;200;200;200m\x1b[48;2;200;200;200m"));
    }

    #[test]
    fn ansi_surface_clears_only_once() {
        let pixels = gray_frame(2, 2, 0);
        let frame = FrameView {
            width: 2,
            height: 2,
            pixels: &pixels,
        };
        let mut surface = AnsiSurface::new(Vec::new(), 2, 1);
        surface.present(frame).unwrap();
        surface.present(frame).unwrap();
        let out = String::from_utf8(surface.finish().unwrap()).unwrap();
        assert_eq!(out.matches("\x1b[2J").count(), 1);
        assert_eq!(out.matches("\x1b[H").count(), 2);
    }

    #[test]
    fn ansi_surface_skips_empty_frames() {
        let frame = FrameView {
            width: 0,
            height: 0,
            pixels: &[],
        };
        let mut surface = AnsiSurface::new(Vec::new(), 10, 5);
        surface.present(frame).unwrap();
        let out = surface.finish().unwrap();
        assert_eq!(out, RESET);
    }

    #[test]
    fn ansi_surface_samples_top_and_bottom_halves() {
        // 1x2 frame: top pixel black, bottom pixel white.
        let pixels = vec![0, 0, 0, 255, 255, 255, 255, 255];
        let frame = FrameView {
            width: 1,
            height: 2,
            pixels: &pixels,
        };
        let mut surface = AnsiSurface::new(Vec::new(), 1, 1);
        surface.present(frame).unwrap();
        let out = String::from_utf8(surface.finish().unwrap()).unwrap();
        assert!(out.contains("\x1b[38;2;0;0;0m\x1b[48;2;255;255;255m"));
    }
}
