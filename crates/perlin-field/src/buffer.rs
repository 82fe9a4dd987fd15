#![forbid(unsafe_code)]

//! RGBA8 pixel buffers.
//!
//! [`PixelBuffer`] is a flat row-major byte array laid out per [`Channel`].
//! [`FrameBuffers`] pairs two of them so the presented frame stays intact
//! while the next frame is rendered; `swap` just flips an index.

/// Byte offset of each channel inside one pixel, plus the pixel stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel;

impl Channel {
    pub const RED: usize = 0;
    pub const GREEN: usize = 1;
    pub const BLUE: usize = 2;
    pub const ALPHA: usize = 3;
    pub const STRIDE: usize = 4;
}

/// Fully opaque alpha.
pub const OPAQUE: u8 = 255;

/// Row-major RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    bytes: Vec<u8>,
}

impl PixelBuffer {
    /// Zeroed buffer of `width x height` pixels.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bytes: vec![0; width * height * Channel::STRIDE],
        }
    }

    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Bytes per pixel row.
    #[inline]
    pub const fn row_len(&self) -> usize {
        self.width * Channel::STRIDE
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Overwrite every byte, e.g. with a sentinel before a coverage check.
    pub fn fill(&mut self, byte: u8) {
        self.bytes.fill(byte);
    }

    /// RGBA at pixel `(x, y)`, or `None` outside the buffer.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = (y * self.width + x) * Channel::STRIDE;
        Some([
            self.bytes[at + Channel::RED],
            self.bytes[at + Channel::GREEN],
            self.bytes[at + Channel::BLUE],
            self.bytes[at + Channel::ALPHA],
        ])
    }

    #[inline]
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            width: self.width,
            height: self.height,
            pixels: &self.bytes,
        }
    }
}

/// Write an opaque gray value into one pixel's `Channel::STRIDE` bytes.
#[inline]
pub fn put_gray(px: &mut [u8], intensity: u8) {
    px[Channel::RED] = intensity;
    px[Channel::GREEN] = intensity;
    px[Channel::BLUE] = intensity;
    px[Channel::ALPHA] = OPAQUE;
}

/// Borrowed, read-only view of a completed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameView<'a> {
    pub width: usize,
    pub height: usize,
    /// RGBA8, `width * height * 4` bytes.
    pub pixels: &'a [u8],
}

impl FrameView<'_> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGBA at pixel `(x, y)`, or `None` outside the frame.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = (y * self.width + x) * Channel::STRIDE;
        let px = self.pixels.get(at..at + Channel::STRIDE)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Front/back buffer pair.
#[derive(Debug, Clone)]
pub struct FrameBuffers {
    buffers: [PixelBuffer; 2],
    front: usize,
}

impl FrameBuffers {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffers: [
                PixelBuffer::new(width, height),
                PixelBuffer::new(width, height),
            ],
            front: 0,
        }
    }

    /// The last completed frame.
    #[inline]
    pub fn front(&self) -> &PixelBuffer {
        &self.buffers[self.front]
    }

    /// The buffer the next frame renders into.
    #[inline]
    pub fn back_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffers[1 - self.front]
    }

    /// Promote the back buffer to front.
    #[inline]
    pub fn swap(&mut self) {
        self.front = 1 - self.front;
    }
}
