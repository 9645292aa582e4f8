//! Pixel pipeline: packed core pixels in, RGBA display bytes out.

pub mod present;

use crate::error::HarnessError;

/// Native display width in pixels.
pub const WIDTH: usize = 256;
/// Native display height in pixels.
pub const HEIGHT: usize = 240;
/// Pixels per frame.
pub const PIXELS: usize = WIDTH * HEIGHT;
/// Bytes per decoded pixel (R, G, B, A).
pub const BYTES_PER_PIXEL: usize = 4;

const OPAQUE: u8 = 0xFF;

/// Pack an RGB triple into the core's `0x00RRGGBB` pixel format.
#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Decode one packed pixel into an opaque RGBA quad. Bits above 23 are ignored.
#[inline]
pub const fn decode_pixel(pixel: u32) -> [u8; 4] {
    [
        ((pixel >> 16) & 0xFF) as u8,
        ((pixel >> 8) & 0xFF) as u8,
        (pixel & 0xFF) as u8,
        OPAQUE,
    ]
}

/// Display-ready RGBA bytes for one native-resolution frame.
///
/// Allocated once and overwritten in place by [`decode_frame`] every frame.
#[derive(Clone)]
pub struct DisplaySurface {
    bytes: Vec<u8>,
}

impl DisplaySurface {
    /// A surface of opaque black pixels.
    pub fn new() -> Self {
        let mut bytes = vec![0u8; PIXELS * BYTES_PER_PIXEL];
        for quad in bytes.chunks_exact_mut(BYTES_PER_PIXEL) {
            quad[3] = OPAQUE;
        }
        Self { bytes }
    }

    pub fn width(&self) -> usize {
        WIDTH
    }

    pub fn height(&self) -> usize {
        HEIGHT
    }

    /// Raw RGBA bytes, row-major from the top-left corner.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// RGBA quad at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        let offset = (y * WIDTH + x) * BYTES_PER_PIXEL;
        let quad = &self.bytes[offset..offset + BYTES_PER_PIXEL];
        Some([quad[0], quad[1], quad[2], quad[3]])
    }
}

impl Default for DisplaySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DisplaySurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplaySurface")
            .field("width", &WIDTH)
            .field("height", &HEIGHT)
            .finish_non_exhaustive()
    }
}

/// Decode a core frame into `surface`, in raster order.
///
/// A frame that is not exactly `WIDTH * HEIGHT` pixels is a core contract
/// violation: nothing is written and the error is returned.
pub fn decode_frame(frame: &[u32], surface: &mut DisplaySurface) -> Result<(), HarnessError> {
    if frame.len() != PIXELS {
        return Err(HarnessError::FrameBufferLength {
            expected: PIXELS,
            actual: frame.len(),
        });
    }

    for (&pixel, quad) in frame
        .iter()
        .zip(surface.bytes.chunks_exact_mut(BYTES_PER_PIXEL))
    {
        quad.copy_from_slice(&decode_pixel(pixel));
    }
    Ok(())
}
