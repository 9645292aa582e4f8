//! Presentation of decoded frames onto a visible (or recorded) surface.

use super::{BYTES_PER_PIXEL, DisplaySurface, HEIGHT, WIDTH};
use crate::error::HostError;

/// Integer upscale applied when presenting.
pub const DEFAULT_SCALE: u32 = 2;

/// Largest accepted scale factor.
pub const MAX_SCALE: u32 = 8;

/// A destination for decoded frames.
///
/// Implementations copy the surface at native resolution and then draw it
/// enlarged by an integer factor with nearest-neighbour sampling, so pixel
/// edges stay sharp.
pub trait Presenter {
    fn present(&mut self, surface: &DisplaySurface) -> Result<(), HostError>;
}

/// Accept scale factors in `1..=MAX_SCALE`.
pub fn validate_scale(scale: u32) -> Result<u32, HostError> {
    if (1..=MAX_SCALE).contains(&scale) {
        Ok(scale)
    } else {
        Err(HostError::InvalidScale(scale))
    }
}

/// Nearest-neighbour enlargement of an RGBA image by an integer factor.
///
/// `dst` must hold exactly `width * scale * height * scale * 4` bytes.
pub fn upscale_nearest(
    src: &[u8],
    width: usize,
    height: usize,
    scale: usize,
    dst: &mut [u8],
) -> Result<(), HostError> {
    let src_len = width * height * BYTES_PER_PIXEL;
    let dst_len = src_len * scale * scale;
    if scale == 0 || src.len() != src_len || dst.len() != dst_len {
        return Err(HostError::Present(format!(
            "cannot scale {}-byte {width}x{height} image by {scale} into {} bytes",
            src.len(),
            dst.len()
        )));
    }

    let src_stride = width * BYTES_PER_PIXEL;
    let dst_stride = src_stride * scale;
    for (y, src_row) in src.chunks_exact(src_stride).enumerate() {
        let first = y * scale * dst_stride;
        let dst_row = &mut dst[first..first + dst_stride];
        for (quad, block) in src_row
            .chunks_exact(BYTES_PER_PIXEL)
            .zip(dst_row.chunks_exact_mut(BYTES_PER_PIXEL * scale))
        {
            for out in block.chunks_exact_mut(BYTES_PER_PIXEL) {
                out.copy_from_slice(quad);
            }
        }
        // Remaining rows of the block repeat the first one.
        for rep in 1..scale {
            let start = first + rep * dst_stride;
            dst.copy_within(first..first + dst_stride, start);
        }
    }
    Ok(())
}

/// Off-screen presenter that keeps the last frame in memory.
///
/// Used for headless runs and tests: `native()` is the copy at native
/// resolution, `scaled()` the enlarged image a window would show.
pub struct MemoryPresenter {
    scale: u32,
    native: Vec<u8>,
    scaled: Vec<u8>,
    frames_presented: u64,
}

impl MemoryPresenter {
    pub fn new(scale: u32) -> Result<Self, HostError> {
        let scale = validate_scale(scale)?;
        let native_len = WIDTH * HEIGHT * BYTES_PER_PIXEL;
        let factor = scale as usize;
        let scaled_len = factor
            .checked_mul(factor)
            .and_then(|area| area.checked_mul(native_len))
            .ok_or(HostError::InvalidScale(scale))?;
        Ok(Self {
            scale,
            native: vec![0; native_len],
            scaled: vec![0; scaled_len],
            frames_presented: 0,
        })
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn native(&self) -> &[u8] {
        &self.native
    }

    pub fn scaled(&self) -> &[u8] {
        &self.scaled
    }

    /// Dimensions of [`scaled`](Self::scaled) in pixels.
    pub fn scaled_size(&self) -> (u32, u32) {
        (WIDTH as u32 * self.scale, HEIGHT as u32 * self.scale)
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Presenter for MemoryPresenter {
    fn present(&mut self, surface: &DisplaySurface) -> Result<(), HostError> {
        self.native.copy_from_slice(surface.as_bytes());
        upscale_nearest(
            &self.native,
            WIDTH,
            HEIGHT,
            self.scale as usize,
            &mut self.scaled,
        )?;
        self.frames_presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::{PIXELS, decode_frame, pack_rgb};

    #[test]
    fn upscale_replicates_each_pixel_into_a_block() {
        // 2x1 image: red, blue
        let src = [255, 0, 0, 255, 0, 0, 255, 255];
        let mut dst = [0u8; 72]; // 6x3 RGBA
        upscale_nearest(&src, 2, 1, 3, &mut dst).unwrap();

        for row in 0..3 {
            for col in 0..6 {
                let offset = (row * 6 + col) * 4;
                let expected = if col < 3 { &src[0..4] } else { &src[4..8] };
                assert_eq!(&dst[offset..offset + 4], expected, "row {row} col {col}");
            }
        }
    }

    #[test]
    fn upscale_rejects_mismatched_buffers() {
        let src = [0u8; 16];
        let mut dst = [0u8; 10];
        assert!(upscale_nearest(&src, 2, 2, 2, &mut dst).is_err());
        let mut dst = [0u8; 16];
        assert!(upscale_nearest(&src, 2, 2, 0, &mut dst).is_err());
    }

    #[test]
    fn zero_scale_is_rejected() {
        assert!(matches!(
            MemoryPresenter::new(0),
            Err(HostError::InvalidScale(0))
        ));
    }

    #[test]
    fn oversized_scale_is_rejected_not_overflowed() {
        assert!(matches!(
            MemoryPresenter::new(70_000),
            Err(HostError::InvalidScale(70_000))
        ));
        assert!(matches!(
            validate_scale(MAX_SCALE + 1),
            Err(HostError::InvalidScale(9))
        ));
        assert!(matches!(validate_scale(u32::MAX), Err(HostError::InvalidScale(_))));
        assert_eq!(validate_scale(MAX_SCALE).unwrap(), MAX_SCALE);
    }

    #[test]
    fn memory_presenter_keeps_native_and_scaled_copies() {
        let mut frame = vec![0u32; PIXELS];
        frame[0] = pack_rgb(0x12, 0x34, 0x56);
        let mut surface = DisplaySurface::new();
        decode_frame(&frame, &mut surface).unwrap();

        let mut presenter = MemoryPresenter::new(DEFAULT_SCALE).unwrap();
        presenter.present(&surface).unwrap();

        assert_eq!(presenter.frames_presented(), 1);
        assert_eq!(presenter.native(), surface.as_bytes());
        assert_eq!(presenter.scaled_size(), (512, 480));

        let stride = 512 * 4;
        let top_left = [0x12, 0x34, 0x56, 0xFF];
        assert_eq!(&presenter.scaled()[0..4], &top_left);
        assert_eq!(&presenter.scaled()[4..8], &top_left);
        assert_eq!(&presenter.scaled()[stride..stride + 4], &top_left);
        assert_eq!(&presenter.scaled()[stride + 4..stride + 8], &top_left);
        assert_eq!(&presenter.scaled()[8..12], &[0, 0, 0, 0xFF]);
    }
}
