//! PNG snapshots of the display surface.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use harness_core::video::DisplaySurface;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScreenshotError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Encode(#[from] png::EncodingError),
}

/// Write `surface` as an 8-bit RGBA PNG at native resolution.
pub fn write_png(path: &Path, surface: &DisplaySurface) -> Result<(), ScreenshotError> {
    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(
        BufWriter::new(file),
        surface.width() as u32,
        surface.height() as u32,
    );
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(surface.as_bytes())?;
    writer.finish()?;
    Ok(())
}

/// File name for a screenshot taken at `frame`.
pub fn screenshot_path(dir: &Path, frame: u64) -> PathBuf {
    dir.join(format!("harness-{frame:06}.png"))
}
