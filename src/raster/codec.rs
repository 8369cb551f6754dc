use std::path::Path;

use anyhow::Context as _;
use image::ImageEncoder as _;

use crate::{foundation::error::AutorigResult, raster::buffer::RasterBuffer};

/// Decode encoded image bytes (PNG, JPEG) into a straight RGBA8 buffer.
pub fn decode_image(bytes: &[u8]) -> AutorigResult<RasterBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    RasterBuffer::new(width, height, rgba.into_raw())
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> AutorigResult<RasterBuffer> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

/// Encode a buffer as PNG bytes. PNG keeps straight RGBA8 verbatim, including the color of
/// fully transparent pixels.
pub fn encode_png(buf: &RasterBuffer) -> AutorigResult<Vec<u8>> {
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(
            buf.pixels(),
            buf.width(),
            buf.height(),
            image::ExtendedColorType::Rgba8,
        )
        .context("encode png")?;
    Ok(out)
}

/// Encode and write a buffer as a PNG file.
pub fn save_png(path: &Path, buf: &RasterBuffer) -> AutorigResult<()> {
    let bytes = encode_png(buf)?;
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/codec.rs"]
mod tests;
