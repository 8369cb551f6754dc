use crate::foundation::error::{AutorigError, AutorigResult};

/// Owned straight-alpha RGBA8 pixel buffer, row-major and tightly packed.
///
/// Invariant: `pixels.len() == width * height * 4`.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl std::fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

pub(crate) fn byte_len(width: u32, height: u32) -> AutorigResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| AutorigError::validation("raster size overflow"))
}

impl RasterBuffer {
    /// Wrap existing pixels, checking the length invariant.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> AutorigResult<Self> {
        let expected = byte_len(width, height)?;
        if pixels.len() != expected {
            return Err(AutorigError::validation(format!(
                "raster {width}x{height} expects {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Fully transparent buffer.
    pub fn transparent(width: u32, height: u32) -> AutorigResult<Self> {
        Ok(Self {
            width,
            height,
            pixels: vec![0; byte_len(width, height)?],
        })
    }

    /// Buffer filled with one straight RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> AutorigResult<Self> {
        let len = byte_len(width, height)?;
        let mut pixels = Vec::with_capacity(len);
        for _ in 0..len / 4 {
            pixels.extend_from_slice(&rgba);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True for a zero-size buffer.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw pixel bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable raw pixel bytes. The length cannot change through this view.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consume into raw pixel bytes.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// One pixel, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ])
    }

    /// Overwrite one pixel. Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// True when any pixel has non-zero alpha.
    pub fn has_visible_pixels(&self) -> bool {
        self.pixels.chunks_exact(4).any(|px| px[3] != 0)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
