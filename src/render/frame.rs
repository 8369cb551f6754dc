use crate::{
    foundation::error::AutorigResult,
    raster::buffer::{RasterBuffer, byte_len},
};

/// Output surface for one composited frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Row-major RGBA8 bytes.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied; compositing always produces premultiplied frames.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Transparent premultiplied frame.
    pub fn new(width: u32, height: u32) -> AutorigResult<Self> {
        Ok(Self {
            width,
            height,
            data: vec![0; byte_len(width, height)?],
            premultiplied: true,
        })
    }

    /// Fill every pixel with a straight RGBA color.
    pub fn clear(&mut self, rgba: [u8; 4]) {
        let px = premultiply_px(rgba);
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    /// Pixel at `(x, y)` as stored.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Straight-alpha copy, suitable for PNG encoding.
    pub fn to_raster(&self) -> AutorigResult<RasterBuffer> {
        let mut data = self.data.clone();
        if self.premultiplied {
            for px in data.chunks_exact_mut(4) {
                let a = u32::from(px[3]);
                if a == 0 || a == 255 {
                    continue;
                }
                for c in &mut px[..3] {
                    *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
        RasterBuffer::new(self.width, self.height, data)
    }
}

pub(crate) fn premultiply_px(rgba: [u8; 4]) -> [u8; 4] {
    let a = u16::from(rgba[3]);
    let m = |c: u8| crate::foundation::math::mul_div255_u8(u16::from(c), a);
    [m(rgba[0]), m(rgba[1]), m(rgba[2]), rgba[3]]
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
