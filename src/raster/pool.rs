use std::collections::HashMap;

use crate::{
    foundation::core::PixelRect, raster::buffer::RasterBuffer, rig::layer::Layer,
};

/// A layer converted once into the compositor's working format.
#[derive(Debug, Clone)]
pub(crate) struct PreparedLayer {
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub(crate) rgba8_premul: Vec<u8>,
    /// Tight box around pixels with non-zero alpha.
    pub(crate) content: PixelRect,
}

impl PreparedLayer {
    fn from_buffer(buf: &RasterBuffer) -> Self {
        let mut rgba8_premul = buf.pixels().to_vec();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Self {
            width: buf.width(),
            height: buf.height(),
            content: alpha_bounds(buf),
            rgba8_premul,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
/// Counters describing what a [`LayerPool`] holds.
pub struct LayerPoolStats {
    /// Number of prepared layers.
    pub prepared_layers: usize,
    /// Total bytes of prepared pixel data.
    pub prepared_bytes: usize,
    /// Layers skipped because they carry no content.
    pub skipped_empty: usize,
}

/// Per-model arena of pre-converted layer buffers, keyed by layer id.
///
/// Built once when a model is handed to the compositor and read on every tick; nothing is
/// re-decoded or re-allocated per frame.
#[derive(Debug, Default)]
pub struct LayerPool {
    idx_by_id: HashMap<String, usize>,
    layers: Vec<PreparedLayer>,
    stats: LayerPoolStats,
}

impl LayerPool {
    /// Prepare every layer that has content.
    pub fn prepare<'a>(layers: impl IntoIterator<Item = &'a Layer>) -> Self {
        let mut pool = Self::default();
        for layer in layers {
            if !layer.has_content {
                pool.stats.skipped_empty += 1;
                continue;
            }
            let prepared = PreparedLayer::from_buffer(&layer.buffer);
            pool.stats.prepared_layers += 1;
            pool.stats.prepared_bytes += prepared.rgba8_premul.len();
            pool.idx_by_id.insert(layer.id.clone(), pool.layers.len());
            pool.layers.push(prepared);
        }
        pool
    }

    pub(crate) fn get(&self, id: &str) -> Option<&PreparedLayer> {
        self.idx_by_id.get(id).map(|&i| &self.layers[i])
    }

    /// True when a layer with this id was prepared.
    pub fn contains(&self, id: &str) -> bool {
        self.idx_by_id.contains_key(id)
    }

    /// Snapshot of pool counters.
    pub fn stats(&self) -> LayerPoolStats {
        self.stats.clone()
    }
}

fn alpha_bounds(buf: &RasterBuffer) -> PixelRect {
    let w = buf.width() as usize;
    let mut min = (u32::MAX, u32::MAX);
    let mut max = (0u32, 0u32);
    let mut any = false;
    for (i, px) in buf.pixels().chunks_exact(4).enumerate() {
        if px[3] == 0 {
            continue;
        }
        let x = (i % w) as u32;
        let y = (i / w) as u32;
        min = (min.0.min(x), min.1.min(y));
        max = (max.0.max(x), max.1.max(y));
        any = true;
    }
    if !any {
        return PixelRect::ZERO;
    }
    PixelRect::from_inclusive(min.0, min.1, max.0, max.1)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/pool.rs"]
mod tests;
