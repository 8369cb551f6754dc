use rayon::prelude::*;

use crate::{foundation::core::PixelRect, raster::buffer::RasterBuffer};

/// Tuning for foreground/background separation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MaskOpts {
    /// Side of the square block averaged at each image corner.
    pub corner_sample: u32,
    /// Manhattan RGB distance below which a pixel matches a background reference.
    pub threshold: u32,
    /// Foreground pixels with fewer foreground 8-neighbours than this are dropped.
    pub min_neighbors: u32,
}

impl Default for MaskOpts {
    fn default() -> Self {
        Self {
            corner_sample: 10,
            threshold: 60,
            min_neighbors: 5,
        }
    }
}

/// Binary character-vs-background mask with its tight bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterMask {
    /// Mask width, equal to the source image width.
    pub width: u32,
    /// Mask height, equal to the source image height.
    pub height: u32,
    /// One byte per pixel, `0` background or `255` foreground.
    pub mask: Vec<u8>,
    /// Tight box around all foreground cells, or [`PixelRect::ZERO`] when there are none.
    pub bounds: PixelRect,
}

impl CharacterMask {
    /// True when no character was detected.
    pub fn is_degenerate(&self) -> bool {
        self.bounds.is_degenerate()
    }

    /// Foreground test; out-of-range coordinates are background.
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.mask[(y as usize) * (self.width as usize) + (x as usize)] == 255
    }

    /// Count of foreground cells.
    pub fn foreground_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m == 255).count()
    }
}

/// Derives a [`CharacterMask`] by matching pixels against corner-sampled background colors.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaskBuilder {
    opts: MaskOpts,
}

impl MaskBuilder {
    /// Builder with explicit options.
    pub fn new(opts: MaskOpts) -> Self {
        Self { opts }
    }

    /// Classify, clean up, and bound. Never fails; an image without foreground (or with zero
    /// size) yields a degenerate mask.
    #[tracing::instrument(skip(self, image), fields(w = image.width(), h = image.height()))]
    pub fn build(&self, image: &RasterBuffer) -> CharacterMask {
        let (w, h) = (image.width(), image.height());
        if image.is_empty() {
            return CharacterMask {
                width: w,
                height: h,
                mask: Vec::new(),
                bounds: PixelRect::ZERO,
            };
        }

        let refs = corner_colors(image, self.opts.corner_sample);
        let classified = classify(image, &refs, self.opts.threshold);
        let mask = remove_speckles(&classified, w, h, self.opts.min_neighbors);
        let bounds = foreground_bounds(&mask, w, h);

        tracing::debug!(?bounds, "character mask built");
        CharacterMask {
            width: w,
            height: h,
            mask,
            bounds,
        }
    }
}

/// Average RGB of an N×N block anchored at each corner, clamped to the image.
fn corner_colors(image: &RasterBuffer, sample: u32) -> [[u8; 3]; 4] {
    let (w, h) = (image.width(), image.height());
    let sw = sample.clamp(1, w);
    let sh = sample.clamp(1, h);
    let origins = [(0, 0), (w - sw, 0), (0, h - sh), (w - sw, h - sh)];

    origins.map(|(ox, oy)| {
        let mut sum = [0u64; 3];
        for y in oy..oy + sh {
            for x in ox..ox + sw {
                let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
                let px = &image.pixels()[idx..idx + 3];
                for c in 0..3 {
                    sum[c] += u64::from(px[c]);
                }
            }
        }
        let n = u64::from(sw) * u64::from(sh);
        sum.map(|s| ((s + n / 2) / n) as u8)
    })
}

fn classify(image: &RasterBuffer, refs: &[[u8; 3]; 4], threshold: u32) -> Vec<u8> {
    let w = image.width() as usize;
    let mut mask = vec![0u8; w * image.height() as usize];
    mask.par_chunks_mut(w)
        .zip(image.pixels().par_chunks(w * 4))
        .for_each(|(row, src)| {
            for (m, px) in row.iter_mut().zip(src.chunks_exact(4)) {
                let is_bg = refs.iter().any(|r| {
                    let d = px[0].abs_diff(r[0]) as u32
                        + px[1].abs_diff(r[1]) as u32
                        + px[2].abs_diff(r[2]) as u32;
                    d < threshold
                });
                *m = if is_bg { 0 } else { 255 };
            }
        });
    mask
}

/// One erosion-only pass over a snapshot: drops isolated foreground, never adds any.
fn remove_speckles(src: &[u8], w: u32, h: u32, min_neighbors: u32) -> Vec<u8> {
    let (wi, hi) = (w as i64, h as i64);
    let fg = |x: i64, y: i64| {
        x >= 0 && y >= 0 && x < wi && y < hi && src[(y * wi + x) as usize] == 255
    };

    let mut out = src.to_vec();
    out.par_chunks_mut(w as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as i64;
            for (x, m) in row.iter_mut().enumerate() {
                if *m != 255 {
                    continue;
                }
                let x = x as i64;
                let mut n = 0u32;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if (dx != 0 || dy != 0) && fg(x + dx, y + dy) {
                            n += 1;
                        }
                    }
                }
                if n < min_neighbors {
                    *m = 0;
                }
            }
        });
    out
}

fn foreground_bounds(mask: &[u8], w: u32, h: u32) -> PixelRect {
    let mut min = (u32::MAX, u32::MAX);
    let mut max = (0u32, 0u32);
    let mut any = false;
    for y in 0..h {
        let row = &mask[(y as usize) * (w as usize)..(y as usize + 1) * (w as usize)];
        let Some(first) = row.iter().position(|&m| m == 255) else {
            continue;
        };
        let last = row.iter().rposition(|&m| m == 255).unwrap_or(first);
        min = (min.0.min(first as u32), min.1.min(y));
        max = (max.0.max(last as u32), max.1.max(y));
        any = true;
    }
    if !any {
        return PixelRect::ZERO;
    }
    PixelRect::from_inclusive(min.0, min.1, max.0, max.1)
}

#[cfg(test)]
#[path = "../../tests/unit/segment/mask.rs"]
mod tests;
