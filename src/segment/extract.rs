use rayon::prelude::*;

use crate::{
    foundation::core::{PixelRect, Point, Rect, Shape as _},
    foundation::error::{AutorigError, AutorigResult},
    raster::buffer::RasterBuffer,
    rig::{
        layer::{Layer, SourceRegion},
        layer_type::LayerType,
    },
    segment::{
        keypoints::KeypointPath,
        mask::CharacterMask,
        parts::{PartSegmentation, part_classes},
        regions::{Region, RegionTable},
    },
};

/// Tuning for layer extraction.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExtractOpts {
    /// Width of the linear alpha ramp at region edges, in pixels. `0` disables the fade.
    pub fade_px: f64,
    /// Padding added around keypoint bounds, in pixels.
    pub keypoint_padding: f64,
    /// Draw keypoint outlines with quadratic smoothing through interior vertices.
    pub smooth_keypoints: bool,
}

impl Default for ExtractOpts {
    fn default() -> Self {
        Self {
            fade_px: 10.0,
            keypoint_padding: 20.0,
            smooth_keypoints: false,
        }
    }
}

/// Cuts one full-size layer per call out of the source image.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayerExtractor {
    opts: ExtractOpts,
}

impl LayerExtractor {
    /// Extractor with explicit options.
    pub fn new(opts: ExtractOpts) -> Self {
        Self { opts }
    }

    /// Options in use.
    pub fn opts(&self) -> &ExtractOpts {
        &self.opts
    }

    /// Extract `layer_type` from `image`.
    ///
    /// A keypoint `hint` selects keypoint mode, otherwise the layer comes from the region
    /// table. A path of one or two points selects its padded bounding box. Degenerate input
    /// never errors: the layer is returned with `has_content = false`.
    #[tracing::instrument(skip(self, image, mask, hint), fields(layer = %layer_type))]
    pub fn extract(
        &self,
        image: &RasterBuffer,
        mask: &CharacterMask,
        layer_type: LayerType,
        hint: Option<&KeypointPath>,
    ) -> AutorigResult<Layer> {
        check_mask(image, mask)?;

        let layer = if layer_type == LayerType::Background {
            background(image, mask)?
        } else if mask.is_degenerate() {
            tracing::debug!("no character bounds, layer left empty");
            empty(image, layer_type)?
        } else if let Some(path) = hint {
            self.keypoint_layer(image, layer_type, path)?
        } else {
            match RegionTable::region_for(layer_type, mask.bounds) {
                Region::Inside(rect) => self.region_layer(image, mask, layer_type, rect)?,
                Region::OutsideMask => background(image, mask)?,
            }
        };

        tracing::debug!(has_content = layer.has_content, "layer extracted");
        Ok(layer)
    }

    /// Extract `layer_type` from a part segmentation, keeping pixels whose class belongs to
    /// the type's part group.
    #[tracing::instrument(skip(self, image, parts, mask), fields(layer = %layer_type))]
    pub fn extract_parts(
        &self,
        image: &RasterBuffer,
        mask: &CharacterMask,
        parts: &PartSegmentation,
        layer_type: LayerType,
    ) -> AutorigResult<Layer> {
        check_mask(image, mask)?;
        parts.validate()?;
        if parts.width != image.width() || parts.height != image.height() {
            return Err(AutorigError::validation(format!(
                "part segmentation is {}x{}, image is {}x{}",
                parts.width,
                parts.height,
                image.width(),
                image.height()
            )));
        }
        if layer_type == LayerType::Background {
            return background(image, mask);
        }
        let classes = part_classes(layer_type);
        if mask.is_degenerate() || classes.is_empty() {
            return empty(image, layer_type);
        }

        let w = image.width() as usize;
        let mut out = RasterBuffer::transparent(image.width(), image.height())?;
        out.pixels_mut()
            .par_chunks_mut(w * 4)
            .zip(image.pixels().par_chunks(w * 4))
            .zip(parts.classes.par_chunks(w))
            .for_each(|((dst, src), row_classes)| {
                for (x, class) in row_classes.iter().enumerate() {
                    if classes.contains(class) {
                        dst[x * 4..x * 4 + 4].copy_from_slice(&src[x * 4..x * 4 + 4]);
                    }
                }
            });

        let layer = Layer::new(
            layer_type,
            out,
            SourceRegion::PartClasses {
                classes: classes.to_vec(),
            },
        );
        tracing::debug!(has_content = layer.has_content, "layer extracted");
        Ok(layer)
    }

    fn region_layer(
        &self,
        image: &RasterBuffer,
        mask: &CharacterMask,
        layer_type: LayerType,
        rect: Rect,
    ) -> AutorigResult<Layer> {
        let mut out = RasterBuffer::transparent(image.width(), image.height())?;
        if rect.area() <= 0.0 {
            return Ok(Layer::new(layer_type, out, SourceRegion::Region { rect }));
        }

        let w = image.width() as usize;
        let fade = self.opts.fade_px;
        out.pixels_mut()
            .par_chunks_mut(w * 4)
            .zip(image.pixels().par_chunks(w * 4))
            .zip(mask.mask.par_chunks(w))
            .enumerate()
            .for_each(|(y, ((dst, src), mask_row))| {
                let yf = y as f64;
                if yf < rect.y0 || yf > rect.y1 {
                    return;
                }
                for (x, &m) in mask_row.iter().enumerate() {
                    let xf = x as f64;
                    if m != 255 || xf < rect.x0 || xf > rect.x1 {
                        continue;
                    }
                    let d = (xf - rect.x0)
                        .min(rect.x1 - xf)
                        .min(yf - rect.y0)
                        .min(rect.y1 - yf)
                        .max(0.0);
                    let factor = if fade > 0.0 { (d / fade).min(1.0) } else { 1.0 };
                    let i = x * 4;
                    dst[i..i + 3].copy_from_slice(&src[i..i + 3]);
                    dst[i + 3] = (f64::from(src[i + 3]) * factor).floor() as u8;
                }
            });

        Ok(Layer::new(layer_type, out, SourceRegion::Region { rect }))
    }

    fn keypoint_layer(
        &self,
        image: &RasterBuffer,
        layer_type: LayerType,
        path: &KeypointPath,
    ) -> AutorigResult<Layer> {
        let (w, h) = (image.width(), image.height());
        if path.is_empty() {
            tracing::debug!(
                error = %AutorigError::degenerate("empty keypoint path"),
                "layer left empty"
            );
            let out = RasterBuffer::transparent(w, h)?;
            return Ok(Layer::new(
                layer_type,
                out,
                SourceRegion::Keypoints {
                    points: Vec::new(),
                    bounds: PixelRect::ZERO,
                },
            ));
        }

        let smooth = self.opts.smooth_keypoints;
        let bez = path.to_bez_path(smooth);
        let bounds = path.padded_bounds(smooth, self.opts.keypoint_padding, w, h);
        // A point or a segment has no interior; take its padded box instead.
        let boxed = path.points.len() < 3;
        let scan = if boxed {
            bounds
        } else {
            PixelRect::covering(bez.bounding_box(), w, h)
        };
        let row_bytes = (w as usize) * 4;

        let mut out = RasterBuffer::transparent(w, h)?;
        out.pixels_mut()
            .par_chunks_mut(row_bytes)
            .zip(image.pixels().par_chunks(row_bytes))
            .enumerate()
            .for_each(|(y, (dst, src))| {
                let y = y as u32;
                if y < scan.y || y >= scan.bottom() {
                    return;
                }
                for x in scan.x..scan.right() {
                    let centre = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                    if boxed || bez.contains(centre) {
                        let i = (x as usize) * 4;
                        dst[i..i + 4].copy_from_slice(&src[i..i + 4]);
                    }
                }
            });

        Ok(Layer::new(
            layer_type,
            out,
            SourceRegion::Keypoints {
                points: path.points.clone(),
                bounds,
            },
        ))
    }
}

fn check_mask(image: &RasterBuffer, mask: &CharacterMask) -> AutorigResult<()> {
    let expected = (image.width() as usize) * (image.height() as usize);
    if mask.width != image.width() || mask.height != image.height() || mask.mask.len() != expected
    {
        return Err(AutorigError::validation(format!(
            "mask is {}x{} ({} cells), image is {}x{}",
            mask.width,
            mask.height,
            mask.mask.len(),
            image.width(),
            image.height()
        )));
    }
    Ok(())
}

/// Mask complement at the source's own alpha, no fade.
fn background(image: &RasterBuffer, mask: &CharacterMask) -> AutorigResult<Layer> {
    let mut out = RasterBuffer::transparent(image.width(), image.height())?;
    out.pixels_mut()
        .par_chunks_mut(4)
        .zip(image.pixels().par_chunks(4))
        .zip(mask.mask.par_iter())
        .for_each(|((dst, src), &m)| {
            if m == 0 {
                dst.copy_from_slice(src);
            }
        });
    Ok(Layer::new(LayerType::Background, out, SourceRegion::OutsideMask))
}

fn empty(image: &RasterBuffer, layer_type: LayerType) -> AutorigResult<Layer> {
    let out = RasterBuffer::transparent(image.width(), image.height())?;
    Ok(Layer::new(layer_type, out, SourceRegion::Empty))
}

#[cfg(test)]
#[path = "../../tests/unit/segment/extract.rs"]
mod tests;
