use crate::{
    foundation::core::{PixelRect, Rect},
    foundation::error::AutorigResult,
    rig::layer_type::LayerType,
};

/// Area a layer type selects, relative to the character bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Region {
    /// A rectangle in image pixels. Zero-area when the bounds were degenerate.
    Inside(Rect),
    /// Everything the character mask marks as background.
    OutsideMask,
}

/// Fractional placement `(x, y, width, height)` of a region inside the character bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionFractions {
    /// Left offset as a fraction of bounds width.
    pub x: f64,
    /// Top offset as a fraction of bounds height.
    pub y: f64,
    /// Width as a fraction of bounds width.
    pub w: f64,
    /// Height as a fraction of bounds height.
    pub h: f64,
}

const fn frac(x: f64, y: f64, w: f64, h: f64) -> Option<RegionFractions> {
    Some(RegionFractions { x, y, w, h })
}

/// Fixed layer-type → proportional rectangle table.
pub struct RegionTable;

impl RegionTable {
    /// Fractions for `t`, or `None` for the background, which is the mask complement.
    ///
    /// Left/right refer to the character, so `left_*` sits on the image's right half.
    pub fn fractions(t: LayerType) -> Option<RegionFractions> {
        match t {
            LayerType::Background => None,
            LayerType::Body => frac(0.2, 0.35, 0.6, 0.65),
            LayerType::Torso => frac(0.2, 0.35, 0.6, 0.35),
            LayerType::Head => frac(0.15, 0.0, 0.7, 0.4),
            LayerType::Face => frac(0.25, 0.1, 0.5, 0.25),
            LayerType::Eyes => frac(0.3, 0.12, 0.4, 0.08),
            LayerType::LeftEye => frac(0.5, 0.12, 0.2, 0.08),
            LayerType::RightEye => frac(0.3, 0.12, 0.2, 0.08),
            LayerType::AnimeEyes => frac(0.28, 0.1, 0.44, 0.12),
            LayerType::Nose => frac(0.42, 0.17, 0.16, 0.06),
            LayerType::Mouth => frac(0.35, 0.22, 0.3, 0.06),
            LayerType::HairFront => frac(0.1, 0.0, 0.8, 0.25),
            LayerType::HairBack => frac(0.05, 0.0, 0.9, 0.3),
            LayerType::Arms => frac(0.0, 0.3, 1.0, 0.45),
            LayerType::LeftArm => frac(0.75, 0.3, 0.25, 0.45),
            LayerType::RightArm => frac(0.0, 0.3, 0.25, 0.45),
            LayerType::LeftLeg => frac(0.5, 0.65, 0.3, 0.35),
            LayerType::RightLeg => frac(0.2, 0.65, 0.3, 0.35),
            LayerType::Accessories => frac(0.0, 0.0, 1.0, 0.15),
        }
    }

    /// Region for `t` relative to `bounds`.
    pub fn region_for(t: LayerType, bounds: PixelRect) -> Region {
        let Some(f) = Self::fractions(t) else {
            return Region::OutsideMask;
        };
        if bounds.is_degenerate() {
            return Region::Inside(Rect::new(0.0, 0.0, 0.0, 0.0));
        }
        let bw = f64::from(bounds.width);
        let bh = f64::from(bounds.height);
        let x0 = f64::from(bounds.x) + bw * f.x;
        let y0 = f64::from(bounds.y) + bh * f.y;
        Region::Inside(Rect::new(x0, y0, x0 + bw * f.w, y0 + bh * f.h))
    }

    /// [`RegionTable::region_for`] keyed by a layer type name.
    pub fn region_for_name(name: &str, bounds: PixelRect) -> AutorigResult<Region> {
        Ok(Self::region_for(name.parse()?, bounds))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/segment/regions.rs"]
mod tests;
