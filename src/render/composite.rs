use rayon::prelude::*;

use crate::{
    foundation::core::{Affine, PixelRect, Point},
    foundation::math::{mul_div255_u8, unit_to_u8},
    raster::pool::PreparedLayer,
    render::frame::FrameRGBA,
};

pub(crate) type PremulRgba8 = [u8; 4];

/// Source-over of a premultiplied pixel scaled by an 8-bit opacity.
pub(crate) fn premul_over_px(dst: PremulRgba8, src: PremulRgba8, op: u16) -> PremulRgba8 {
    if op == 0 || src[3] == 0 {
        return dst;
    }
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for c in 0..3 {
        let sc = mul_div255_u8(u16::from(src[c]), op);
        out[c] = sc.saturating_add(mul_div255_u8(u16::from(dst[c]), inv));
    }
    out
}

pub(crate) fn sample_px(src: &[u8], width: u32, height: u32, x: i64, y: i64) -> PremulRgba8 {
    if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
        return [0, 0, 0, 0];
    }
    let idx = ((y as usize) * (width as usize) + (x as usize)) * 4;
    [src[idx], src[idx + 1], src[idx + 2], src[idx + 3]]
}

/// Draw `layer` onto `dst` through `affine` (layer space to frame space) with nearest sampling.
///
/// Returns `false` when nothing was drawn because the affine is singular or the opacity is zero.
pub(crate) fn draw_layer(
    dst: &mut FrameRGBA,
    layer: &PreparedLayer,
    affine: Affine,
    opacity: f64,
) -> bool {
    let op = unit_to_u8(opacity);
    if op == 0 || layer.content.is_degenerate() {
        return false;
    }

    if affine == Affine::IDENTITY {
        blit(dst, layer, op);
        return true;
    }

    let det = affine.determinant();
    if !det.is_finite() || det.abs() < 1e-12 {
        return false;
    }
    let inv = affine.inverse();
    let area = PixelRect::covering(
        affine.transform_rect_bbox(layer.content.to_rect()),
        dst.width,
        dst.height,
    );
    if area.is_degenerate() {
        return true;
    }

    let row_bytes = (dst.width as usize) * 4;
    let (x0, x1) = (area.x as usize, area.right() as usize);
    dst.data
        .par_chunks_mut(row_bytes)
        .enumerate()
        .skip(area.y as usize)
        .take(area.height as usize)
        .for_each(|(y, row)| {
            for x in x0..x1 {
                let p = inv * Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let s = sample_px(
                    &layer.rgba8_premul,
                    layer.width,
                    layer.height,
                    p.x.floor() as i64,
                    p.y.floor() as i64,
                );
                if s[3] == 0 {
                    continue;
                }
                let i = x * 4;
                let d = [row[i], row[i + 1], row[i + 2], row[i + 3]];
                row[i..i + 4].copy_from_slice(&premul_over_px(d, s, op));
            }
        });
    true
}

/// Untransformed copy over the layer's content box.
fn blit(dst: &mut FrameRGBA, layer: &PreparedLayer, op: u16) {
    let area = PixelRect::covering(
        layer.content.to_rect(),
        dst.width.min(layer.width),
        dst.height.min(layer.height),
    );
    let dst_row = (dst.width as usize) * 4;
    let src_row = (layer.width as usize) * 4;
    for y in area.y..area.bottom() {
        let d0 = (y as usize) * dst_row;
        let s0 = (y as usize) * src_row;
        for x in area.x as usize..area.right() as usize {
            let (di, si) = (d0 + x * 4, s0 + x * 4);
            let s = &layer.rgba8_premul[si..si + 4];
            if s[3] == 0 {
                continue;
            }
            let d = [dst.data[di], dst.data[di + 1], dst.data[di + 2], dst.data[di + 3]];
            let out = premul_over_px(d, [s[0], s[1], s[2], s[3]], op);
            dst.data[di..di + 4].copy_from_slice(&out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
