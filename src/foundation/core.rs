pub use kurbo::{Affine, BezPath, Point, Rect, Shape, Vec2};

/// Integer pixel rectangle, `x,y` inclusive top-left, `width,height` in pixels.
///
/// A zero-area rect signals "no content".
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// The degenerate rect `(0,0,0,0)`.
    pub const ZERO: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Build a rect from its top-left corner and extent.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build the tight rect covering the inclusive corners `(min_x,min_y)..=(max_x,max_y)`.
    pub fn from_inclusive(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x.saturating_sub(min_x) + 1,
            height: max_y.saturating_sub(min_y) + 1,
        }
    }

    /// True when the rect covers no pixels.
    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    pub fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Pixel-space test, exclusive on the right/bottom edges.
    pub fn contains(self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Convert to a floating-point kurbo rect spanning the same pixels.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }

    /// Smallest pixel rect covering `rect`, clipped to a `width x height` image.
    ///
    /// Returns [`PixelRect::ZERO`] when nothing of `rect` lies inside the image.
    pub fn covering(rect: Rect, width: u32, height: u32) -> Self {
        if !rect.x0.is_finite()
            || !rect.y0.is_finite()
            || !rect.x1.is_finite()
            || !rect.y1.is_finite()
        {
            return Self::ZERO;
        }
        let x0 = rect.x0.floor().clamp(0.0, f64::from(width)) as u32;
        let y0 = rect.y0.floor().clamp(0.0, f64::from(height)) as u32;
        let x1 = rect.x1.ceil().clamp(0.0, f64::from(width)) as u32;
        let y1 = rect.y1.ceil().clamp(0.0, f64::from(height)) as u32;
        if x1 <= x0 || y1 <= y0 {
            return Self::ZERO;
        }
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
