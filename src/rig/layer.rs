use crate::{
    foundation::core::{PixelRect, Point, Rect},
    raster::buffer::RasterBuffer,
    rig::layer_type::LayerType,
};

/// Where a layer's pixels were selected from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SourceRegion {
    /// Proportional rectangle from the region table.
    Region {
        /// Region in image pixels.
        rect: Rect,
    },
    /// Complement of the character mask.
    OutsideMask,
    /// Closed keypoint path.
    Keypoints {
        /// Path vertices in order.
        points: Vec<Point>,
        /// Keypoint bbox padded and clamped to the image.
        bounds: PixelRect,
    },
    /// Per-pixel part classes from a segmentation detector.
    PartClasses {
        /// Class ids that were kept.
        classes: Vec<i32>,
    },
    /// Nothing was selected (degenerate input).
    Empty,
}

/// One independently maskable raster region of the character.
///
/// The buffer always has the source image's full size so that every layer shares one
/// coordinate system.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Stable identifier, `"<type>_layer"`.
    pub id: String,
    /// Which part this layer represents.
    pub layer_type: LayerType,
    /// Painter's order.
    pub z_index: i32,
    /// Full-size straight RGBA8 pixels.
    pub buffer: RasterBuffer,
    /// False when no pixel kept non-zero alpha; such layers are never drawn.
    pub has_content: bool,
    /// Selection that produced the pixels.
    pub source: SourceRegion,
}

impl Layer {
    /// Build a layer with the type's default id and z-index; `has_content` is derived from
    /// the buffer.
    pub fn new(layer_type: LayerType, buffer: RasterBuffer, source: SourceRegion) -> Self {
        let has_content = buffer.has_visible_pixels();
        Self {
            id: layer_type.layer_id(),
            layer_type,
            z_index: layer_type.default_z_index(),
            buffer,
            has_content,
            source,
        }
    }

    /// Same as [`Layer::new`] but with an explicit z-index.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}
