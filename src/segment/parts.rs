use crate::{
    foundation::error::{AutorigError, AutorigResult},
    rig::layer_type::LayerType,
};

/// Per-pixel body-part classes from a part segmentation detector.
///
/// Class `-1` marks pixels that belong to no part.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PartSegmentation {
    /// Width of the class map.
    pub width: u32,
    /// Height of the class map.
    pub height: u32,
    /// Row-major class ids, one per pixel.
    pub classes: Vec<i32>,
}

impl PartSegmentation {
    /// Validated class map.
    pub fn new(width: u32, height: u32, classes: Vec<i32>) -> AutorigResult<Self> {
        let seg = Self {
            width,
            height,
            classes,
        };
        seg.validate()?;
        Ok(seg)
    }

    /// Check that the class array matches the declared size.
    pub fn validate(&self) -> AutorigResult<()> {
        let expected = (self.width as usize) * (self.height as usize);
        if self.classes.len() != expected {
            return Err(AutorigError::validation(format!(
                "part segmentation has {} classes, expected {}x{}={expected}",
                self.classes.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    /// Class at a pixel, `-1` out of range.
    pub fn class_at(&self, x: u32, y: u32) -> i32 {
        if x >= self.width || y >= self.height {
            return -1;
        }
        self.classes[(y as usize) * (self.width as usize) + (x as usize)]
    }
}

const HEAD: &[i32] = &[0, 1];
const LEFT_ARM: &[i32] = &[2, 3, 6, 7, 10];
const RIGHT_ARM: &[i32] = &[4, 5, 8, 9, 11];
const ARMS: &[i32] = &[2, 3, 4, 5, 6, 7, 8, 9, 10, 11];
const TORSO: &[i32] = &[12, 13];
const LEFT_LEG: &[i32] = &[14, 15, 18, 19, 22];
const RIGHT_LEG: &[i32] = &[16, 17, 20, 21, 23];

/// Class ids that make up a layer type, empty when the detector has no such part.
pub fn part_classes(layer_type: LayerType) -> &'static [i32] {
    match layer_type {
        LayerType::Head => HEAD,
        LayerType::LeftArm => LEFT_ARM,
        LayerType::RightArm => RIGHT_ARM,
        LayerType::Arms => ARMS,
        LayerType::Torso | LayerType::Body => TORSO,
        LayerType::LeftLeg => LEFT_LEG,
        LayerType::RightLeg => RIGHT_LEG,
        _ => &[],
    }
}
