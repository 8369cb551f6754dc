use std::collections::BTreeMap;

use crate::{
    foundation::core::{BezPath, PixelRect, Point, Rect, Shape as _},
    rig::layer_type::LayerType,
};

/// One named pose joint as reported by a pose detector.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keypoint {
    /// Joint name, e.g. `left_shoulder`.
    pub name: String,
    /// X in image pixels.
    pub x: f64,
    /// Y in image pixels.
    pub y: f64,
    /// Detector confidence in `[0, 1]`.
    #[serde(default = "full_confidence", alias = "score")]
    pub confidence: f64,
}

fn full_confidence() -> f64 {
    1.0
}

impl Keypoint {
    /// Position as a point.
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Ordered polygon vertices outlining one part, closed back to the first vertex.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeypointPath {
    /// Vertices in drawing order.
    pub points: Vec<Point>,
}

impl KeypointPath {
    /// Wrap a vertex list.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// True when there is nothing to outline.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closed outline.
    ///
    /// With `smooth`, each interior vertex becomes the control point of a quadratic curve
    /// ending halfway to the next vertex; the last vertex is reached with a straight line.
    pub fn to_bez_path(&self, smooth: bool) -> BezPath {
        let mut path = BezPath::new();
        let Some((&first, rest)) = self.points.split_first() else {
            return path;
        };
        path.move_to(first);
        if smooth && rest.len() >= 2 {
            for pair in rest.windows(2) {
                path.quad_to(pair[0], pair[0].midpoint(pair[1]));
            }
            if let Some(&last) = rest.last() {
                path.line_to(last);
            }
        } else {
            for &p in rest {
                path.line_to(p);
            }
        }
        path.close_path();
        path
    }

    /// Bounding box of the vertices (and smoothing curves), padded and clamped to the image.
    pub fn padded_bounds(&self, smooth: bool, padding: f64, width: u32, height: u32) -> PixelRect {
        if self.is_empty() {
            return PixelRect::ZERO;
        }
        let bbox: Rect = self.to_bez_path(smooth).bounding_box();
        PixelRect::covering(bbox.inflate(padding.max(0.0), padding.max(0.0)), width, height)
    }
}

/// Pose detector output for one character.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeypointSet {
    /// Every reported joint, in detector order.
    #[serde(alias = "keypoints")]
    pub points: Vec<Keypoint>,
}

impl KeypointSet {
    /// Wrap a keypoint list.
    pub fn new(points: Vec<Keypoint>) -> Self {
        Self { points }
    }

    /// Lookup a joint by name, ignoring it below `min_confidence`.
    pub fn get(&self, name: &str, min_confidence: f64) -> Option<&Keypoint> {
        self.points
            .iter()
            .find(|k| k.name == name && k.confidence >= min_confidence)
    }

    /// Joint positions by name, for pivot resolution.
    pub fn joints(&self) -> BTreeMap<String, Point> {
        self.points
            .iter()
            .map(|k| (k.name.clone(), k.point()))
            .collect()
    }

    /// Outline for a layer type built from its pose template.
    ///
    /// `None` when the type has no template or any required joint is missing or below
    /// `min_confidence`.
    pub fn part_path(&self, layer_type: LayerType, min_confidence: f64) -> Option<KeypointPath> {
        let names = pose_template(layer_type)?;
        let points = names
            .iter()
            .map(|n| self.get(n, min_confidence).map(Keypoint::point))
            .collect::<Option<Vec<_>>>()?;
        Some(KeypointPath::new(points))
    }
}

/// Face-mesh landmark ranges that outline facial layers.
const FACE_GROUPS: [(LayerType, std::ops::RangeInclusive<usize>); 4] = [
    (LayerType::RightEye, 33..=42),
    (LayerType::LeftEye, 263..=272),
    (LayerType::Mouth, 61..=91),
    (LayerType::Nose, 1..=5),
];

/// Dense face-mesh landmarks in mesh index order, in image pixels.
///
/// Serialized as a bare array of `{x, y}` points; extra fields such as a depth `z` are ignored.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FaceLandmarks {
    /// Landmark positions indexed by mesh vertex.
    pub points: Vec<Point>,
}

impl FaceLandmarks {
    /// Wrap a landmark list.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Outlines for the eye, mouth and nose layers.
    ///
    /// Indices the mesh does not reach are skipped; a group with none left is omitted.
    pub fn part_paths(&self) -> BTreeMap<LayerType, KeypointPath> {
        FACE_GROUPS
            .iter()
            .filter_map(|(layer_type, range)| {
                let points: Vec<Point> = range
                    .clone()
                    .filter_map(|i| self.points.get(i).copied())
                    .collect();
                (!points.is_empty()).then(|| (*layer_type, KeypointPath::new(points)))
            })
            .collect()
    }
}

/// Joint names outlining a layer type, in path order.
pub fn pose_template(layer_type: LayerType) -> Option<&'static [&'static str]> {
    let names: &'static [&'static str] = match layer_type {
        LayerType::Torso | LayerType::Body => &[
            "left_shoulder",
            "right_shoulder",
            "right_hip",
            "left_hip",
        ],
        LayerType::LeftArm => &["left_shoulder", "left_elbow", "left_wrist"],
        LayerType::RightArm => &["right_shoulder", "right_elbow", "right_wrist"],
        LayerType::LeftLeg => &["left_hip", "left_knee", "left_ankle"],
        LayerType::RightLeg => &["right_hip", "right_knee", "right_ankle"],
        LayerType::Head => &["nose", "left_ear", "right_ear"],
        LayerType::Eyes => &["left_eye", "right_eye"],
        _ => return None,
    };
    Some(names)
}

#[cfg(test)]
#[path = "../../tests/unit/segment/keypoints.rs"]
mod tests;
