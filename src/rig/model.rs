use std::collections::BTreeMap;

use crate::{
    animation::store::AnimationClipStore,
    foundation::config::AutorigConfig,
    foundation::core::Point,
    foundation::error::{AutorigError, AutorigResult},
    raster::buffer::RasterBuffer,
    rig::{layer::Layer, layer_type::LayerType},
    segment::{
        detect::DetectionSummary,
        extract::LayerExtractor,
        keypoints::{FaceLandmarks, KeypointPath, KeypointSet},
        mask::{CharacterMask, MaskBuilder},
        parts::{PartSegmentation, part_classes},
    },
};

/// Minimum confidence for detections and pose joints to count.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

/// Everything external detectors reported for the source image. All parts are optional.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectorInputs {
    /// Category confidences narrowing which layers are planned.
    pub summary: Option<DetectionSummary>,
    /// Pose joints for keypoint outlines and pivots.
    pub pose: Option<KeypointSet>,
    /// Explicit outlines per layer type; these take precedence over everything else.
    pub part_paths: BTreeMap<LayerType, KeypointPath>,
    /// Per-pixel part classes.
    pub parts: Option<PartSegmentation>,
    /// Dense face-mesh landmarks outlining the eyes, nose and mouth.
    pub face_landmarks: Option<FaceLandmarks>,
    /// Confidence threshold for `summary` and `pose`.
    pub min_confidence: Option<f64>,
}

impl DetectorInputs {
    fn min_confidence(&self) -> f64 {
        self.min_confidence.unwrap_or(DEFAULT_MIN_CONFIDENCE)
    }

    /// Planned types plus every type an explicit or landmark outline names, without repeats.
    fn with_outlined(
        &self,
        mut plan: Vec<LayerType>,
        landmarks: &BTreeMap<LayerType, KeypointPath>,
    ) -> Vec<LayerType> {
        for &t in self.part_paths.keys().chain(landmarks.keys()) {
            if !plan.contains(&t) {
                plan.push(t);
            }
        }
        plan
    }
}

/// Layer set, clips and pose joints built from one source image.
///
/// Immutable once built. Layers are kept sorted by ascending z-index.
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterModel {
    width: u32,
    height: u32,
    layers: Vec<Layer>,
    clips: AnimationClipStore,
    joints: BTreeMap<String, Point>,
}

impl CharacterModel {
    /// Assemble a model from already extracted layers. Layers are stably sorted by z-index.
    pub fn from_parts(
        width: u32,
        height: u32,
        mut layers: Vec<Layer>,
        clips: AnimationClipStore,
        joints: BTreeMap<String, Point>,
    ) -> AutorigResult<Self> {
        if let Some(l) = layers
            .iter()
            .find(|l| l.buffer.width() != width || l.buffer.height() != height)
        {
            return Err(AutorigError::validation(format!(
                "layer '{}' is {}x{}, model is {width}x{height}",
                l.id,
                l.buffer.width(),
                l.buffer.height()
            )));
        }
        layers.sort_by_key(|l| l.z_index);
        Ok(Self {
            width,
            height,
            layers,
            clips,
            joints,
        })
    }

    /// Run mask building and extraction for every planned layer type.
    ///
    /// A layer that fails is logged and left out; the rest of the model is still produced.
    /// Clip registration errors are returned since they would break playback.
    #[tracing::instrument(skip(image, inputs, config), fields(w = image.width(), h = image.height()))]
    pub fn build(
        image: &RasterBuffer,
        inputs: &DetectorInputs,
        config: &AutorigConfig,
    ) -> AutorigResult<Self> {
        let clips = AnimationClipStore::with_overrides(config.clips.iter().cloned())?;
        let mask = MaskBuilder::new(config.mask).build(image);
        if mask.is_degenerate() {
            tracing::warn!("no character detected; only the background layer will have content");
        }
        let parts = inputs.parts.as_ref().filter(|p| match usable_parts(p, image) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "ignoring part segmentation");
                false
            }
        });

        let extractor = LayerExtractor::new(config.extract);
        let min_conf = inputs.min_confidence();
        let landmarks = inputs
            .face_landmarks
            .as_ref()
            .map(FaceLandmarks::part_paths)
            .unwrap_or_default();
        let plan = inputs.with_outlined(
            match &inputs.summary {
                Some(summary) => summary.plan_layers(min_conf),
                None => LayerType::DEFAULT_SET.to_vec(),
            },
            &landmarks,
        );

        let mut layers = Vec::with_capacity(plan.len());
        for layer_type in plan {
            let pose_path = inputs
                .pose
                .as_ref()
                .and_then(|p| p.part_path(layer_type, min_conf));
            let outline = inputs
                .part_paths
                .get(&layer_type)
                .or_else(|| landmarks.get(&layer_type))
                .or(pose_path.as_ref());
            match extract_one(&extractor, image, &mask, outline, parts, layer_type) {
                Ok(layer) => layers.push(layer),
                Err(err) => tracing::warn!(layer = %layer_type, %err, "layer extraction failed"),
            }
        }

        let joints = inputs
            .pose
            .as_ref()
            .map(KeypointSet::joints)
            .unwrap_or_default();
        let model = Self::from_parts(image.width(), image.height(), layers, clips, joints)?;
        tracing::debug!(
            layers = model.layers.len(),
            with_content = model.layers.iter().filter(|l| l.has_content).count(),
            "character model built"
        );
        Ok(model)
    }

    /// Canvas width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Layers in ascending z-order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer by id.
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// First layer of a type.
    pub fn layer_of(&self, layer_type: LayerType) -> Option<&Layer> {
        self.layers.iter().find(|l| l.layer_type == layer_type)
    }

    /// Registered clips.
    pub fn clips(&self) -> &AnimationClipStore {
        &self.clips
    }

    /// Pose joints by name.
    pub fn joints(&self) -> &BTreeMap<String, Point> {
        &self.joints
    }
}

/// Mode precedence: keypoint outline, part classes, region table.
///
/// The caller picks `outline` from an explicit part path, then face landmarks, then the pose
/// template.
fn extract_one(
    extractor: &LayerExtractor,
    image: &RasterBuffer,
    mask: &CharacterMask,
    outline: Option<&KeypointPath>,
    parts: Option<&PartSegmentation>,
    layer_type: LayerType,
) -> AutorigResult<Layer> {
    if let Some(path) = outline {
        return extractor.extract(image, mask, layer_type, Some(path));
    }
    if let Some(parts) = parts
        && !part_classes(layer_type).is_empty()
    {
        return extractor.extract_parts(image, mask, parts, layer_type);
    }
    extractor.extract(image, mask, layer_type, None)
}

fn usable_parts(parts: &PartSegmentation, image: &RasterBuffer) -> AutorigResult<()> {
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
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/rig/model.rs"]
mod tests;
