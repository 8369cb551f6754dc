use std::collections::{BTreeMap, BTreeSet};

use crate::rig::layer_type::LayerType;

/// Category confidences from an object/face detector, e.g. `{"person": 0.98, "face": 0.9}`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DetectionSummary {
    /// Category name to confidence in `[0, 1]`.
    pub categories: BTreeMap<String, f64>,
}

impl DetectionSummary {
    /// Summary from `(category, confidence)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self {
            categories: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    fn detected(&self, category: &str, min_confidence: f64) -> bool {
        self.categories
            .get(category)
            .is_some_and(|&c| c >= min_confidence)
    }

    /// Layer types worth extracting given what was detected, in ascending z-order.
    ///
    /// `background` is always planned. A `head` entry below the threshold suppresses the head
    /// and hair layers a face would otherwise add.
    pub fn plan_layers(&self, min_confidence: f64) -> Vec<LayerType> {
        let mut plan = BTreeSet::from([LayerType::Background]);
        if self.detected("person", min_confidence) {
            plan.extend([
                LayerType::Body,
                LayerType::Torso,
                LayerType::LeftArm,
                LayerType::RightArm,
                LayerType::LeftLeg,
                LayerType::RightLeg,
            ]);
        }
        if self.detected("face", min_confidence) {
            plan.extend([
                LayerType::Face,
                LayerType::Eyes,
                LayerType::Nose,
                LayerType::Mouth,
            ]);
            let head_absent =
                self.categories.contains_key("head") && !self.detected("head", min_confidence);
            if !head_absent {
                plan.extend([LayerType::Head, LayerType::HairFront, LayerType::HairBack]);
            }
        }
        if self.detected("anime", min_confidence) {
            plan.insert(LayerType::AnimeEyes);
        }
        if self.detected("accessory", min_confidence) {
            plan.insert(LayerType::Accessories);
        }

        let mut out: Vec<_> = plan.into_iter().collect();
        out.sort_by_key(|t| t.default_z_index());
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/segment/detect.rs"]
mod tests;
