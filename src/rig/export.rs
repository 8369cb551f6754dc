use std::{collections::BTreeMap, path::Path};

use anyhow::Context as _;

use crate::{
    animation::{
        clip::{AnimationClip, Keyframe, Pivot},
        store::AnimationClipStore,
    },
    foundation::core::Point,
    foundation::error::{AutorigError, AutorigResult},
    raster::codec::{load_image, save_png},
    rig::{
        layer::{Layer, SourceRegion},
        layer_type::LayerType,
        model::CharacterModel,
    },
};

/// File name of the manifest inside an export directory.
pub const MANIFEST_FILE: &str = "model.json";

/// On-disk description of a [`CharacterModel`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelManifest {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Layers in ascending z-order.
    pub layers: Vec<LayerEntry>,
    /// Clips by name.
    pub clips: BTreeMap<String, ClipEntry>,
    /// Pose joints by name.
    #[serde(default)]
    pub joints: BTreeMap<String, Point>,
}

/// One layer in the manifest; pixels live in a sibling PNG.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerEntry {
    /// Layer id.
    pub id: String,
    /// Layer type.
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    /// Painter's order.
    pub z_index: i32,
    /// Whether the layer has any visible pixel.
    pub has_content: bool,
    /// PNG file name relative to the manifest.
    pub pixel_data: String,
    /// Selection the pixels came from.
    #[serde(default = "empty_source")]
    pub source: SourceRegion,
}

fn empty_source() -> SourceRegion {
    SourceRegion::Empty
}

/// One clip in the manifest, keyed by its name.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipEntry {
    /// Layer type or alias names.
    pub target_types: Vec<String>,
    /// Keyframes.
    pub keyframes: Vec<Keyframe>,
    /// Duration of one pass.
    pub duration_ms: u32,
    /// Looping flag.
    #[serde(rename = "loop", default)]
    pub looping: bool,
    /// Rotation/scale origin.
    #[serde(default)]
    pub pivot: Pivot,
}

impl ClipEntry {
    fn from_clip(clip: &AnimationClip) -> Self {
        Self {
            target_types: clip.target_types.clone(),
            keyframes: clip.keyframes.clone(),
            duration_ms: clip.duration_ms,
            looping: clip.looping,
            pivot: clip.pivot.clone(),
        }
    }

    fn into_clip(self, name: String) -> AnimationClip {
        AnimationClip {
            name,
            target_types: self.target_types,
            keyframes: self.keyframes,
            duration_ms: self.duration_ms,
            looping: self.looping,
            pivot: self.pivot,
        }
    }
}

impl ModelManifest {
    /// Manifest describing `model`, with PNG names derived from layer ids.
    pub fn describe(model: &CharacterModel) -> Self {
        Self {
            width: model.width(),
            height: model.height(),
            layers: model
                .layers()
                .iter()
                .map(|l| LayerEntry {
                    id: l.id.clone(),
                    layer_type: l.layer_type,
                    z_index: l.z_index,
                    has_content: l.has_content,
                    pixel_data: format!("{}.png", l.id),
                    source: l.source.clone(),
                })
                .collect(),
            clips: model
                .clips()
                .iter()
                .map(|c| (c.name.clone(), ClipEntry::from_clip(c)))
                .collect(),
            joints: model.joints().clone(),
        }
    }
}

/// Write `model.json` plus one PNG per layer into `dir`, creating it if needed.
#[tracing::instrument(skip(model), fields(dir = %dir.display()))]
pub fn export_model(model: &CharacterModel, dir: &Path) -> AutorigResult<ModelManifest> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create export dir '{}'", dir.display()))?;
    let manifest = ModelManifest::describe(model);
    for (entry, layer) in manifest.layers.iter().zip(model.layers()) {
        save_png(&dir.join(&entry.pixel_data), &layer.buffer)?;
    }
    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(dir.join(MANIFEST_FILE), json)
        .with_context(|| format!("write manifest in '{}'", dir.display()))?;
    tracing::debug!(layers = manifest.layers.len(), "model exported");
    Ok(manifest)
}

/// Rebuild a model written by [`export_model`].
#[tracing::instrument(fields(dir = %dir.display()))]
pub fn import_model(dir: &Path) -> AutorigResult<CharacterModel> {
    let path = dir.join(MANIFEST_FILE);
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("read manifest '{}'", path.display()))?;
    let manifest: ModelManifest = serde_json::from_str(&json)?;

    let mut layers = Vec::with_capacity(manifest.layers.len());
    for entry in manifest.layers {
        if entry.pixel_data.contains(['/', '\\']) || entry.pixel_data.starts_with('.') {
            return Err(AutorigError::validation(format!(
                "layer '{}' pixelData must be a plain file name, got '{}'",
                entry.id, entry.pixel_data
            )));
        }
        let buffer = load_image(&dir.join(&entry.pixel_data))?;
        let has_content = buffer.has_visible_pixels();
        if has_content != entry.has_content {
            tracing::warn!(
                layer = %entry.id,
                manifest = entry.has_content,
                pixels = has_content,
                "hasContent disagrees with the layer pixels; using the pixels"
            );
        }
        layers.push(Layer {
            id: entry.id,
            layer_type: entry.layer_type,
            z_index: entry.z_index,
            has_content,
            buffer,
            source: entry.source,
        });
    }
    let clips = AnimationClipStore::new(
        manifest
            .clips
            .into_iter()
            .map(|(name, entry)| entry.into_clip(name)),
    )?;
    CharacterModel::from_parts(
        manifest.width,
        manifest.height,
        layers,
        clips,
        manifest.joints,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/rig/export.rs"]
mod tests;
