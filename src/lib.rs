//! Autorig turns a single character image into an animatable layer rig.
//!
//! The pipeline is:
//!
//! - Build a [`CharacterModel`] from an image plus optional detector outputs
//! - Pick a clip from its [`AnimationClipStore`] and drive an [`AnimationState`]
//! - Draw frames with a [`Compositor`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Character keyframe animation.
pub mod animation;
/// Raster buffers and codecs.
pub mod raster;
/// CPU compositing.
pub mod render;
/// Character rig model.
pub mod rig;
/// Masking and layer extraction.
pub mod segment;

pub use crate::foundation::config::AutorigConfig;
pub use crate::foundation::core::{Affine, BezPath, PixelRect, Point, Rect, Vec2};
pub use crate::foundation::error::{AutorigError, AutorigResult};

pub use crate::animation::clip::{AnimationClip, Channel, Keyframe, Pivot};
pub use crate::animation::engine::{AnimationEngine, Sample, Transform};
pub use crate::animation::playback::{AnimationState, PlaybackStatus};
pub use crate::animation::store::{AnimationClipStore, ResolvedClip, default_clips};
pub use crate::raster::buffer::RasterBuffer;
pub use crate::raster::codec::{decode_image, encode_png, load_image, save_png};
pub use crate::raster::pool::{LayerPool, LayerPoolStats};
pub use crate::render::compositor::{Compositor, CompositorOpts, LayerVisibility};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::sequence::render_clip_frames;
pub use crate::rig::export::{ModelManifest, export_model, import_model};
pub use crate::rig::layer::{Layer, SourceRegion};
pub use crate::rig::layer_type::{AliasGroup, AliasTable, LayerType};
pub use crate::rig::model::{CharacterModel, DetectorInputs};
pub use crate::segment::detect::DetectionSummary;
pub use crate::segment::extract::{ExtractOpts, LayerExtractor};
pub use crate::segment::keypoints::{FaceLandmarks, Keypoint, KeypointPath, KeypointSet};
pub use crate::segment::mask::{CharacterMask, MaskBuilder, MaskOpts};
pub use crate::segment::parts::PartSegmentation;
pub use crate::segment::regions::{Region, RegionTable};
