//! Character masking and per-part layer extraction.

/// Corner-sampled background removal.
pub mod mask;
/// Proportional region table.
pub mod regions;
/// Pose keypoints and keypoint paths.
pub mod keypoints;
/// Per-pixel part segmentation.
pub mod parts;
/// Detector summaries and layer planning.
pub mod detect;
/// Layer extraction from mask, regions, keypoints or parts.
pub mod extract;
