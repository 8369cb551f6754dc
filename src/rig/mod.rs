//! Layer types, the character model and its on-disk form.

/// Closed layer type set and alias groups.
pub mod layer_type;
/// A single extracted layer.
pub mod layer;
/// The assembled character model.
pub mod model;
/// Directory export and import.
pub mod export;
