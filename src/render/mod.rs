//! CPU compositor.
//!
//! Layers are drawn back to front into a premultiplied [`frame::FrameRGBA`], each through the
//! transform sampled from the active clip.

/// Output frame type.
pub mod frame;
pub(crate) mod composite;
/// Per-frame layer compositing.
pub mod compositor;
/// Fixed-rate clip rendering.
pub mod sequence;
