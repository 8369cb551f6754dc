//! Keyframe clips, interpolation and playback state.

/// Clip and keyframe definitions.
pub mod clip;
/// Validated clip registry and the default clips.
pub mod store;
/// Keyframe sampling.
pub mod engine;
/// Idle/Playing state machine.
pub mod playback;
