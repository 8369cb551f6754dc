//! RGBA8 buffers, PNG/JPEG codecs and the premultiplied layer pool.

/// Straight-alpha RGBA8 pixel buffers.
pub mod buffer;
/// Image decode and PNG encode.
pub mod codec;
/// Premultiplied layer cache built once per model.
pub mod pool;
