//! Still-image rasterization into fixed-size pixel buffers.

/// Pixel buffer type shared with the encoders.
pub mod frame;
/// Letterboxed still-image renderer.
pub mod still;
