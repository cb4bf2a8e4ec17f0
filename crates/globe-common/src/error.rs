//! Error types for globe-overlay rendering.

use crate::geobox::GeoBoxError;
use thiserror::Error;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

/// Primary error type for overlay rendering.
///
/// Only construction-time precondition violations surface as errors. During
/// a frame, degenerate conditions degrade to a no-op frame or transparent
/// pixels instead of propagating.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("degenerate overlay geo box: {0}")]
    DegenerateGeoBox(#[from] GeoBoxError),

    #[error("source image has zero width or height")]
    EmptyImage,

    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    PixelBufferSize { expected: usize, actual: usize },

    #[error("viewport has zero size")]
    EmptyViewport,

    #[error("thread pool construction failed: {0}")]
    ThreadPool(String),
}
