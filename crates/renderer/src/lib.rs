//! Image-overlay resampling engine for globe rendering.
//!
//! Maps a raster image anchored to a geographic bounding box onto a 2-D
//! view of the globe. For every visible screen pixel the engine inverts the
//! current projection to a geographic coordinate, samples the source image
//! there and writes the composited color into a shared output canvas.
//!
//! The hot path is organized around three ideas:
//! - adaptive span interpolation: only every n-th pixel of a scanline is
//!   projected exactly, the pixels in between are approximated,
//! - dedicated branches for the antimeridian and the pole area, where the
//!   linear approximation breaks down,
//! - parallel execution of disjoint scanline bands on a shared worker pool.

pub mod job;
pub mod overlay;
pub mod sampler;
pub mod step;

pub use overlay::{OverlayRenderer, PaintTarget};
pub use sampler::Sampler;
pub use step::interpolation_step;

use globe_common::{RenderError, RenderResult};
use rayon::ThreadPool;
use std::sync::Arc;

/// Build the shared worker pool, sized to the machine's hardware
/// concurrency. Renderer instances borrow the pool rather than owning one;
/// a process normally creates it once.
pub fn default_pool() -> RenderResult<Arc<ThreadPool>> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get())
        .build()
        .map(Arc::new)
        .map_err(|e| RenderError::ThreadPool(e.to_string()))
}

/// Build a worker pool with an explicit thread count. Mostly useful in
/// tests, where a single-threaded pool makes band partitioning observable.
pub fn pool_with_threads(threads: usize) -> RenderResult<Arc<ThreadPool>> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map(Arc::new)
        .map_err(|e| RenderError::ThreadPool(e.to_string()))
}
