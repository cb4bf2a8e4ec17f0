//! Frame orchestration: affected-rect computation, canvas management and
//! parallel band dispatch.

use crate::job::{ProjectionPath, ScanlineJob};
use crate::sampler::Sampler;
use crate::step::interpolation_step;
use globe_common::{Canvas, GeoBox, MapQuality, RasterImage, RenderResult, ScreenRect};
use projection::{normalize_lon, Projection, Viewport};
use rayon::ThreadPool;
use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;
use tracing::{debug, trace};

/// Latitude-circle subdivision of the overlay box outline used for the
/// affected-rect tessellation.
const OUTLINE_SUBDIV: usize = 8;

/// External sink that composites the finished canvas onto the screen.
pub trait PaintTarget {
    /// Receive the sub-rectangle of the canvas affected by this frame.
    fn composite(&mut self, rect: ScreenRect, canvas: &Canvas);
}

/// Renders one raster overlay into a reusable canvas, partitioning the
/// scanline work across a shared worker pool.
///
/// Construction validates the overlay's anchoring box; a constructed
/// renderer never fails mid-frame. The canvas buffer is retained across
/// frames and only reallocated when the viewport size changes.
pub struct OverlayRenderer {
    viewport: Viewport,
    dirty_rect: ScreenRect,
    image: Arc<RasterImage>,
    geo_box: GeoBox,
    quality: MapQuality,
    pool: Arc<ThreadPool>,
    canvas: Canvas,
}

impl OverlayRenderer {
    pub fn new(
        viewport: Viewport,
        dirty_rect: ScreenRect,
        image: Arc<RasterImage>,
        geo_box: GeoBox,
        quality: MapQuality,
        pool: Arc<ThreadPool>,
    ) -> RenderResult<Self> {
        geo_box.validate()?;
        Ok(Self {
            viewport,
            dirty_rect,
            image,
            geo_box,
            quality,
            pool,
            canvas: Canvas::new(),
        })
    }

    /// Replace the per-frame view state, keeping the canvas cache.
    pub fn update_view(&mut self, viewport: Viewport, dirty_rect: ScreenRect) {
        self.viewport = viewport;
        self.dirty_rect = dirty_rect;
    }

    pub fn set_quality(&mut self, quality: MapQuality) {
        self.quality = quality;
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The composited output of the last frame.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Render one frame of the overlay and hand the affected sub-rectangle
    /// to `paint`.
    ///
    /// A frame whose overlay does not intersect the visible extent is a
    /// silent no-op: no scanline job runs and `paint` is not invoked.
    pub fn render_image(&mut self, paint: &mut dyn PaintTarget) {
        let visible = self.viewport.visible_latlon_box();
        if !self.geo_box.intersects(&visible) {
            debug!(
                geo_box = ?self.geo_box,
                visible = ?visible,
                "overlay outside visible extent, skipping frame"
            );
            return;
        }

        let canvas_rect = ScreenRect::of_size(self.viewport.width(), self.viewport.height());
        let affected = self.affected_rect(&visible, &canvas_rect);
        if affected.is_empty() {
            return;
        }

        let reallocated = self
            .canvas
            .resize_to(self.viewport.width(), self.viewport.height());
        self.canvas.clear();
        trace!(reallocated, "canvas prepared");

        let step = interpolation_step(&self.viewport, self.quality);
        let path = ProjectionPath::new(&self.viewport);
        let pole = match self.viewport.projection() {
            Projection::Spherical | Projection::Generic => {
                self.viewport.geo_to_screen(0.0, FRAC_PI_2)
            }
            Projection::Mercator | Projection::Equirectangular => None,
        };

        let workers = self.pool.current_num_threads().max(1);
        let y_top = affected.top.max(0) as usize;
        let y_bottom = affected.bottom.max(0) as usize;
        debug!(
            ?affected,
            step,
            workers,
            quality = ?self.quality,
            "rendering overlay bands"
        );

        let image: &RasterImage = self.image.as_ref();
        let geo_box = self.geo_box;
        let quality = self.quality;
        let bands = self.canvas.split_bands(y_top, y_bottom, workers);
        let path_ref = &path;
        self.pool.scope(|scope| {
            for band in bands {
                let Ok(sampler) = Sampler::new(image, geo_box) else {
                    // The box was validated at construction; an error here
                    // means there is nothing sensible to render.
                    continue;
                };
                scope.spawn(move |_| {
                    ScanlineJob::new(band, affected, path_ref, sampler, step, quality, pole)
                        .run();
                });
            }
        });

        let out = affected.intersect(&self.dirty_rect);
        if !out.is_empty() {
            paint.composite(out, &self.canvas);
        }
    }

    /// Bounding screen rectangle of the overlay box under the current
    /// projection.
    ///
    /// Tessellates the box outline (with latitude-circle subdivision so a
    /// curved edge cannot escape the rect) and projects each vertex. Three
    /// cheap paths fall back to the full viewport instead: a box above a
    /// quarter sphere in either dimension, a box covering everything
    /// currently visible, and any outline vertex hidden behind the globe's
    /// horizon.
    fn affected_rect(&self, visible: &GeoBox, canvas_rect: &ScreenRect) -> ScreenRect {
        let gb = &self.geo_box;
        if gb.width() >= FRAC_PI_2 || gb.height() >= FRAC_PI_2 {
            return *canvas_rect;
        }
        if gb.contains_box(visible) {
            return *canvas_rect;
        }

        let mut points = Vec::with_capacity(2 * (OUTLINE_SUBDIV + 1) + 2);
        for i in 0..=OUTLINE_SUBDIV {
            let lon = normalize_lon(gb.west + gb.width() * i as f64 / OUTLINE_SUBDIV as f64);
            for lat in [gb.south, gb.north] {
                match self.viewport.geo_to_screen(lon, lat) {
                    Some(point) => points.push(point),
                    None => return *canvas_rect,
                }
            }
        }
        let mid_lat = (gb.south + gb.north) / 2.0;
        for lon in [gb.west, gb.east] {
            match self.viewport.geo_to_screen(lon, mid_lat) {
                Some(point) => points.push(point),
                None => return *canvas_rect,
            }
        }

        ScreenRect::bounding(&points).intersect(canvas_rect)
    }
}
