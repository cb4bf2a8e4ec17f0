//! Scanline render jobs, one path per projection kind.
//!
//! A [`ScanlineJob`] fills a contiguous band of output scanlines. The walk
//! over a row is shared; the inverse-projection arithmetic is provided by a
//! [`ProjectionPath`], a closed set of four variants:
//!
//! - `Equirectangular` — lon/lat affine in (x, y), no per-pixel trigonometry
//! - `Mercator` — longitude affine, latitude `atan(sinh(·))` per row
//! - `Spherical` — orthographic globe, per-pixel sphere reconstruction
//! - `Generic` — delegated to the viewport's screen/geo capability

mod equirect;
mod generic;
mod mercator;
mod spherical;

pub use equirect::EquirectPath;
pub use generic::GenericPath;
pub use mercator::MercatorPath;
pub use spherical::SphericalPath;

use crate::sampler::Sampler;
use globe_common::canvas::{write_pixel, CanvasBand};
use globe_common::{MapQuality, Rgba, ScreenRect};
use projection::{Projection, Viewport};

/// Inverse-projection arithmetic for one projection kind.
#[derive(Debug)]
pub enum ProjectionPath<'v> {
    Equirectangular(EquirectPath),
    Mercator(MercatorPath),
    Spherical(SphericalPath),
    Generic(GenericPath<'v>),
}

impl<'v> ProjectionPath<'v> {
    /// Build the path matching the viewport's projection kind.
    pub fn new(viewport: &'v Viewport) -> Self {
        match viewport.projection() {
            Projection::Equirectangular => Self::Equirectangular(EquirectPath::new(viewport)),
            Projection::Mercator => Self::Mercator(MercatorPath::new(viewport)),
            Projection::Spherical => Self::Spherical(SphericalPath::new(viewport)),
            Projection::Generic => Self::Generic(GenericPath::new(viewport)),
        }
    }

    /// Row-level inverse geometry, or `None` when the scanline lies outside
    /// the projected map entirely.
    fn row_geometry(&self, y: usize) -> Option<RowGeometry<'_>> {
        match self {
            Self::Equirectangular(path) => path.row(y),
            Self::Mercator(path) => path.row(y),
            Self::Spherical(path) => Some(RowGeometry::Spherical {
                path,
                y: y as f64 + 0.5,
            }),
            Self::Generic(path) => Some(RowGeometry::Generic {
                path,
                y: y as f64 + 0.5,
            }),
        }
    }

    /// Horizontal pixel range of scanline `y`, clipped to the affected
    /// rectangle and, for the disk-clipped projections, to the visible
    /// globe disk. `None` when the row has no visible pixels.
    fn row_bounds(&self, y: usize, rect: &ScreenRect) -> Option<(usize, usize)> {
        let (left, right) = match self {
            Self::Equirectangular(_) | Self::Mercator(_) => (rect.left, rect.right),
            Self::Spherical(path) => path.disk_bounds(y, rect)?,
            Self::Generic(path) => path.disk_bounds(y, rect)?,
        };
        let left = left.max(0);
        if left >= right {
            return None;
        }
        Some((left as usize, right as usize))
    }
}

/// Per-row geometry: either a closed-form affine mapping or a per-pixel
/// evaluation.
enum RowGeometry<'p> {
    /// Longitude affine in x, latitude constant across the row.
    Affine { lon0: f64, dlon: f64, lat: f64 },
    Spherical { path: &'p SphericalPath, y: f64 },
    Generic { path: &'p GenericPath<'p>, y: f64 },
}

impl RowGeometry<'_> {
    /// Geographic coordinate under the pixel center of column `x`.
    #[inline]
    fn geo_at(&self, x: usize) -> Option<(f64, f64)> {
        let fx = x as f64 + 0.5;
        match self {
            RowGeometry::Affine { lon0, dlon, lat } => {
                Some((projection::normalize_lon(lon0 + dlon * fx), *lat))
            }
            RowGeometry::Spherical { path, y } => path.geo_at(fx, *y),
            RowGeometry::Generic { path, y } => path.geo_at(fx, *y),
        }
    }
}

/// Clip a disk of radius `clip_radius` around `(cx, cy)` to scanline `y`,
/// intersected with `rect`. Shared by the spherical and generic paths.
pub(crate) fn disk_row_bounds(
    cx: f64,
    cy: f64,
    clip_radius: f64,
    y: usize,
    rect: &ScreenRect,
) -> Option<(i64, i64)> {
    let dy = y as f64 + 0.5 - cy;
    let h2 = clip_radius * clip_radius - dy * dy;
    if h2 <= 0.0 {
        return None;
    }
    let half = h2.sqrt();
    let left = rect.left.max((cx - half).floor() as i64);
    let right = rect.right.min((cx + half).ceil() as i64);
    (left < right).then_some((left, right))
}

/// One parallel unit of work: renders the scanlines of a single canvas band.
///
/// The band is an exclusive borrow of disjoint canvas rows and the sampler
/// is owned, so jobs run without any synchronization.
pub struct ScanlineJob<'a> {
    band: CanvasBand<'a>,
    rect: ScreenRect,
    path: &'a ProjectionPath<'a>,
    sampler: Sampler<'a>,
    step: usize,
    quality: MapQuality,
    /// Screen position of the projection's north pole, when visible.
    pole: Option<(f64, f64)>,
}

impl<'a> ScanlineJob<'a> {
    pub fn new(
        band: CanvasBand<'a>,
        rect: ScreenRect,
        path: &'a ProjectionPath<'a>,
        sampler: Sampler<'a>,
        step: usize,
        quality: MapQuality,
        pole: Option<(f64, f64)>,
    ) -> Self {
        Self {
            band,
            rect,
            path,
            sampler,
            step,
            quality,
            pole,
        }
    }

    /// Render every scanline of the band, top to bottom. Under `Low`
    /// quality, each computed scanline is duplicated into the next one and
    /// the walk advances by two rows.
    pub fn run(mut self) {
        let y0 = self.band.y_start().max(self.rect.top.max(0) as usize);
        let y1 = self.band.y_end().min(self.rect.bottom.max(0) as usize);

        let mut y = y0;
        while y < y1 {
            let rendered = self.render_row(y);
            if rendered && self.quality.duplicates_scanlines() && y + 1 < y1 {
                self.band.duplicate_row(y);
                y += 2;
            } else {
                y += 1;
            }
        }
    }

    /// Render one scanline. Returns whether any pixels were computed.
    fn render_row(&mut self, y: usize) -> bool {
        let path = self.path;
        let Some(geometry) = path.row_geometry(y) else {
            return false;
        };
        let Some((x_left, x_right)) = path.row_bounds(y, &self.rect) else {
            return false;
        };

        let fine = self.quality.bilinear_sampling();
        let n = self.step;

        // Rows near the pole suppress span interpolation across the pole's
        // x position; longitude changes too fast there for the linear
        // assumption and produces visible seams.
        let pole_x = self.pole.and_then(|(px, py)| {
            let margin = 0.75 * n as f64;
            ((y as f64 + 0.5 - py).abs() <= margin).then_some(px)
        });

        self.sampler.reset();
        let row = self.band.row_mut(y);

        let mut x = x_left;
        let (color, mut prev_hit) = match geometry.geo_at(x) {
            Some((lon, lat)) => self.sampler.sample(lon, lat, fine),
            None => (Rgba::TRANSPARENT, false),
        };
        write_pixel(row, x, color);

        while x + 1 < x_right {
            // Only a full interval of n pixels is interpolatable; the short
            // tail at the row end is evaluated exactly.
            let step = n.min(x_right - 1 - x);
            let span_ok = step == n
                && n > 1
                && prev_hit
                && self.sampler.has_prev()
                && !straddles_pole(pole_x, x, x + step);

            if span_ok {
                if let Some((lon, lat)) = geometry.geo_at(x + step) {
                    prev_hit = self.sampler.interpolate_span(row, x + 1, step, lon, lat, fine);
                    x += step;
                    continue;
                }
            }

            for xi in (x + 1)..=(x + step) {
                let (color, hit) = match geometry.geo_at(xi) {
                    Some((lon, lat)) => self.sampler.sample(lon, lat, fine),
                    None => {
                        self.sampler.reset();
                        (Rgba::TRANSPARENT, false)
                    }
                };
                write_pixel(row, xi, color);
                prev_hit = hit;
            }
            x += step;
        }
        true
    }
}

#[inline]
fn straddles_pole(pole_x: Option<f64>, x0: usize, x1: usize) -> bool {
    match pole_x {
        Some(px) => x0 as f64 <= px && px <= x1 as f64,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_row_bounds_clip() {
        let rect = ScreenRect::new(0, 0, 100, 100);
        // Disk of radius 10 at (50, 50): row through the center spans the
        // full diameter.
        let (l, r) = disk_row_bounds(50.0, 50.0, 10.0, 49, &rect).unwrap();
        assert!(l <= 41 && r >= 59);

        // A row outside the disk is empty.
        assert!(disk_row_bounds(50.0, 50.0, 10.0, 70, &rect).is_none());

        // The affected rect clips the row.
        let narrow = ScreenRect::new(48, 0, 52, 100);
        let (l, r) = disk_row_bounds(50.0, 50.0, 10.0, 49, &narrow).unwrap();
        assert_eq!((l, r), (48, 52));
    }

    #[test]
    fn test_straddles_pole() {
        assert!(straddles_pole(Some(5.0), 2, 8));
        assert!(!straddles_pole(Some(9.5), 2, 8));
        assert!(!straddles_pole(None, 2, 8));
    }
}
