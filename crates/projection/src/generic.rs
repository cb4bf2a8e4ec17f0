//! Projections without a closed-form scanline shortcut.

use crate::viewport::Viewport;
use crate::{normalize_lon, Projection};
use std::f64::consts::PI;

/// Screen/geo capability for the `Generic` render path.
///
/// Implementations provide both directions: the inverse mapping drives
/// per-pixel sampling, the forward mapping is needed for the affected-rect
/// tessellation and the pole-position lookup.
pub trait GenericProjection: Send + Sync {
    /// Inverse projection. `None` when the pixel lies off the projected globe.
    fn screen_to_geo(&self, viewport: &Viewport, x: f64, y: f64) -> Option<(f64, f64)>;

    /// Forward projection. `None` when the coordinate is not representable
    /// on screen (e.g. the antipode).
    fn geo_to_screen(&self, viewport: &Viewport, lon: f64, lat: f64) -> Option<(f64, f64)>;

    /// Radius in pixels of the disk that bounds the projected globe,
    /// used to clip scanline extents.
    fn clip_radius(&self, viewport: &Viewport) -> f64;
}

/// Azimuthal equidistant projection centered on the viewport center.
///
/// Distances from the center are true to scale along every azimuth; the
/// whole globe maps onto a disk of twice the globe radius.
#[derive(Debug, Default, Clone, Copy)]
pub struct AzimuthalEquidistant;

impl AzimuthalEquidistant {
    pub fn new() -> Self {
        Self
    }
}

impl GenericProjection for AzimuthalEquidistant {
    fn screen_to_geo(&self, viewport: &Viewport, x: f64, y: f64) -> Option<(f64, f64)> {
        debug_assert_eq!(viewport.projection(), Projection::Generic);
        let rpp = viewport.radians_per_pixel();
        let xe = (x - viewport.center_x()) * rpp;
        let yn = (viewport.center_y() - y) * rpp;

        let c = xe.hypot(yn);
        if c > PI {
            return None;
        }
        if c < 1e-12 {
            return Some((viewport.center_lon(), viewport.center_lat()));
        }

        let (sin_c, cos_c) = c.sin_cos();
        let (sin_lat0, cos_lat0) = viewport.center_lat().sin_cos();

        let lat = (cos_c * sin_lat0 + yn * sin_c * cos_lat0 / c)
            .clamp(-1.0, 1.0)
            .asin();
        let lon = viewport.center_lon()
            + (xe * sin_c).atan2(c * cos_lat0 * cos_c - yn * sin_lat0 * sin_c);
        Some((normalize_lon(lon), lat))
    }

    fn geo_to_screen(&self, viewport: &Viewport, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let dlon = normalize_lon(lon - viewport.center_lon());
        let (sin_lat0, cos_lat0) = viewport.center_lat().sin_cos();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let cos_dlon = dlon.cos();

        let cos_c = (sin_lat0 * sin_lat + cos_lat0 * cos_lat * cos_dlon).clamp(-1.0, 1.0);
        let c = cos_c.acos();

        // The antipode maps to the whole boundary circle; treat it as
        // unrepresentable.
        if c > PI - 1e-9 {
            return None;
        }
        let k = if c < 1e-12 { 1.0 } else { c / c.sin() };

        let xe = k * cos_lat * dlon.sin();
        let yn = k * (cos_lat0 * sin_lat - sin_lat0 * cos_lat * cos_dlon);

        let ppr = viewport.pixels_per_radian();
        Some((
            viewport.center_x() + xe * ppr,
            viewport.center_y() - yn * ppr,
        ))
    }

    fn clip_radius(&self, viewport: &Viewport) -> f64 {
        // c = π maps to π · (2r/π) pixels from the center.
        2.0 * viewport.radius()
    }
}
