//! Equirectangular scanline path.

use super::RowGeometry;
use projection::Viewport;
use std::f64::consts::FRAC_PI_2;

/// Inverse equirectangular mapping: longitude and latitude are affine
/// functions of the pixel position, so a row needs no per-pixel
/// trigonometry at all.
#[derive(Debug)]
pub struct EquirectPath {
    lon0: f64,
    rpp: f64,
    center_lat: f64,
    center_y: f64,
}

impl EquirectPath {
    pub fn new(viewport: &Viewport) -> Self {
        let rpp = viewport.radians_per_pixel();
        Self {
            lon0: viewport.center_lon() - viewport.center_x() * rpp,
            rpp,
            center_lat: viewport.center_lat(),
            center_y: viewport.center_y(),
        }
    }

    pub(super) fn row(&self, y: usize) -> Option<RowGeometry<'_>> {
        let lat = self.center_lat + (self.center_y - (y as f64 + 0.5)) * self.rpp;
        if lat.abs() > FRAC_PI_2 {
            return None;
        }
        Some(RowGeometry::Affine {
            lon0: self.lon0,
            dlon: self.rpp,
            lat,
        })
    }
}
