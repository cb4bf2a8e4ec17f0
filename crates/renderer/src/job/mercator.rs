//! Mercator scanline path.

use super::RowGeometry;
use projection::mercator::{lat_to_mercator_y, mercator_y_to_lat};
use projection::Viewport;
use std::f64::consts::PI;

/// Inverse Mercator mapping: longitude is affine in x exactly as in the
/// equirectangular path; latitude is `atan(sinh(·))` of the row's Mercator
/// y value, evaluated once per scanline.
#[derive(Debug)]
pub struct MercatorPath {
    lon0: f64,
    rpp: f64,
    center_m: f64,
    center_y: f64,
}

impl MercatorPath {
    pub fn new(viewport: &Viewport) -> Self {
        let rpp = viewport.radians_per_pixel();
        Self {
            lon0: viewport.center_lon() - viewport.center_x() * rpp,
            rpp,
            center_m: lat_to_mercator_y(viewport.center_lat()),
            center_y: viewport.center_y(),
        }
    }

    pub(super) fn row(&self, y: usize) -> Option<RowGeometry<'_>> {
        let m = self.center_m + (self.center_y - (y as f64 + 0.5)) * self.rpp;
        if m.abs() > PI {
            return None;
        }
        Some(RowGeometry::Affine {
            lon0: self.lon0,
            dlon: self.rpp,
            lat: mercator_y_to_lat(m),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection::Projection;

    #[test]
    fn test_row_matches_viewport_inverse() {
        let vp = Viewport::new(Projection::Mercator, 512, 512, 128.0, 0.3, 0.2).unwrap();
        let path = MercatorPath::new(&vp);

        for y in [0usize, 128, 256, 400, 511] {
            let Some(RowGeometry::Affine { lon0, dlon, lat }) = path.row(y) else {
                panic!("row {} should be on the map", y);
            };
            let (vlon, vlat) = vp.screen_to_geo(100.5, y as f64 + 0.5).unwrap();
            let lon = projection::normalize_lon(lon0 + dlon * 100.5);
            assert!((lon - vlon).abs() < 1e-12);
            assert!((lat - vlat).abs() < 1e-12);
        }
    }

    #[test]
    fn test_latitude_spacing_is_nonlinear() {
        let vp = Viewport::new(Projection::Mercator, 512, 512, 128.0, 0.0, 0.0).unwrap();
        let path = MercatorPath::new(&vp);

        let lat_of = |y: usize| match path.row(y) {
            Some(RowGeometry::Affine { lat, .. }) => lat,
            _ => panic!("row {} off the map", y),
        };
        // Equal pixel steps near the equator cover less latitude than the
        // same steps closer to the pole.
        let near_equator = (lat_of(255) - lat_of(265)).abs();
        let near_top = (lat_of(5) - lat_of(15)).abs();
        assert!(near_top > near_equator);
    }

    #[test]
    fn test_rows_beyond_map_edge_are_none() {
        // Zoomed out: Mercator's square map is smaller than the viewport.
        let vp = Viewport::new(Projection::Mercator, 600, 600, 100.0, 0.0, 0.0).unwrap();
        let path = MercatorPath::new(&vp);
        assert!(path.row(0).is_none());
        assert!(path.row(300).is_some());
    }
}
