//! Per-frame view state and the screen/geo mappings for each projection.

use crate::generic::GenericProjection;
use crate::spherical::{self, GlobeRotation};
use crate::{mercator, normalize_lon, Projection};
use globe_common::{GeoBox, RenderError, RenderResult};
use nalgebra::Vector3;
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::sync::Arc;

/// Read-only view state for one frame: screen size, globe radius in pixels
/// (the zoom proxy), view center, projection kind and rotation state.
///
/// Owned externally and consumed once per render call. For the `Generic`
/// projection the screen/geo mapping is delegated to an injected
/// [`GenericProjection`].
#[derive(Clone)]
pub struct Viewport {
    projection: Projection,
    width: usize,
    height: usize,
    radius: f64,
    center_lon: f64,
    center_lat: f64,
    heading: f64,
    rotation: GlobeRotation,
    generic: Option<Arc<dyn GenericProjection>>,
}

impl Viewport {
    /// Create a viewport. Fails on a zero-sized screen or non-positive
    /// globe radius.
    pub fn new(
        projection: Projection,
        width: usize,
        height: usize,
        radius: f64,
        center_lon: f64,
        center_lat: f64,
    ) -> RenderResult<Self> {
        if width == 0 || height == 0 || !(radius > 0.0) {
            return Err(RenderError::EmptyViewport);
        }
        Ok(Self {
            projection,
            width,
            height,
            radius,
            center_lon: normalize_lon(center_lon),
            center_lat,
            heading: 0.0,
            rotation: GlobeRotation::new(normalize_lon(center_lon), center_lat, 0.0),
            generic: None,
        })
    }

    /// Set the rotation about the view axis (spherical rendering only).
    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = heading;
        self.rotation = GlobeRotation::new(self.center_lon, self.center_lat, heading);
        self
    }

    /// Attach the projection capability used by the `Generic` path.
    pub fn with_generic(mut self, generic: Arc<dyn GenericProjection>) -> Self {
        self.generic = Some(generic);
        self
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Globe radius in pixels.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn center_lon(&self) -> f64 {
        self.center_lon
    }

    pub fn center_lat(&self) -> f64 {
        self.center_lat
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn rotation(&self) -> &GlobeRotation {
        &self.rotation
    }

    pub fn center_x(&self) -> f64 {
        self.width as f64 / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.height as f64 / 2.0
    }

    /// Radians of geographic extent per screen pixel.
    pub fn radians_per_pixel(&self) -> f64 {
        PI / (2.0 * self.radius)
    }

    pub fn pixels_per_radian(&self) -> f64 {
        2.0 * self.radius / PI
    }

    /// Radius in pixels of the disk that bounds the projected globe, for
    /// projections whose scanlines are disk-clipped. `None` for the
    /// cylindrical projections (scanlines span the dirty rectangle).
    pub fn clip_radius(&self) -> Option<f64> {
        match self.projection {
            Projection::Spherical => Some(self.radius),
            Projection::Generic => Some(
                self.generic
                    .as_ref()
                    .map(|g| g.clip_radius(self))
                    .unwrap_or(self.radius),
            ),
            Projection::Mercator | Projection::Equirectangular => None,
        }
    }

    /// Whether the projected globe covers the whole viewport. When it does
    /// not, the globe occupies a small screen footprint and coarse
    /// interpolation is visually safe.
    pub fn globe_covers_viewport(&self) -> bool {
        match self.projection {
            Projection::Spherical | Projection::Generic => {
                let clip = self.clip_radius().unwrap_or(self.radius);
                let corner = self.center_x().hypot(self.center_y());
                clip >= corner
            }
            Projection::Equirectangular => {
                2.0 * self.radius >= self.height as f64 && 4.0 * self.radius >= self.width as f64
            }
            Projection::Mercator => {
                4.0 * self.radius >= self.height as f64 && 4.0 * self.radius >= self.width as f64
            }
        }
    }

    /// Inverse projection: screen position to geographic coordinate.
    /// `None` when the pixel lies off the projected globe.
    pub fn screen_to_geo(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        match self.projection {
            Projection::Equirectangular => {
                let rpp = self.radians_per_pixel();
                let lat = self.center_lat + (self.center_y() - y) * rpp;
                if lat.abs() > FRAC_PI_2 {
                    return None;
                }
                let lon = normalize_lon(self.center_lon + (x - self.center_x()) * rpp);
                Some((lon, lat))
            }
            Projection::Mercator => {
                let rpp = self.radians_per_pixel();
                let m = mercator::lat_to_mercator_y(self.center_lat) + (self.center_y() - y) * rpp;
                if m.abs() > PI {
                    return None;
                }
                let lon = normalize_lon(self.center_lon + (x - self.center_x()) * rpp);
                Some((lon, mercator::mercator_y_to_lat(m)))
            }
            Projection::Spherical => {
                let qx = (x - self.center_x()) / self.radius;
                let qy = (self.center_y() - y) / self.radius;
                let r2 = qx * qx + qy * qy;
                if r2 > 1.0 {
                    return None;
                }
                let qz = (1.0 - r2).max(0.0).sqrt();
                let world = self.rotation.view_to_world(Vector3::new(qx, qy, qz));
                Some(spherical::vector_to_geo(world))
            }
            Projection::Generic => self.generic.as_ref()?.screen_to_geo(self, x, y),
        }
    }

    /// Forward projection: geographic coordinate to screen position.
    /// `None` when the point is hidden behind the globe's horizon or not
    /// representable under the projection.
    pub fn geo_to_screen(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        match self.projection {
            Projection::Equirectangular => {
                let ppr = self.pixels_per_radian();
                let x = self.center_x() + normalize_lon(lon - self.center_lon) * ppr;
                let y = self.center_y() - (lat - self.center_lat) * ppr;
                Some((x, y))
            }
            Projection::Mercator => {
                let ppr = self.pixels_per_radian();
                let x = self.center_x() + normalize_lon(lon - self.center_lon) * ppr;
                let dm = mercator::lat_to_mercator_y(lat) - mercator::lat_to_mercator_y(self.center_lat);
                Some((x, self.center_y() - dm * ppr))
            }
            Projection::Spherical => {
                let view = self.rotation.world_to_view(spherical::geo_to_vector(lon, lat));
                if view.z < 0.0 {
                    return None;
                }
                Some((
                    self.center_x() + view.x * self.radius,
                    self.center_y() - view.y * self.radius,
                ))
            }
            Projection::Generic => self.generic.as_ref()?.geo_to_screen(self, lon, lat),
        }
    }

    /// The lat/lon box currently visible on screen, for the cheap
    /// no-intersection early exit. Conservative: when the visible extent
    /// cannot be bounded tightly (whole globe in view, a pole on screen),
    /// the full-globe box is returned, which only costs work, never skips it.
    pub fn visible_latlon_box(&self) -> GeoBox {
        match self.projection {
            Projection::Equirectangular | Projection::Mercator => {
                let rpp = self.radians_per_pixel();
                let half_w = self.center_x() * rpp;
                let (west, east) = if half_w >= PI {
                    (-PI, PI)
                } else {
                    (
                        normalize_lon(self.center_lon - half_w),
                        normalize_lon(self.center_lon + half_w),
                    )
                };
                let (south, north) = match self.projection {
                    Projection::Equirectangular => (
                        (self.center_lat - self.center_y() * rpp).max(-FRAC_PI_2),
                        (self.center_lat + self.center_y() * rpp).min(FRAC_PI_2),
                    ),
                    _ => {
                        let mc = mercator::lat_to_mercator_y(self.center_lat);
                        (
                            mercator::mercator_y_to_lat((mc - self.center_y() * rpp).max(-PI)),
                            mercator::mercator_y_to_lat((mc + self.center_y() * rpp).min(PI)),
                        )
                    }
                };
                GeoBox::new(west, south, east, north)
            }
            Projection::Spherical | Projection::Generic => self.disk_visible_box(),
        }
    }

    fn disk_visible_box(&self) -> GeoBox {
        let full = GeoBox::new(-PI, -FRAC_PI_2, PI, FRAC_PI_2);
        let w = self.width as f64;
        let h = self.height as f64;
        let border = [
            (0.0, 0.0),
            (w / 2.0, 0.0),
            (w, 0.0),
            (0.0, h / 2.0),
            (w, h / 2.0),
            (0.0, h),
            (w / 2.0, h),
            (w, h),
        ];

        let mut south = self.center_lat;
        let mut north = self.center_lat;
        let mut min_d = 0.0_f64;
        let mut max_d = 0.0_f64;
        for &(x, y) in &border {
            match self.screen_to_geo(x, y) {
                Some((lon, lat)) => {
                    south = south.min(lat);
                    north = north.max(lat);
                    let d = normalize_lon(lon - self.center_lon);
                    min_d = min_d.min(d);
                    max_d = max_d.max(d);
                }
                // Part of the border is off the globe: the whole globe may
                // be in view, so do not claim a tighter bound.
                None => return full,
            }
        }

        // A pole on screen makes every longitude visible.
        for &pole_lat in &[FRAC_PI_2, -FRAC_PI_2] {
            if let Some((x, y)) = self.geo_to_screen(0.0, pole_lat) {
                if x >= 0.0 && x <= w && y >= 0.0 && y <= h {
                    return full;
                }
            }
        }

        if max_d - min_d >= PI {
            return full;
        }
        GeoBox::new(
            normalize_lon(self.center_lon + min_d),
            south,
            normalize_lon(self.center_lon + max_d),
            north,
        )
    }
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("projection", &self.projection)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("radius", &self.radius)
            .field("center_lon", &self.center_lon)
            .field("center_lat", &self.center_lat)
            .field("heading", &self.heading)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp(projection: Projection, radius: f64) -> Viewport {
        Viewport::new(projection, 800, 600, radius, 0.0, 0.0).unwrap()
    }

    #[test]
    fn test_rejects_zero_size() {
        assert!(Viewport::new(Projection::Mercator, 0, 600, 100.0, 0.0, 0.0).is_err());
        assert!(Viewport::new(Projection::Mercator, 800, 600, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_equirectangular_center_round_trip() {
        let vp = vp(Projection::Equirectangular, 300.0);
        let (lon, lat) = vp.screen_to_geo(vp.center_x(), vp.center_y()).unwrap();
        assert!(lon.abs() < 1e-12 && lat.abs() < 1e-12);

        let (x, y) = vp.geo_to_screen(0.3, -0.2).unwrap();
        let (lon, lat) = vp.screen_to_geo(x, y).unwrap();
        assert!((lon - 0.3).abs() < 1e-12);
        assert!((lat + 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_mercator_round_trip() {
        let vp = Viewport::new(Projection::Mercator, 800, 600, 250.0, 0.5, 0.4).unwrap();
        let (x, y) = vp.geo_to_screen(0.7, 0.9).unwrap();
        let (lon, lat) = vp.screen_to_geo(x, y).unwrap();
        assert!((lon - 0.7).abs() < 1e-10);
        assert!((lat - 0.9).abs() < 1e-10);
    }

    #[test]
    fn test_spherical_center_and_horizon() {
        let vp = Viewport::new(Projection::Spherical, 800, 600, 200.0, 0.4, -0.3).unwrap();
        let (lon, lat) = vp.screen_to_geo(vp.center_x(), vp.center_y()).unwrap();
        assert!((lon - 0.4).abs() < 1e-12);
        assert!((lat + 0.3).abs() < 1e-12);

        // Off the globe disk.
        assert!(vp.screen_to_geo(vp.center_x() + 201.0, vp.center_y()).is_none());

        // The antipode is hidden behind the horizon.
        assert!(vp.geo_to_screen(normalize_lon(0.4 + PI), 0.3).is_none());
    }

    #[test]
    fn test_spherical_round_trip() {
        let vp = Viewport::new(Projection::Spherical, 800, 600, 220.0, 1.0, 0.6).unwrap();
        for &(dx, dy) in &[(30.0, 40.0), (-100.0, 15.0), (80.0, -90.0)] {
            let x = vp.center_x() + dx;
            let y = vp.center_y() + dy;
            let (lon, lat) = vp.screen_to_geo(x, y).unwrap();
            let (x2, y2) = vp.geo_to_screen(lon, lat).unwrap();
            assert!((x2 - x).abs() < 1e-8);
            assert!((y2 - y).abs() < 1e-8);
        }
    }

    #[test]
    fn test_globe_covers_viewport() {
        // Globe disk radius 500 from an 800×600 screen center reaches the corners.
        assert!(vp(Projection::Spherical, 501.0).globe_covers_viewport());
        assert!(!vp(Projection::Spherical, 200.0).globe_covers_viewport());

        assert!(vp(Projection::Equirectangular, 300.0).globe_covers_viewport());
        assert!(!vp(Projection::Equirectangular, 100.0).globe_covers_viewport());
    }

    #[test]
    fn test_visible_box_equirectangular_zoomed_in() {
        let vp = Viewport::new(Projection::Equirectangular, 800, 600, 2000.0, 0.0, 0.5).unwrap();
        let bbox = vp.visible_latlon_box();
        assert!(bbox.width() < PI);
        assert!(bbox.contains(0.0, 0.5));
        assert!(!bbox.contains(PI, 0.5));
    }

    #[test]
    fn test_visible_box_small_globe_is_full() {
        // The whole globe fits on screen: nothing can be excluded.
        let vp = vp(Projection::Spherical, 100.0);
        let bbox = vp.visible_latlon_box();
        assert!((bbox.width() - 2.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_visible_box_zoomed_spherical_excludes_far_side() {
        let vp = Viewport::new(Projection::Spherical, 800, 600, 2500.0, 0.0, 0.0).unwrap();
        let bbox = vp.visible_latlon_box();
        assert!(bbox.contains(0.0, 0.0));
        assert!(!bbox.contains(PI, 0.0));
    }
}
