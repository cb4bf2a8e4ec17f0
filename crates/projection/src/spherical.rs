//! Globe orientation and unit-sphere decomposition for the orthographic view.

use nalgebra::{Rotation3, Vector3};

/// Orientation of the globe under the orthographic (spherical) view.
///
/// Maps between view space (x right, y up, z toward the viewer; the screen
/// center looks at `(0, 0, 1)`) and world space (the z axis pierces
/// lon = 0 / lat = 0, the y axis the north pole).
#[derive(Debug, Clone)]
pub struct GlobeRotation {
    view_to_world: Rotation3<f64>,
    world_to_view: Rotation3<f64>,
}

impl GlobeRotation {
    /// Build the orientation that places `(center_lon, center_lat)` at the
    /// view center, with `heading` rotating the view about its own axis.
    pub fn new(center_lon: f64, center_lat: f64, heading: f64) -> Self {
        let view_to_world = Rotation3::from_axis_angle(&Vector3::y_axis(), center_lon)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), -center_lat)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), -heading);
        let world_to_view = view_to_world.inverse();
        Self {
            view_to_world,
            world_to_view,
        }
    }

    pub fn view_to_world(&self, v: Vector3<f64>) -> Vector3<f64> {
        self.view_to_world * v
    }

    pub fn world_to_view(&self, v: Vector3<f64>) -> Vector3<f64> {
        self.world_to_view * v
    }
}

/// Unit-sphere position of a geographic coordinate.
pub fn geo_to_vector(lon: f64, lat: f64) -> Vector3<f64> {
    let (sin_lon, cos_lon) = lon.sin_cos();
    let (sin_lat, cos_lat) = lat.sin_cos();
    Vector3::new(cos_lat * sin_lon, sin_lat, cos_lat * cos_lon)
}

/// Geographic coordinate of a unit-sphere position.
pub fn vector_to_geo(v: Vector3<f64>) -> (f64, f64) {
    let lat = v.y.clamp(-1.0, 1.0).asin();
    let lon = v.x.atan2(v.z);
    (lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_geo_vector_round_trip() {
        for &(lon_deg, lat_deg) in &[(0.0, 0.0), (90.0, 0.0), (-120.0, 45.0), (179.0, -60.0)] {
            let lon = f64::to_radians(lon_deg);
            let lat = f64::to_radians(lat_deg);
            let (lon2, lat2) = vector_to_geo(geo_to_vector(lon, lat));
            assert!((lon2 - lon).abs() < 1e-12);
            assert!((lat2 - lat).abs() < 1e-12);
        }
    }

    #[test]
    fn test_north_pole_vector() {
        let v = geo_to_vector(0.3, FRAC_PI_2);
        assert!(v.x.abs() < 1e-12 && (v.y - 1.0).abs() < 1e-12 && v.z.abs() < 1e-12);
    }

    #[test]
    fn test_rotation_centers_view() {
        // The view center (0, 0, 1) must land on the configured center.
        let rot = GlobeRotation::new(f64::to_radians(30.0), f64::to_radians(-40.0), 0.0);
        let world = rot.view_to_world(Vector3::new(0.0, 0.0, 1.0));
        let (lon, lat) = vector_to_geo(world);
        assert!((lon - f64::to_radians(30.0)).abs() < 1e-12);
        assert!((lat - f64::to_radians(-40.0)).abs() < 1e-12);
    }

    #[test]
    fn test_pole_above_center_at_equator_view() {
        // Looking at the equator, the north pole sits straight up on the
        // horizon of the view hemisphere.
        let rot = GlobeRotation::new(0.0, 0.0, 0.0);
        let view = rot.world_to_view(geo_to_vector(0.0, FRAC_PI_2));
        assert!(view.x.abs() < 1e-12);
        assert!((view.y - 1.0).abs() < 1e-12);
        assert!(view.z.abs() < 1e-12);
    }

    #[test]
    fn test_heading_rotates_pole_sideways() {
        let rot = GlobeRotation::new(0.0, 0.0, FRAC_PI_2);
        let view = rot.world_to_view(geo_to_vector(0.0, FRAC_PI_2));
        // With a 90° heading the pole appears along the view x axis.
        assert!(view.y.abs() < 1e-9);
        assert!(view.x.abs() > 0.999);
    }

    #[test]
    fn test_antipode_is_hidden_hemisphere() {
        let rot = GlobeRotation::new(0.0, 0.0, 0.0);
        let view = rot.world_to_view(geo_to_vector(PI, 0.0));
        assert!(view.z < 0.0);
    }
}
