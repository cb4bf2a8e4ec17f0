//! Orthographic (spherical globe) scanline path.

use super::disk_row_bounds;
use globe_common::ScreenRect;
use nalgebra::Vector3;
use projection::spherical::vector_to_geo;
use projection::{GlobeRotation, Viewport};

/// Inverse orthographic mapping: every pixel's position on the unit sphere
/// is reconstructed from its offset to the globe center and rotated by the
/// globe's current orientation to recover the geographic coordinate.
#[derive(Debug)]
pub struct SphericalPath {
    rotation: GlobeRotation,
    radius: f64,
    center_x: f64,
    center_y: f64,
}

impl SphericalPath {
    pub fn new(viewport: &Viewport) -> Self {
        Self {
            rotation: viewport.rotation().clone(),
            radius: viewport.radius(),
            center_x: viewport.center_x(),
            center_y: viewport.center_y(),
        }
    }

    /// Geographic coordinate under the screen position, or `None` off the
    /// globe disk.
    pub(super) fn geo_at(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let qx = (x - self.center_x) / self.radius;
        let qy = (self.center_y - y) / self.radius;
        let r2 = qx * qx + qy * qy;
        if r2 > 1.0 {
            return None;
        }
        // Clamped to the sphere surface when rounding puts us just outside.
        let qz = (1.0 - r2).max(0.0).sqrt();
        let world = self.rotation.view_to_world(Vector3::new(qx, qy, qz));
        Some(vector_to_geo(world))
    }

    pub(super) fn disk_bounds(&self, y: usize, rect: &ScreenRect) -> Option<(i64, i64)> {
        disk_row_bounds(self.center_x, self.center_y, self.radius, y, rect)
    }
}
