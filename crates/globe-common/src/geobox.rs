//! Geographic bounding box with antimeridian support.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Smallest longitude/latitude span a box may have before the pixel-scale
/// computation divides by (near) zero.
pub const MIN_EXTENT: f64 = 1e-10;

/// A longitude/latitude rectangle in radians.
///
/// `south < north` always holds for a valid box. `west > east` is a valid
/// state meaning the box wraps across the antimeridian (±180°); all
/// longitude arithmetic on this type accounts for that wrap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoBox {
    /// Create a new box from edge coordinates in radians.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Create a new box from edge coordinates in degrees.
    pub fn from_degrees(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self::new(
            west.to_radians(),
            south.to_radians(),
            east.to_radians(),
            north.to_radians(),
        )
    }

    /// Check that the box has usable extent in both dimensions.
    ///
    /// Samplers divide by `width()` and `height()`, so a degenerate box must
    /// be rejected before any pixel scale is derived from it.
    pub fn validate(&self) -> Result<(), GeoBoxError> {
        if self.height() < MIN_EXTENT {
            return Err(GeoBoxError::EmptyLatitudeSpan {
                south: self.south,
                north: self.north,
            });
        }
        if self.width() < MIN_EXTENT {
            return Err(GeoBoxError::EmptyLongitudeSpan {
                west: self.west,
                east: self.east,
            });
        }
        Ok(())
    }

    /// Longitude span in radians, always non-negative.
    ///
    /// A box with `west > east` wraps across the antimeridian and its width
    /// includes the wrapped portion.
    pub fn width(&self) -> f64 {
        if self.east >= self.west {
            self.east - self.west
        } else {
            self.east - self.west + TAU
        }
    }

    /// Latitude span in radians.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Whether the box straddles the antimeridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Angular distance of `lon` east of the western edge, in `[0, 2π)`.
    ///
    /// The western edge maps to 0 and the eastern edge maps to `width()`;
    /// longitudes outside the box map past `width()`.
    pub fn lon_offset(&self, lon: f64) -> f64 {
        (lon - self.west).rem_euclid(TAU)
    }

    /// Angular distance of `lat` north of the southern edge.
    pub fn lat_offset(&self, lat: f64) -> f64 {
        lat - self.south
    }

    /// Check if a geographic coordinate is contained in this box.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if lat < self.south || lat > self.north {
            return false;
        }
        self.lon_offset(lon) <= self.width()
    }

    /// Wrap-aware test of whether `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &GeoBox) -> bool {
        other.south >= self.south
            && other.north <= self.north
            && self.lon_offset(other.west) + other.width() <= self.width()
    }

    /// Wrap-aware overlap test against another box.
    ///
    /// Used as the cheap early-exit guard before any rendering work: if the
    /// overlay box and the viewport's visible box do not overlap, the frame
    /// is a no-op.
    pub fn intersects(&self, other: &GeoBox) -> bool {
        let lat_overlap = self.south < other.north && self.north > other.south;
        if !lat_overlap {
            return false;
        }
        // Two arcs on the longitude circle overlap iff either one's western
        // edge falls inside the other.
        self.lon_offset(other.west) <= self.width() || other.lon_offset(self.west) <= other.width()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeoBoxError {
    #[error("latitude span is empty: south={south}, north={north}")]
    EmptyLatitudeSpan { south: f64, north: f64 },

    #[error("longitude span is empty: west={west}, east={east}")]
    EmptyLongitudeSpan { west: f64, east: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_width_simple() {
        let bbox = GeoBox::from_degrees(10.0, 0.0, 30.0, 10.0);
        assert!((bbox.width() - 20.0_f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_width_wrapping() {
        // 170°E to 170°W: 20° wide across the antimeridian
        let bbox = GeoBox::from_degrees(170.0, -10.0, -170.0, 10.0);
        assert!(bbox.crosses_antimeridian());
        assert!((bbox.width() - 20.0_f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_contains_wrapping() {
        let bbox = GeoBox::from_degrees(170.0, -10.0, -170.0, 10.0);
        assert!(bbox.contains(PI, 0.0)); // 180° is inside
        assert!(bbox.contains(175.0_f64.to_radians(), 0.0));
        assert!(bbox.contains((-175.0_f64).to_radians(), 0.0));
        assert!(!bbox.contains(0.0, 0.0));
        assert!(!bbox.contains(PI, 0.3)); // latitude out of range
    }

    #[test]
    fn test_lon_offset_wrapping() {
        let bbox = GeoBox::from_degrees(170.0, -10.0, -170.0, 10.0);
        // 180° is 10° east of the western edge
        assert!((bbox.lon_offset(PI) - 10.0_f64.to_radians()).abs() < 1e-12);
        // Eastern edge maps to the full width
        let east = (-170.0_f64).to_radians();
        assert!((bbox.lon_offset(east) - bbox.width()).abs() < 1e-12);
    }

    #[test]
    fn test_validate_degenerate() {
        let flat = GeoBox::from_degrees(0.0, 5.0, 10.0, 5.0);
        assert!(matches!(
            flat.validate(),
            Err(GeoBoxError::EmptyLatitudeSpan { .. })
        ));

        let thin = GeoBox::from_degrees(5.0, 0.0, 5.0, 10.0);
        assert!(matches!(
            thin.validate(),
            Err(GeoBoxError::EmptyLongitudeSpan { .. })
        ));

        let ok = GeoBox::from_degrees(0.0, 0.0, 10.0, 10.0);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_intersects_disjoint_hemispheres() {
        let southern = GeoBox::from_degrees(-20.0, -60.0, 20.0, -30.0);
        let northern = GeoBox::from_degrees(-20.0, 30.0, 20.0, 60.0);
        assert!(!southern.intersects(&northern));
        assert!(!northern.intersects(&southern));
    }

    #[test]
    fn test_intersects_across_antimeridian() {
        let wrapping = GeoBox::from_degrees(170.0, -10.0, -170.0, 10.0);
        let eastern = GeoBox::from_degrees(-175.0, -5.0, -160.0, 5.0);
        let far_away = GeoBox::from_degrees(0.0, -5.0, 20.0, 5.0);
        assert!(wrapping.intersects(&eastern));
        assert!(eastern.intersects(&wrapping));
        assert!(!wrapping.intersects(&far_away));
    }
}
