//! Cartographic projections for globe-overlay rendering.
//!
//! Implements the forward and inverse screen mappings from scratch for the
//! closed set of projections the renderer supports.

pub mod generic;
pub mod mercator;
pub mod spherical;
pub mod viewport;

use serde::{Deserialize, Serialize};

pub use generic::{AzimuthalEquidistant, GenericProjection};
pub use spherical::GlobeRotation;
pub use viewport::Viewport;

/// The closed set of projection kinds the renderer dispatches over.
///
/// `Generic` covers azimuthal and other projections without a closed-form
/// scanline shortcut; those go through the viewport's screen/geo capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    Spherical,
    Mercator,
    Equirectangular,
    Generic,
}

/// Wrap a longitude into `[-π, π]`.
pub fn normalize_lon(lon: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    (lon + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_normalize_lon() {
        assert!((normalize_lon(0.0)).abs() < 1e-12);
        assert!((normalize_lon(PI + 0.1) - (-PI + 0.1)).abs() < 1e-12);
        assert!((normalize_lon(-PI - 0.1) - (PI - 0.1)).abs() < 1e-12);
        assert!((normalize_lon(2.5 * PI) - 0.5 * PI).abs() < 1e-9);
    }
}
