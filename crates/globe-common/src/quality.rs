//! Rendering quality tiers.

use serde::{Deserialize, Serialize};

/// Map rendering quality, trading sampling accuracy for speed.
///
/// The tier controls three independent knobs:
/// - whether a computed scanline may be duplicated into the next one
///   instead of recomputing it (`Low` only),
/// - whether sub-pixel bilinear blending is used when sampling
///   (`High`/`Print`) versus nearest-pixel lookup (`Low`/`Normal`),
/// - the interpolation step size (`Print` forces exact per-pixel sampling).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapQuality {
    Low,
    Normal,
    High,
    Print,
}

impl MapQuality {
    /// Whether adjacent scanlines may be duplicated instead of recomputed.
    pub fn duplicates_scanlines(self) -> bool {
        matches!(self, MapQuality::Low)
    }

    /// Whether samples use sub-pixel bilinear blending.
    pub fn bilinear_sampling(self) -> bool {
        matches!(self, MapQuality::High | MapQuality::Print)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_knobs() {
        assert!(MapQuality::Low.duplicates_scanlines());
        assert!(!MapQuality::Normal.duplicates_scanlines());
        assert!(!MapQuality::Print.duplicates_scanlines());

        assert!(!MapQuality::Low.bilinear_sampling());
        assert!(!MapQuality::Normal.bilinear_sampling());
        assert!(MapQuality::High.bilinear_sampling());
        assert!(MapQuality::Print.bilinear_sampling());
    }
}
