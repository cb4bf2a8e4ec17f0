//! Interpolation step selection.

use globe_common::MapQuality;
use projection::Viewport;

/// Smallest step: every pixel is sampled exactly.
pub const MIN_STEP: usize = 1;

/// Exclusive upper bound of the even-division search.
pub const MAX_STEP: usize = 48;

/// Step used while the globe occupies only part of the viewport; the
/// coarse approximation error is masked by the small screen footprint.
const SMALL_GLOBE_STEP: usize = 8;

/// Choose the number of screen pixels between two exact geographic samples
/// within a scanline.
///
/// Print quality always samples exactly. Otherwise the search favors a step
/// that divides the row width as evenly as possible, because the leftover
/// short interval at the row end is where interpolation error is most
/// visible.
pub fn interpolation_step(viewport: &Viewport, quality: MapQuality) -> usize {
    if quality == MapQuality::Print {
        return MIN_STEP;
    }
    if !viewport.globe_covers_viewport() {
        return SMALL_GLOBE_STEP;
    }

    let span = viewport.width().saturating_sub(1).max(1);
    let mut best = MIN_STEP;
    let mut best_score = usize::MAX;
    for n in MIN_STEP..MAX_STEP {
        // Short-tail remainder plus the number of exact evaluations.
        let score = span % n + span / n;
        if score < best_score {
            best_score = score;
            best = n;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection::Projection;

    fn covering_viewport(width: usize) -> Viewport {
        // A radius large enough that the map covers the whole screen.
        Viewport::new(
            Projection::Equirectangular,
            width,
            width / 2,
            width as f64,
            0.0,
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn test_print_quality_is_exact() {
        for width in [16, 720, 1920] {
            let vp = covering_viewport(width);
            assert_eq!(interpolation_step(&vp, MapQuality::Print), 1);
        }
    }

    #[test]
    fn test_step_always_in_range() {
        for width in [2, 7, 480, 719, 720, 1080, 1921, 3840] {
            let vp = covering_viewport(width);
            for quality in [MapQuality::Low, MapQuality::Normal, MapQuality::High] {
                let n = interpolation_step(&vp, quality);
                assert!((MIN_STEP..MAX_STEP).contains(&n), "width {}: n = {}", width, n);
            }
        }
    }

    #[test]
    fn test_small_globe_uses_coarse_step() {
        let vp = Viewport::new(Projection::Spherical, 1000, 1000, 50.0, 0.0, 0.0).unwrap();
        assert!(!vp.globe_covers_viewport());
        assert_eq!(interpolation_step(&vp, MapQuality::Normal), 8);
    }

    #[test]
    fn test_even_division_preferred() {
        // 481 pixels: span 480 divides exactly by many candidates; the
        // chosen step must leave no shorter tail than a neighboring step.
        let vp = covering_viewport(481);
        let n = interpolation_step(&vp, MapQuality::Normal);
        assert_eq!(480 % n, 0);
    }
}
