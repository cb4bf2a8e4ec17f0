//! Generic scanline path for projections without a closed-form shortcut.

use super::disk_row_bounds;
use globe_common::ScreenRect;
use projection::Viewport;

/// Delegates every pixel to the viewport's screen/geo capability. No
/// incremental shortcut is taken; the capability is evaluated afresh per
/// exact sample.
#[derive(Debug)]
pub struct GenericPath<'v> {
    viewport: &'v Viewport,
    clip_radius: f64,
}

impl<'v> GenericPath<'v> {
    pub fn new(viewport: &'v Viewport) -> Self {
        Self {
            viewport,
            clip_radius: viewport.clip_radius().unwrap_or(viewport.radius()),
        }
    }

    pub(super) fn geo_at(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        self.viewport.screen_to_geo(x, y)
    }

    pub(super) fn disk_bounds(&self, y: usize, rect: &ScreenRect) -> Option<(i64, i64)> {
        disk_row_bounds(
            self.viewport.center_x(),
            self.viewport.center_y(),
            self.clip_radius,
            y,
            rect,
        )
    }
}
