//! Geographic sampling of the overlay image.
//!
//! A [`Sampler`] binds one source image to its geographic anchoring box and
//! answers color lookups by coordinate:
//!
//! - single-pixel nearest or bilinear sampling,
//! - incremental span interpolation that approximates a run of screen
//!   pixels from one exact sample to the next, assuming linear travel in
//!   image-pixel space, with an explicit antimeridian branch where that
//!   assumption breaks.
//!
//! Sampling never fails: coordinates outside the anchoring box produce a
//! fully transparent color and `hit = false`.

use globe_common::canvas::write_pixel;
use globe_common::{GeoBox, RasterImage, RenderResult, Rgba};
use projection::normalize_lon;
use std::f64::consts::{PI, TAU};

/// The previously evaluated exact sample, basis of the incremental span
/// interpolation. Valid only within one scanline; reset at every row start.
#[derive(Debug, Clone, Copy)]
struct PrevSample {
    lon: f64,
    lat: f64,
    px: f64,
    py: f64,
}

/// Samples one source image bound to one geographic box.
///
/// Carries mutable per-scanline state, so every render job owns its own
/// instance; sharing one across threads would interpolate from a stale
/// sample of another row.
#[derive(Debug)]
pub struct Sampler<'a> {
    image: &'a RasterImage,
    geo_box: GeoBox,
    /// Image pixels per radian of longitude.
    scale_x: f64,
    /// Image pixels per radian of latitude.
    scale_y: f64,
    prev: Option<PrevSample>,
}

impl<'a> Sampler<'a> {
    /// Bind `image` to `geo_box`. Rejects a degenerate box, which would
    /// make the pixel scales divide by zero.
    pub fn new(image: &'a RasterImage, geo_box: GeoBox) -> RenderResult<Self> {
        geo_box.validate()?;
        Ok(Self {
            image,
            geo_box,
            scale_x: image.width() as f64 / geo_box.width(),
            scale_y: image.height() as f64 / geo_box.height(),
            prev: None,
        })
    }

    pub fn geo_box(&self) -> &GeoBox {
        &self.geo_box
    }

    /// Forget the cached previous sample. Called at every row start: the
    /// incremental fast path must never reach across scanlines.
    pub fn reset(&mut self) {
        self.prev = None;
    }

    /// Fractional image-pixel position of a geographic coordinate, or
    /// `None` outside the box. Row 0 is the box's northern edge.
    fn geo_to_image(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !self.geo_box.contains(lon, lat) {
            return None;
        }
        let px = self.geo_box.lon_offset(lon) * self.scale_x;
        let py = (self.geo_box.north - lat) * self.scale_y;
        Some((px, py))
    }

    /// Nearest-pixel lookup. Out-of-box coordinates yield a transparent
    /// color and `hit = false`.
    pub fn sample_nearest(&self, lon: f64, lat: f64) -> (Rgba, bool) {
        match self.geo_to_image(lon, lat) {
            Some((px, py)) => (self.nearest_pixel(px, py), true),
            None => (Rgba::TRANSPARENT, false),
        }
    }

    /// Sub-pixel bilinear lookup with the same out-of-box contract. At the
    /// image edges the blend degrades to 1-D interpolation or the nearest
    /// pixel value.
    pub fn sample_bilinear(&self, lon: f64, lat: f64) -> (Rgba, bool) {
        match self.geo_to_image(lon, lat) {
            Some((px, py)) => (self.bilinear_pixel(px, py), true),
            None => (Rgba::TRANSPARENT, false),
        }
    }

    /// Exact sample that also refreshes the previous-sample cache. `fine`
    /// selects bilinear blending over nearest lookup.
    pub fn sample(&mut self, lon: f64, lat: f64, fine: bool) -> (Rgba, bool) {
        match self.geo_to_image(lon, lat) {
            Some((px, py)) => {
                self.prev = Some(PrevSample { lon, lat, px, py });
                let color = if fine {
                    self.bilinear_pixel(px, py)
                } else {
                    self.nearest_pixel(px, py)
                };
                (color, true)
            }
            None => {
                self.prev = None;
                (Rgba::TRANSPARENT, false)
            }
        }
    }

    /// Whether the incremental fast path has a sample to interpolate from.
    pub fn has_prev(&self) -> bool {
        self.prev.is_some()
    }

    /// Fill `count` pixels of `row` starting at `x_start`, ending with the
    /// exact sample of `(lon, lat)` at `x_start + count - 1`; the preceding
    /// `count - 1` pixels are approximated from the cached previous sample.
    ///
    /// The approximation assumes the image-pixel path between the two
    /// samples is linear. That fails across the antimeridian: when the
    /// longitude delta reaches π in magnitude, the intermediate positions
    /// are re-derived as genuine geographic coordinates instead, stepping
    /// by `Δlat/count` and the wrap-aware `Δlon/count` in the direction of
    /// travel, and each one is sampled exactly.
    ///
    /// Returns whether the final exact sample hit the box.
    pub fn interpolate_span(
        &mut self,
        row: &mut [u8],
        x_start: usize,
        count: usize,
        lon: f64,
        lat: f64,
        fine: bool,
    ) -> bool {
        let Some(prev) = self.prev else {
            // No cached sample: nothing to interpolate from. The caller
            // gates on `has_prev`, so only the exact tail sample is owed.
            let (color, hit) = self.sample(lon, lat, fine);
            write_pixel(row, x_start + count - 1, color);
            return hit;
        };

        let steps = count as f64;
        if (lon - prev.lon).abs() >= PI {
            // Crossing the antimeridian: linear pixel travel is invalid.
            let mut dlon = lon - prev.lon;
            if dlon > PI {
                dlon -= TAU;
            } else if dlon < -PI {
                dlon += TAU;
            }
            let dlon = dlon / steps;
            let dlat = (lat - prev.lat) / steps;
            for i in 1..count {
                let ilon = normalize_lon(prev.lon + dlon * i as f64);
                let ilat = prev.lat + dlat * i as f64;
                let (color, _) = if fine {
                    self.sample_bilinear(ilon, ilat)
                } else {
                    self.sample_nearest(ilon, ilat)
                };
                write_pixel(row, x_start + i - 1, color);
            }
        } else {
            // Linear travel in image-pixel space. The target position is
            // derived from the signed longitude delta so that a sample just
            // outside the box walks off the image edge instead of wrapping
            // through it.
            let px = prev.px + normalize_lon(lon - prev.lon) * self.scale_x;
            let py = prev.py + (prev.lat - lat) * self.scale_y;
            let dpx = (px - prev.px) / steps;
            let dpy = (py - prev.py) / steps;
            for i in 1..count {
                let fpx = prev.px + dpx * i as f64;
                let fpy = prev.py + dpy * i as f64;
                write_pixel(row, x_start + i - 1, self.pixel_or_transparent(fpx, fpy, fine));
            }
        }

        let (color, hit) = self.sample(lon, lat, fine);
        write_pixel(row, x_start + count - 1, color);
        hit
    }

    /// Lookup at a fractional image position that may lie outside the image.
    fn pixel_or_transparent(&self, fpx: f64, fpy: f64, fine: bool) -> Rgba {
        let w = self.image.width() as f64;
        let h = self.image.height() as f64;
        if fpx < 0.0 || fpy < 0.0 || fpx > w || fpy > h {
            return Rgba::TRANSPARENT;
        }
        if fine {
            self.bilinear_pixel(fpx, fpy)
        } else {
            self.nearest_pixel(fpx, fpy)
        }
    }

    fn nearest_pixel(&self, fpx: f64, fpy: f64) -> Rgba {
        let x = (fpx as usize).min(self.image.width() - 1);
        let y = (fpy as usize).min(self.image.height() - 1);
        self.image.pixel(x, y)
    }

    fn bilinear_pixel(&self, fpx: f64, fpy: f64) -> Rgba {
        let w = self.image.width();
        let h = self.image.height();

        // Pixel centers sit at integer + 0.5.
        let fx = fpx - 0.5;
        let fy = fpy - 0.5;
        let x0f = fx.floor().max(0.0);
        let y0f = fy.floor().max(0.0);
        let x0 = (x0f as usize).min(w - 1);
        let y0 = (y0f as usize).min(h - 1);
        let x1 = (x0 + 1).min(w - 1);
        let y1 = (y0 + 1).min(h - 1);
        let tx = (fx - x0 as f64).clamp(0.0, 1.0);
        let ty = (fy - y0 as f64).clamp(0.0, 1.0);

        Rgba::bilinear(
            self.image.pixel(x0, y0),
            self.image.pixel(x1, y0),
            self.image.pixel(x0, y1),
            self.image.pixel(x1, y1),
            tx,
            ty,
        )
    }
}
