//! Renders a synthetic checkerboard overlay under every projection and
//! reports how much of the canvas each frame covers.

use anyhow::Result;
use globe_common::{Canvas, GeoBox, MapQuality, RasterImage, ScreenRect};
use projection::{AzimuthalEquidistant, Projection, Viewport};
use renderer::{default_pool, OverlayRenderer, PaintTarget};
use std::sync::Arc;

struct ReportPaint {
    label: &'static str,
}

impl PaintTarget for ReportPaint {
    fn composite(&mut self, rect: ScreenRect, canvas: &Canvas) {
        let opaque = canvas
            .data()
            .chunks_exact(4)
            .filter(|p| p[3] != 0)
            .count();
        println!(
            "{:16} rect {}x{} at ({}, {}), {} overlay pixels",
            self.label,
            rect.width(),
            rect.height(),
            rect.left,
            rect.top,
            opaque
        );
    }
}

fn checkerboard(width: usize, height: usize) -> Result<Arc<RasterImage>> {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let cell = ((x / 16) + (y / 16)) % 2;
            let (r, g, b) = if cell == 0 { (30, 90, 200) } else { (240, 240, 240) };
            data.extend_from_slice(&[r, g, b, 255]);
        }
    }
    Ok(Arc::new(RasterImage::from_rgba(width, height, data)?))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "renderer=debug".into()),
        )
        .init();

    let image = checkerboard(512, 256)?;
    let geo_box = GeoBox::from_degrees(-50.0, -30.0, 70.0, 50.0);
    let pool = default_pool()?;

    for (label, projection) in [
        ("equirectangular", Projection::Equirectangular),
        ("mercator", Projection::Mercator),
        ("spherical", Projection::Spherical),
        ("azimuthal", Projection::Generic),
    ] {
        let viewport = Viewport::new(projection, 960, 720, 300.0, 0.2, 0.3)?;
        let viewport = match projection {
            Projection::Generic => viewport.with_generic(Arc::new(AzimuthalEquidistant::new())),
            _ => viewport,
        };
        let mut renderer = OverlayRenderer::new(
            viewport,
            ScreenRect::of_size(960, 720),
            image.clone(),
            geo_box,
            MapQuality::High,
            pool.clone(),
        )?;
        let mut paint = ReportPaint { label };
        renderer.render_image(&mut paint);
    }

    Ok(())
}
