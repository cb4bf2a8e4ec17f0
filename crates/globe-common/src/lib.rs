//! Common types shared across the globe-overlay crates.

pub mod canvas;
pub mod color;
pub mod error;
pub mod geobox;
pub mod image;
pub mod quality;
pub mod rect;

pub use canvas::{Canvas, CanvasBand};
pub use color::Rgba;
pub use error::{RenderError, RenderResult};
pub use geobox::{GeoBox, GeoBoxError};
pub use self::image::RasterImage;
pub use quality::MapQuality;
pub use rect::ScreenRect;
