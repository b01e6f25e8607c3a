//! Canvas renderer
//!
//! Rendering is split in three steps: [`build_scene`] turns the layout and
//! view into a display list, [`render_svg`] serialises it, and
//! [`rasterize`] turns the SVG into pixels.

pub mod config;
pub mod raster;
pub mod scene;
pub mod svg;

pub use config::SvgConfig;
pub use raster::{rasterize, render_png, RasterError};
pub use scene::{build_scene, Background, DrawCommand, ItemStyle, Scene, Shadow};
pub use svg::render_svg;
