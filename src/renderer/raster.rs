//! Rasterisation of rendered SVG into RGBA pixels
//!
//! Embedded `data:` images are decoded; remote image URLs are not fetched and
//! simply do not appear in the raster.

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;
use thiserror::Error;
use tracing::debug;

/// Largest raster edge we are willing to allocate
const MAX_DIM: u32 = 16_384;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("invalid SVG: {0}")]
    Svg(String),

    #[error("cannot allocate a {width}x{height} pixmap")]
    Allocation { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Rasterise an SVG document, scaling it to fill `width` x `height`
pub fn rasterize(svg: &str, width: u32, height: u32) -> Result<Pixmap, RasterError> {
    if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
        return Err(RasterError::Allocation { width, height });
    }
    let tree = usvg::Tree::from_str(svg, &usvg::Options::default())
        .map_err(|e| RasterError::Svg(e.to_string()))?;

    let mut pixmap =
        Pixmap::new(width, height).ok_or(RasterError::Allocation { width, height })?;

    let size = tree.size();
    let sx = width as f32 / size.width();
    let sy = height as f32 / size.height();
    debug!(width, height, sx, sy, "rasterizing svg");
    resvg::render(&tree, Transform::from_scale(sx, sy), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Rasterise an SVG document and encode it as PNG
pub fn render_png(svg: &str, width: u32, height: u32) -> Result<Vec<u8>, RasterError> {
    rasterize(svg, width, height)?
        .encode_png()
        .map_err(|e| RasterError::Encode(e.to_string()))
}
