//! Venue Designer - an interactive 2D event-venue layout canvas
//!
//! This library provides the layout model and planner, a canvas renderer
//! (display list, SVG and raster output), the pan/zoom/drag interaction
//! controller, and the bridge to a generative-AI service that proposes
//! layouts and renders photorealistic previews.
//!
//! # Example
//!
//! ```rust
//! use venue_designer::{InputEvent, ItemKind, Point, SvgConfig, VenueDesigner};
//!
//! let mut designer = VenueDesigner::default();
//! let id = designer.add_item(ItemKind::RoundTable);
//!
//! designer.handle_input(InputEvent::PointerDown(Point::new(30.0, 30.0)));
//! designer.handle_input(InputEvent::PointerMove(Point::new(130.0, 80.0)));
//! designer.handle_input(InputEvent::PointerUp);
//!
//! let table = designer.layout().get(&id).unwrap();
//! assert_eq!((table.x, table.y), (120.0, 70.0));
//! assert!(designer.svg(&SvgConfig::default()).contains("<svg"));
//! ```

pub mod bridge;
pub mod config;
pub mod designer;
pub mod interaction;
pub mod layout;
pub mod notify;
pub mod renderer;
pub mod session;
pub mod stylesheet;

pub use bridge::{BridgeError, GeminiClient, ImageData, LayoutBridge, LayoutRequest};
pub use config::{ConfigError, DesignerConfig};
pub use designer::VenueDesigner;
pub use interaction::{Controller, InputEvent, Response, ViewConfig, ViewTransform};
pub use layout::{
    plan_layout, plan_variant, CanvasConfig, ItemId, ItemKind, Layout, LayoutError, LayoutItem,
    PlanVariant, Point,
};
pub use notify::{NotificationSink, Toast, ToastLevel};
pub use renderer::{render_svg, Background, RasterError, SvgConfig};
pub use session::{AsyncOp, OpStatus};
pub use stylesheet::{Palette, PaletteError, Rgba};

use thiserror::Error;

/// Errors that can occur anywhere between loading a layout and writing an image
#[derive(Debug, Error)]
pub enum DesignerError {
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("palette error: {0}")]
    Palette(#[from] PaletteError),

    #[error("raster error: {0}")]
    Raster(#[from] RasterError),

    #[error("AI service error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Render a layout JSON document to SVG with the default canvas, view and palette
///
/// # Example
///
/// ```rust
/// use venue_designer::render_layout_json;
///
/// let svg = render_layout_json(
///     r#"[{"id": "df-1", "type": "dance-floor", "x": 340, "y": 240, "width": 120, "height": 120}]"#,
/// ).unwrap();
/// assert!(svg.contains("vd-dance-floor"));
/// ```
pub fn render_layout_json(json: &str) -> Result<String, DesignerError> {
    let layout = Layout::from_json(json)?;
    let config = DesignerConfig::default();
    let scene = renderer::build_scene(
        &layout,
        &ViewTransform::identity(),
        &Background::None,
        &config.canvas,
        &config.colors,
    );
    Ok(render_svg(&scene, &SvgConfig::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_layout_json() {
        let svg = render_layout_json(
            r#"[{"id": "rt-1", "type": "round-table", "x": 36, "y": 36, "width": 48, "height": 48}]"#,
        )
        .unwrap();
        assert!(svg.contains("<circle"));
        assert!(svg.contains(r#"id="rt-1""#));
    }

    #[test]
    fn test_render_layout_json_dimension_mismatch() {
        let err = render_layout_json(
            r#"[{"id": "rt-1", "type": "round-table", "x": 0, "y": 0, "width": 10, "height": 10}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, DesignerError::Layout(_)));
        assert!(err.to_string().starts_with("layout error:"));
    }

    #[test]
    fn test_render_layout_json_not_json() {
        assert!(render_layout_json("nope").is_err());
    }
}
