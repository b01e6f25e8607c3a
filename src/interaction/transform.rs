//! Affine view transform (uniform zoom + pan) between canvas and screen space
//!
//! A canvas point `p` appears on screen at `p * zoom + pan`. Rendering
//! translates by the pan and then scales by the zoom; pointer input is mapped
//! back through the inverse.

use serde::Deserialize;

use crate::layout::Point;

/// Zoom limits and step sizes for view navigation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Smallest allowed zoom factor
    pub min_zoom: f64,

    /// Largest allowed zoom factor
    pub max_zoom: f64,

    /// Multiplier applied per wheel notch
    pub zoom_step: f64,

    /// Maximum gap between two taps for a double tap, in milliseconds
    pub double_tap_ms: f64,

    /// Maximum distance between two taps for a double tap, in screen pixels
    pub double_tap_slop: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.5,
            max_zoom: 3.0,
            zoom_step: 1.1,
            double_tap_ms: 300.0,
            double_tap_slop: 16.0,
        }
    }
}

impl ViewConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the zoom limits
    pub fn with_zoom_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_zoom = min;
        self.max_zoom = max;
        self
    }

    /// Set the wheel zoom step
    pub fn with_zoom_step(mut self, step: f64) -> Self {
        self.zoom_step = step;
        self
    }

    /// Clamp a zoom factor into the configured range
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}

/// Current zoom and pan of the canvas view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub fn new(zoom: f64, pan_x: f64, pan_y: f64) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    /// `zoom = 1`, no pan
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Map a canvas point to screen space
    pub fn to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.zoom + self.pan_x,
            canvas.y * self.zoom + self.pan_y,
        )
    }

    /// Map a screen point back to canvas space
    pub fn to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan_x) / self.zoom,
            (screen.y - self.pan_y) / self.zoom,
        )
    }

    /// Shift the view by a screen-space delta
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Change the zoom while keeping the canvas point under `anchor` fixed on screen.
    ///
    /// `new_zoom` is clamped to the configured bounds first:
    /// `pan' = anchor - (anchor - pan) * (zoom' / zoom)`.
    pub fn zoom_about(&mut self, anchor: Point, new_zoom: f64, config: &ViewConfig) {
        let new_zoom = config.clamp_zoom(new_zoom);
        let ratio = new_zoom / self.zoom;
        self.pan_x = anchor.x - (anchor.x - self.pan_x) * ratio;
        self.pan_y = anchor.y - (anchor.y - self.pan_y) * ratio;
        self.zoom = new_zoom;
    }

    /// One wheel notch about `anchor`: negative `delta_y` zooms in
    pub fn wheel_zoom(&mut self, anchor: Point, delta_y: f64, config: &ViewConfig) {
        let target = if delta_y < 0.0 {
            self.zoom * config.zoom_step
        } else {
            self.zoom / config.zoom_step
        };
        self.zoom_about(anchor, target, config);
    }

    /// Back to the default view
    pub fn reset(&mut self) {
        *self = Self::identity();
    }

    /// Screen-space length of `pixels` canvas units drawn at a constant on-screen size
    pub fn screen_constant(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }
}
