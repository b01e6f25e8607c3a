//! Configuration for the venue canvas

use serde::Deserialize;

use super::types::Point;

/// Canvas geometry shared by the planner, the renderer and the toolbar
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Canvas width in pixels
    pub width: f64,

    /// Canvas height in pixels
    pub height: f64,

    /// Spacing the planner keeps between items and from the walls (1.5m)
    pub padding: f64,

    /// Scale implied by the fixed item dimensions
    pub pixels_per_meter: f64,

    /// Cell size of the placement grid, in canvas pixels
    pub grid_spacing: f64,

    /// Screen point under which toolbar-added items appear
    pub toolbar_origin: (f64, f64),
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            padding: 36.0,
            pixels_per_meter: 24.0,
            grid_spacing: 24.0,
            toolbar_origin: (20.0, 20.0),
        }
    }
}

impl CanvasConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canvas size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the planner padding
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Set the grid cell size
    pub fn with_grid_spacing(mut self, spacing: f64) -> Self {
        self.grid_spacing = spacing;
        self
    }

    pub fn toolbar_point(&self) -> Point {
        Point::new(self.toolbar_origin.0, self.toolbar_origin.1)
    }

    /// Convert a length in meters to canvas pixels
    pub fn meters_to_pixels(&self, meters: f64) -> f64 {
        meters * self.pixels_per_meter
    }
}
