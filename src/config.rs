//! Designer configuration loaded from TOML
//!
//! ```toml
//! [canvas]
//! width = 1024
//! height = 768
//!
//! [view]
//! max_zoom = 4.0
//!
//! [colors]
//! stage = "#202060"
//! ```
//!
//! Every section and field is optional.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::interaction::ViewConfig;
use crate::layout::CanvasConfig;
use crate::stylesheet::{Palette, PaletteError};

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<PaletteError> for ConfigError {
    fn from(err: PaletteError) -> Self {
        match err {
            PaletteError::IoError(e) => ConfigError::Io(e),
            PaletteError::ParseError(e) => ConfigError::Parse(e),
            PaletteError::InvalidColor { token, value } => ConfigError::invalid(
                format!("colors.{}", token),
                format!("'{}' is not a #rrggbb or #rrggbbaa colour", value),
            ),
        }
    }
}

/// Complete designer configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DesignerConfig {
    pub canvas: CanvasConfig,
    pub view: ViewConfig,
    /// Overrides merged over the default palette
    pub colors: Palette,
}

impl DesignerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(mut self, canvas: CanvasConfig) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn with_view(mut self, view: ViewConfig) -> Self {
        self.view = view;
        self
    }

    pub fn with_colors(mut self, colors: Palette) -> Self {
        self.colors = colors;
        self
    }

    /// Load and validate a configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse and validate a configuration string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: DesignerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the planner, renderer or controller cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let canvas = &self.canvas;
        for (field, value) in [
            ("canvas.width", canvas.width),
            ("canvas.height", canvas.height),
            ("canvas.pixels_per_meter", canvas.pixels_per_meter),
            ("canvas.grid_spacing", canvas.grid_spacing),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::invalid(field, "must be positive and finite"));
            }
        }
        if !(canvas.padding >= 0.0 && canvas.padding.is_finite()) {
            return Err(ConfigError::invalid(
                "canvas.padding",
                "must be finite and not negative",
            ));
        }

        let view = &self.view;
        if !(view.min_zoom > 0.0) {
            return Err(ConfigError::invalid("view.min_zoom", "must be positive"));
        }
        if !view.max_zoom.is_finite() {
            return Err(ConfigError::invalid("view.max_zoom", "must be finite"));
        }
        if view.min_zoom > view.max_zoom {
            return Err(ConfigError::invalid(
                "view.min_zoom",
                format!("{} exceeds max_zoom {}", view.min_zoom, view.max_zoom),
            ));
        }
        if !(view.zoom_step > 1.0 && view.zoom_step.is_finite()) {
            return Err(ConfigError::invalid("view.zoom_step", "must be greater than 1"));
        }
        if view.double_tap_ms < 0.0 || view.double_tap_slop < 0.0 {
            return Err(ConfigError::invalid(
                "view.double_tap",
                "timing and slop must not be negative",
            ));
        }

        self.colors.validate()?;
        Ok(())
    }
}
