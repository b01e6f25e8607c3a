//! Colour palette for drawing venue items
//!
//! Each item kind has a fill colour keyed by its wire name (`round-table`,
//! `stage`, ...), plus a handful of shared tokens (`stroke`, `shadow`,
//! `grid`, `unknown`). Palettes are TOML tables of `#rrggbb` or `#rrggbbaa`
//! strings; missing tokens fall back to the default palette.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::Deserialize;
use thiserror::Error;

use crate::layout::ItemKind;

/// Errors that can occur when loading or parsing palettes
#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("Failed to read palette file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse palette TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid colour '{value}' for token '{token}' (expected #rrggbb or #rrggbbaa)")]
    InvalidColor { token: String, value: String },
}

/// An 8-bit RGBA colour, straight (not premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Colour without alpha, as `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a 0..=1 opacity
    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

/// Used when a token resolves nowhere
const FALLBACK: Rgba = Rgba::new(0x80, 0x80, 0x80, 0xff);

/// A palette mapping colour tokens to hex values
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    /// Colour mappings: token name -> hex colour
    pub colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlPalette {
    colors: HashMap<String, String>,
}

/// Default palette matching the reference venue designer
const DEFAULT_PALETTE: &str = r##"
[colors]
# Item fills
round-table = "#e6e6e6f2"
rect-table = "#e6e6e6f2"
dance-floor = "#ffd84dd9"
stage = "#7a001fe6"

# Shared drawing tokens
stroke = "#00000099"
shadow = "#00000080"
grid = "#ffffff1a"
unknown = "#808080"
"##;

static DEFAULT: Lazy<Palette> = Lazy::new(|| {
    Palette::from_str(DEFAULT_PALETTE).expect("Default palette should be valid TOML")
});

impl Palette {
    /// Load palette from TOML file
    pub fn from_file(path: &Path) -> Result<Self, PaletteError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load palette from a TOML string with a `[colors]` table
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, PaletteError> {
        let parsed: TomlPalette = toml::from_str(content)?;
        let palette = Palette {
            colors: parsed.colors,
        };
        palette.validate()?;
        Ok(palette)
    }

    /// Check that every entry is a parseable colour
    pub fn validate(&self) -> Result<(), PaletteError> {
        for (token, value) in &self.colors {
            if Rgba::parse_hex(value).is_none() {
                return Err(PaletteError::InvalidColor {
                    token: token.clone(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    /// Resolve a token defined in this palette
    pub fn resolve(&self, token: &str) -> Option<Rgba> {
        self.colors.get(token).and_then(|s| Rgba::parse_hex(s))
    }

    /// Resolve a token with fallback to the default palette, then grey
    pub fn resolve_or_default(&self, token: &str) -> Rgba {
        if let Some(color) = self.resolve(token) {
            return color;
        }
        if let Some(color) = DEFAULT.resolve(token) {
            return color;
        }
        self.resolve("unknown").unwrap_or(FALLBACK)
    }

    /// Fill colour for an item kind
    pub fn fill(&self, kind: ItemKind) -> Rgba {
        self.resolve_or_default(kind.as_str())
    }

    pub fn stroke(&self) -> Rgba {
        self.resolve_or_default("stroke")
    }

    pub fn shadow(&self) -> Rgba {
        self.resolve_or_default("shadow")
    }

    pub fn grid(&self) -> Rgba {
        self.resolve_or_default("grid")
    }
}

impl Default for Palette {
    fn default() -> Self {
        DEFAULT.clone()
    }
}
