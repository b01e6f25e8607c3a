//! AI layout bridge: the contract the designer consumes for generative features
//!
//! Generation is slow and network-bound, so every method is async. The trait
//! is `?Send` because the designer lives on a single UI thread.

pub mod gemini;
pub mod parse;
pub mod prompt;
pub mod types;

use async_trait::async_trait;

pub use gemini::{GeminiClient, GeminiConfig};
pub use parse::parse_layout_response;
pub use types::{BridgeError, ImageData, LayoutRequest, RenderRequest};

use crate::layout::Layout;

/// Generative services behind the designer's AI actions
#[async_trait(?Send)]
pub trait LayoutBridge {
    /// Propose a layout for a description, optionally fitted to a venue photo.
    ///
    /// The returned layout obeys the fixed-dimension and unique-id rules.
    async fn request_layout(&self, request: &LayoutRequest) -> Result<Layout, BridgeError>;

    /// Compose a preview of the layout inside the venue photo; returns an image URL
    async fn request_photorealistic_render(
        &self,
        request: &RenderRequest,
    ) -> Result<String, BridgeError>;

    /// Generate an overhead background image for a theme; returns an image URL
    async fn request_ambience(&self, description: &str) -> Result<String, BridgeError>;

    /// Clean up dictated text
    async fn correct_text(&self, text: &str) -> Result<String, BridgeError>;
}
