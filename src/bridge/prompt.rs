//! Prompt text sent to the generative models

use std::fmt::Write;

use super::types::LayoutRequest;
use crate::layout::{ItemKind, Layout};

/// Instructions for producing a layout as strict JSON
pub fn layout_prompt(request: &LayoutRequest) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are an event venue planner. Produce a floor plan for a canvas of {} x {} pixels \
         (24 pixels = 1 meter) for this event: {}",
        request.canvas_width,
        request.canvas_height,
        request.description.trim()
    );
    if request.reference_photo.is_some() {
        prompt.push_str(
            "The attached photo shows the real venue from above. Place the items so they fit \
             the visible floor space, avoiding walls, columns and other obstacles.\n",
        );
    }
    if let Some(dimensions) = request.venue_dimensions.as_deref() {
        let _ = writeln!(prompt, "The real venue measures {}.", dimensions.trim());
    }
    prompt.push_str("Use only these item types, always with exactly these sizes in pixels:\n");
    for kind in ItemKind::ALL {
        let (w, h) = kind.dimensions();
        let _ = writeln!(prompt, "- \"{}\": width {}, height {}", kind.as_str(), w, h);
    }
    prompt.push_str(
        "Items must stay inside the canvas and must not overlap. Answer with only a JSON array \
         of objects {\"id\", \"type\", \"x\", \"y\", \"width\", \"height\"} where x and y are \
         the top-left corner. No commentary.",
    );
    prompt
}

/// Instructions for compositing a layout into the venue photo
pub fn realistic_view_prompt(layout: &Layout, ambience: &str) -> String {
    let mut prompt = String::from(
        "Edit this photo of an event venue into a photorealistic 8K render of the venue set up \
         for an event. Furnish it following this floor plan (pixel coordinates, 24 pixels = 1 \
         meter, top-left origin):\n",
    );
    for item in layout {
        let _ = writeln!(
            prompt,
            "- {} at ({}, {}), {}x{}",
            item.kind().label().to_lowercase(),
            item.x,
            item.y,
            item.width(),
            item.height()
        );
    }
    let _ = write!(
        prompt,
        "Keep the architecture of the room unchanged. Ambience: {}.",
        ambience.trim()
    );
    prompt
}

/// Instructions for an overhead background image
pub fn ambience_prompt(description: &str) -> String {
    format!(
        "Create a background for an event venue with this theme: {}. The image must be a top-down \
         (overhead) atmospheric view, suitable as the background of a floor plan.",
        description.trim()
    )
}

/// Instructions for cleaning up dictated text
pub fn correction_prompt(text: &str) -> String {
    format!(
        "Correct the spelling, punctuation and grammar of the following dictated text. Keep its \
         language and meaning. Answer with only the corrected text.\n\n{}",
        text
    )
}
