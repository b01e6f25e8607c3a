//! The venue designer aggregate driven by the host shell

use std::fmt;
use std::rc::Rc;

use tracing::{debug, info};

use crate::bridge::{ImageData, LayoutRequest};
use crate::config::DesignerConfig;
use crate::interaction::{Controller, InputEvent, Response, ViewTransform};
use crate::layout::{plan_variant, ItemId, ItemKind, Layout, PlanVariant};
use crate::notify::{NotificationSink, Toast, TracingSink};
use crate::renderer::{
    build_scene, render_png, render_svg, Background, RasterError, Scene, SvgConfig,
};
use crate::session::AsyncOp;

const DEFAULT_LAYOUT_PROMPT: &str =
    "Venue for 100 guests with a central dance floor and a stage at the back";
const DEFAULT_AMBIENCE_PROMPT: &str = "Luxury night garden wedding with fairy lights";
const DEFAULT_VENUE_DIMENSIONS: &str = "20m x 30m";

/// Everything one venue-planning canvas needs: the layout, the view and
/// interaction state, backgrounds, prompts and the AI busy state.
pub struct VenueDesigner {
    config: DesignerConfig,
    layout: Layout,
    controller: Controller,
    reference_photo: Option<ImageData>,
    ambience_url: Option<String>,
    preview_url: Option<String>,
    layout_prompt: String,
    ambience_prompt: String,
    venue_dimensions: String,
    busy: AsyncOp,
    notifier: Rc<dyn NotificationSink>,
}

impl fmt::Debug for VenueDesigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VenueDesigner")
            .field("items", &self.layout.len())
            .field("view", &self.controller.view())
            .field("has_photo", &self.reference_photo.is_some())
            .field("has_ambience", &self.ambience_url.is_some())
            .field("busy", &self.busy.is_busy())
            .finish()
    }
}

impl Default for VenueDesigner {
    fn default() -> Self {
        Self::new(DesignerConfig::default(), Rc::new(TracingSink))
    }
}

impl VenueDesigner {
    pub fn new(config: DesignerConfig, notifier: Rc<dyn NotificationSink>) -> Self {
        Self {
            controller: Controller::new(config.view.clone()),
            config,
            layout: Layout::new(),
            reference_photo: None,
            ambience_url: None,
            preview_url: None,
            layout_prompt: DEFAULT_LAYOUT_PROMPT.to_string(),
            ambience_prompt: DEFAULT_AMBIENCE_PROMPT.to_string(),
            venue_dimensions: DEFAULT_VENUE_DIMENSIONS.to_string(),
            busy: AsyncOp::new(),
            notifier,
        }
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn view(&self) -> ViewTransform {
        self.controller.view()
    }

    pub fn set_view(&mut self, view: ViewTransform) {
        self.controller.set_view(view);
    }

    /// Shared busy state of the AI actions
    pub fn busy(&self) -> &AsyncOp {
        &self.busy
    }

    pub fn notify(&self, toast: Toast) {
        self.notifier.notify(toast);
    }

    // -------------------------------------------------------------------------
    // Layout editing
    // -------------------------------------------------------------------------

    /// Add an item under the toolbar origin of the current view
    pub fn add_item(&mut self, kind: ItemKind) -> ItemId {
        let origin = self.view().to_canvas(self.config.canvas.toolbar_point());
        let id = self.layout.add_item(kind, origin).id().clone();
        debug!(item = %id, x = origin.x, y = origin.y, "added item");
        self.notify(Toast::success(format!("'{}' added.", kind.label())));
        id
    }

    /// Remove every item
    pub fn reset(&mut self) {
        self.layout.clear();
        info!("layout cleared");
    }

    /// Replace the layout with a procedural proposal
    pub fn apply_plan(&mut self, variant: PlanVariant) {
        let plan = plan_variant(variant, &self.config.canvas);
        self.replace_layout(plan);
    }

    /// Swap in a whole new layout, e.g. one returned by the AI
    pub fn replace_layout(&mut self, layout: Layout) -> Layout {
        info!(items = layout.len(), "replacing layout");
        self.layout.replace(layout)
    }

    /// Route one input event through the interaction controller
    pub fn handle_input(&mut self, event: InputEvent) -> Response {
        self.controller.handle(&mut self.layout, event)
    }

    // -------------------------------------------------------------------------
    // Backgrounds and previews
    // -------------------------------------------------------------------------

    pub fn reference_photo(&self) -> Option<&ImageData> {
        self.reference_photo.as_ref()
    }

    pub fn set_reference_photo(&mut self, photo: Option<ImageData>) {
        self.reference_photo = photo;
    }

    pub fn ambience_url(&self) -> Option<&str> {
        self.ambience_url.as_deref()
    }

    /// Use a generated ambience as background; the venue photo is dropped
    pub fn set_ambience(&mut self, url: String) {
        self.ambience_url = Some(url);
        self.reference_photo = None;
    }

    pub fn clear_ambience(&mut self) {
        self.ambience_url = None;
    }

    /// The venue photo wins over a generated ambience
    pub fn background(&self) -> Background {
        match (&self.reference_photo, &self.ambience_url) {
            (Some(photo), _) => Background::Photo(photo.clone()),
            (None, Some(url)) => Background::Ambience(url.clone()),
            (None, None) => Background::None,
        }
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview_url.as_deref()
    }

    pub fn set_preview_url(&mut self, url: String) {
        self.preview_url = Some(url);
    }

    pub fn dismiss_preview(&mut self) {
        self.preview_url = None;
    }

    // -------------------------------------------------------------------------
    // Prompts
    // -------------------------------------------------------------------------

    pub fn layout_prompt(&self) -> &str {
        &self.layout_prompt
    }

    pub fn set_layout_prompt(&mut self, prompt: impl Into<String>) {
        self.layout_prompt = prompt.into();
    }

    /// Append dictated speech to the layout prompt
    pub fn append_dictation(&mut self, transcript: &str) {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return;
        }
        if self.layout_prompt.is_empty() {
            self.layout_prompt = transcript.to_string();
        } else {
            self.layout_prompt.push(' ');
            self.layout_prompt.push_str(transcript);
        }
    }

    pub fn ambience_prompt(&self) -> &str {
        &self.ambience_prompt
    }

    pub fn set_ambience_prompt(&mut self, prompt: impl Into<String>) {
        self.ambience_prompt = prompt.into();
    }

    pub fn venue_dimensions(&self) -> &str {
        &self.venue_dimensions
    }

    pub fn set_venue_dimensions(&mut self, dimensions: impl Into<String>) {
        self.venue_dimensions = dimensions.into();
    }

    /// The layout request for the current prompt, photo and canvas
    pub fn layout_request(&self) -> LayoutRequest {
        let canvas = &self.config.canvas;
        let request = LayoutRequest::new(self.layout_prompt.clone(), canvas.width, canvas.height);
        match &self.reference_photo {
            Some(photo) => {
                let request = request.with_photo(photo.clone());
                if self.venue_dimensions.trim().is_empty() {
                    request
                } else {
                    request.with_dimensions(self.venue_dimensions.clone())
                }
            }
            None => request,
        }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    pub fn scene(&self) -> Scene {
        build_scene(
            &self.layout,
            &self.controller.view(),
            &self.background(),
            &self.config.canvas,
            &self.config.colors,
        )
    }

    pub fn svg(&self, config: &SvgConfig) -> String {
        render_svg(&self.scene(), config)
    }

    /// PNG of the canvas at its configured pixel size
    pub fn png(&self, config: &SvgConfig) -> Result<Vec<u8>, RasterError> {
        let canvas = &self.config.canvas;
        render_png(
            &self.svg(config),
            canvas.width.ceil() as u32,
            canvas.height.ceil() as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Point;
    use crate::notify::{MemorySink, ToastLevel};
    use pretty_assertions::assert_eq;

    fn designer() -> (VenueDesigner, MemorySink) {
        let sink = MemorySink::new();
        let designer = VenueDesigner::new(DesignerConfig::default(), Rc::new(sink.clone()));
        (designer, sink)
    }

    #[test]
    fn test_add_item_at_toolbar_origin() {
        let (mut d, sink) = designer();
        let id = d.add_item(ItemKind::RoundTable);
        let item = d.layout().get(&id).unwrap();
        assert_eq!(item.bounds().x, 20.0);
        assert_eq!(item.bounds().y, 20.0);
        assert_eq!((item.width(), item.height()), (48.0, 48.0));
        let toast = sink.last().unwrap();
        assert_eq!(toast.level, ToastLevel::Success);
        assert_eq!(toast.message, "'Round table' added.");
    }

    #[test]
    fn test_add_item_follows_view() {
        let (mut d, _) = designer();
        d.set_view(ViewTransform::new(2.0, 100.0, 40.0));
        let id = d.add_item(ItemKind::Stage);
        let item = d.layout().get(&id).unwrap();
        assert_eq!(item.origin(), Point::new(-40.0, -10.0));
        // It appears under the toolbar origin on screen
        assert_eq!(d.view().to_screen(item.origin()), Point::new(20.0, 20.0));
    }

    #[test]
    fn test_drag_scenario() {
        let (mut d, _) = designer();
        let id = d.add_item(ItemKind::RoundTable);
        d.handle_input(InputEvent::PointerDown(Point::new(30.0, 30.0)));
        d.handle_input(InputEvent::PointerMove(Point::new(130.0, 80.0)));
        d.handle_input(InputEvent::PointerUp);
        let item = d.layout().get(&id).unwrap();
        assert_eq!(
            (item.x, item.y, item.width(), item.height()),
            (120.0, 70.0, 48.0, 48.0)
        );
    }

    #[test]
    fn test_apply_plan_and_reset() {
        let (mut d, _) = designer();
        d.apply_plan(PlanVariant::Grid);
        assert_eq!(d.layout().count(ItemKind::DanceFloor), 1);
        d.reset();
        assert!(d.layout().is_empty());
    }

    #[test]
    fn test_background_precedence() {
        let (mut d, _) = designer();
        assert_eq!(d.background(), Background::None);
        d.set_reference_photo(Some(ImageData::new(vec![1], "image/png")));
        d.ambience_url = Some("https://example.com/a.png".into());
        assert!(matches!(d.background(), Background::Photo(_)));
        d.set_ambience("https://example.com/b.png".into());
        assert_eq!(d.reference_photo(), None);
        assert_eq!(
            d.background(),
            Background::Ambience("https://example.com/b.png".into())
        );
    }

    #[test]
    fn test_layout_request_carries_dimensions_only_with_photo() {
        let (mut d, _) = designer();
        let request = d.layout_request();
        assert_eq!((request.canvas_width, request.canvas_height), (800.0, 600.0));
        assert_eq!(request.venue_dimensions, None);
        d.set_reference_photo(Some(ImageData::new(vec![1], "image/jpeg")));
        let request = d.layout_request();
        assert_eq!(request.venue_dimensions.as_deref(), Some("20m x 30m"));
        assert!(request.reference_photo.is_some());
    }

    #[test]
    fn test_dictation_appends() {
        let (mut d, _) = designer();
        d.set_layout_prompt("");
        d.append_dictation("  wedding ");
        d.append_dictation("for 80");
        assert_eq!(d.layout_prompt(), "wedding for 80");
    }

    #[test]
    fn test_preview_dismiss() {
        let (mut d, _) = designer();
        d.set_preview_url("data:image/png;base64,AA==".into());
        assert!(d.preview_url().is_some());
        d.dismiss_preview();
        assert_eq!(d.preview_url(), None);
    }
}
