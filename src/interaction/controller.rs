//! Pointer and touch state machine for editing the layout and navigating the view
//!
//! The controller owns the [`ViewTransform`] and borrows the [`Layout`] only
//! for the duration of a single event, so it can be driven and tested without
//! any drawing surface. All coordinates passed in are screen pixels relative
//! to the canvas element.

use tracing::{debug, trace};

use super::gesture::DoubleTapDetector;
use super::transform::{ViewConfig, ViewTransform};
use crate::layout::{ItemId, Layout, Point};

/// Raw input delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    PointerLeave,
    /// Negative `delta_y` scrolls up, which zooms in
    Wheel { position: Point, delta_y: f64 },
    DoubleClick,
    /// `touches` lists every finger currently on the surface
    TouchStart { touches: Vec<Point>, time_ms: f64 },
    TouchMove { touches: Vec<Point> },
    /// `touches` lists the fingers still down after the lift
    TouchEnd { touches: Vec<Point>, time_ms: f64 },
}

/// What an event changed, so the host knows whether to redraw
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Nothing,
    ItemGrabbed(ItemId),
    ItemMoved(ItemId),
    ViewChanged,
    DragEnded,
}

impl Response {
    /// Whether the canvas needs repainting
    pub fn needs_redraw(&self) -> bool {
        matches!(self, Response::ItemMoved(_) | Response::ViewChanged)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    /// `grab_offset` is the pointer position minus the item origin, in canvas space
    DraggingItem { id: ItemId, grab_offset: Point },
    /// `last` is the previous pointer position in screen space
    PanningCanvas { last: Point },
    Pinching { start_distance: f64, start_zoom: f64 },
}

/// Interaction controller for one canvas
#[derive(Debug, Clone)]
pub struct Controller {
    view: ViewTransform,
    config: ViewConfig,
    state: DragState,
    taps: DoubleTapDetector,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl Controller {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            view: ViewTransform::identity(),
            taps: DoubleTapDetector::new(config.double_tap_ms, config.double_tap_slop),
            config,
            state: DragState::Idle,
        }
    }

    pub fn view(&self) -> ViewTransform {
        self.view
    }

    /// Replace the view, clamping its zoom into range
    pub fn set_view(&mut self, view: ViewTransform) {
        self.view = view;
        self.view.zoom = self.config.clamp_zoom(view.zoom);
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    /// Dispatch a single input event
    pub fn handle(&mut self, layout: &mut Layout, event: InputEvent) -> Response {
        match event {
            InputEvent::PointerDown(p) => self.pointer_down(layout, p),
            InputEvent::PointerMove(p) => self.pointer_move(layout, p),
            InputEvent::PointerUp | InputEvent::PointerLeave => self.pointer_up(),
            InputEvent::Wheel { position, delta_y } => self.wheel(position, delta_y),
            InputEvent::DoubleClick => self.reset_view(),
            InputEvent::TouchStart { touches, time_ms } => {
                self.touch_start(layout, &touches, time_ms)
            }
            InputEvent::TouchMove { touches } => self.touch_move(layout, &touches),
            InputEvent::TouchEnd { touches, time_ms } => self.touch_end(&touches, time_ms),
        }
    }

    /// Grab the topmost item under the pointer, or start panning
    pub fn pointer_down(&mut self, layout: &Layout, screen: Point) -> Response {
        let canvas = self.view.to_canvas(screen);
        match layout.hit_test(canvas) {
            Some(item) => {
                let id = item.id().clone();
                debug!(item = %id, x = canvas.x, y = canvas.y, "grabbed item");
                self.state = DragState::DraggingItem {
                    id: id.clone(),
                    grab_offset: Point::new(canvas.x - item.x, canvas.y - item.y),
                };
                Response::ItemGrabbed(id)
            }
            None => {
                self.state = DragState::PanningCanvas { last: screen };
                Response::Nothing
            }
        }
    }

    pub fn pointer_move(&mut self, layout: &mut Layout, screen: Point) -> Response {
        match &mut self.state {
            DragState::DraggingItem { id, grab_offset } => {
                let canvas = self.view.to_canvas(screen);
                let origin = Point::new(canvas.x - grab_offset.x, canvas.y - grab_offset.y);
                match layout.move_item(id, origin) {
                    Ok(()) => Response::ItemMoved(id.clone()),
                    Err(err) => {
                        // The layout was replaced underneath the drag
                        trace!(%err, "ignoring move of vanished item");
                        Response::Nothing
                    }
                }
            }
            DragState::PanningCanvas { last } => {
                let (dx, dy) = (screen.x - last.x, screen.y - last.y);
                *last = screen;
                self.view.pan_by(dx, dy);
                Response::ViewChanged
            }
            DragState::Idle | DragState::Pinching { .. } => Response::Nothing,
        }
    }

    /// Pointer released or left the canvas. Items stay where they were dropped.
    pub fn pointer_up(&mut self) -> Response {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => Response::Nothing,
            _ => Response::DragEnded,
        }
    }

    /// Zoom one step about the cursor
    pub fn wheel(&mut self, position: Point, delta_y: f64) -> Response {
        if delta_y == 0.0 {
            return Response::Nothing;
        }
        self.view.wheel_zoom(position, delta_y, &self.config);
        trace!(zoom = self.view.zoom, "wheel zoom");
        Response::ViewChanged
    }

    /// Back to zoom 1 with no pan
    pub fn reset_view(&mut self) -> Response {
        self.view.reset();
        Response::ViewChanged
    }

    pub fn touch_start(&mut self, layout: &Layout, touches: &[Point], time_ms: f64) -> Response {
        match touches {
            [] => Response::Nothing,
            [single] => {
                self.taps.arm(*single, time_ms);
                self.pointer_down(layout, *single)
            }
            [first, second, ..] => {
                // A second finger always wins over a drag or pan in progress
                self.taps.cancel();
                self.state = DragState::Pinching {
                    start_distance: first.distance(*second),
                    start_zoom: self.view.zoom,
                };
                Response::Nothing
            }
        }
    }

    pub fn touch_move(&mut self, layout: &mut Layout, touches: &[Point]) -> Response {
        let pinch = match self.state {
            DragState::Pinching {
                start_distance,
                start_zoom,
            } => Some((start_distance, start_zoom)),
            _ => None,
        };
        match (touches, pinch) {
            ([first, second, ..], Some((start_distance, start_zoom))) => {
                if start_distance <= f64::EPSILON {
                    return Response::Nothing;
                }
                let ratio = first.distance(*second) / start_distance;
                self.view
                    .zoom_about(first.midpoint(*second), start_zoom * ratio, &self.config);
                Response::ViewChanged
            }
            ([single], None) => {
                self.taps.update(*single);
                self.pointer_move(layout, *single)
            }
            _ => Response::Nothing,
        }
    }

    pub fn touch_end(&mut self, remaining: &[Point], time_ms: f64) -> Response {
        if !remaining.is_empty() {
            // Lifting one finger of a pinch ends it; the other finger does nothing
            if matches!(self.state, DragState::Pinching { .. }) && remaining.len() < 2 {
                self.state = DragState::Idle;
                return Response::DragEnded;
            }
            return Response::Nothing;
        }
        let ended = self.pointer_up();
        if self.taps.release(time_ms) {
            debug!("double tap, resetting view");
            return self.reset_view();
        }
        ended
    }
}
