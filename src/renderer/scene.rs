//! Backend-neutral display list for one frame of the canvas
//!
//! [`build_scene`] is a pure function of the layout, the view, the background
//! and the palette. Each [`DrawCommand`] corresponds to one drawing-surface
//! call; the SVG and raster backends only translate them.

use crate::bridge::ImageData;
use crate::interaction::ViewTransform;
use crate::layout::{BoundingBox, CanvasConfig, ItemId, ItemKind, Layout, Point};
use crate::stylesheet::{Palette, Rgba};

/// Item outline width in screen pixels
const STROKE_WIDTH: f64 = 2.0;
/// Grid line width in screen pixels
const GRID_LINE_WIDTH: f64 = 0.5;
/// Shadow blur radius and offset in screen pixels
const SHADOW_BLUR: f64 = 10.0;
const SHADOW_OFFSET: (f64, f64) = (2.0, 4.0);

/// What sits behind the items
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Background {
    #[default]
    None,
    /// Photo of the real venue uploaded by the user
    Photo(ImageData),
    /// URL of a generated ambience image
    Ambience(String),
}

impl Background {
    pub fn is_present(&self) -> bool {
        !matches!(self, Background::None)
    }

    /// Image reference usable as an `href`
    pub fn href(&self) -> Option<String> {
        match self {
            Background::None => None,
            Background::Photo(image) => Some(image.data_url()),
            Background::Ambience(url) => Some(url.clone()),
        }
    }
}

/// Drop shadow, in canvas units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Rgba,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemStyle {
    pub fill: Rgba,
    pub stroke: Rgba,
    /// In canvas units
    pub stroke_width: f64,
    pub shadow: Shadow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Wipe the whole surface
    Clear,
    /// Image covering the whole canvas in screen space, unaffected by the view
    Background { href: String },
    /// Everything until `EndView` is in canvas coordinates
    BeginView(ViewTransform),
    GridLine {
        from: Point,
        to: Point,
        color: Rgba,
        width: f64,
    },
    Circle {
        id: ItemId,
        kind: ItemKind,
        center: Point,
        radius: f64,
        style: ItemStyle,
    },
    Rect {
        id: ItemId,
        kind: ItemKind,
        bounds: BoundingBox,
        style: ItemStyle,
    },
    EndView,
}

/// One frame: surface size plus ordered drawing commands
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn grid_line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::GridLine { .. }))
            .count()
    }

    /// Ids of the drawn items, bottom to top
    pub fn item_ids(&self) -> Vec<&ItemId> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { id, .. } | DrawCommand::Rect { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    /// The shadow shared by every item, if any item is drawn
    pub fn shadow(&self) -> Option<Shadow> {
        self.commands.iter().find_map(|c| match c {
            DrawCommand::Circle { style, .. } | DrawCommand::Rect { style, .. } => {
                Some(style.shadow)
            }
            _ => None,
        })
    }
}

/// Build the display list for the current state
pub fn build_scene(
    layout: &Layout,
    view: &ViewTransform,
    background: &Background,
    canvas: &CanvasConfig,
    palette: &Palette,
) -> Scene {
    let mut commands = vec![DrawCommand::Clear];

    if let Some(href) = background.href() {
        commands.push(DrawCommand::Background { href });
    }

    commands.push(DrawCommand::BeginView(*view));

    // The grid would compete with a photo, so it only guides an empty canvas
    if !background.is_present() && canvas.grid_spacing > 0.0 {
        let color = palette.grid();
        let width = view.screen_constant(GRID_LINE_WIDTH);
        let mut x = 0.0;
        while x < canvas.width {
            commands.push(DrawCommand::GridLine {
                from: Point::new(x, 0.0),
                to: Point::new(x, canvas.height),
                color,
                width,
            });
            x += canvas.grid_spacing;
        }
        let mut y = 0.0;
        while y < canvas.height {
            commands.push(DrawCommand::GridLine {
                from: Point::new(0.0, y),
                to: Point::new(canvas.width, y),
                color,
                width,
            });
            y += canvas.grid_spacing;
        }
    }

    let shadow = Shadow {
        color: palette.shadow(),
        blur: view.screen_constant(SHADOW_BLUR),
        offset_x: view.screen_constant(SHADOW_OFFSET.0),
        offset_y: view.screen_constant(SHADOW_OFFSET.1),
    };
    let stroke = palette.stroke();
    let stroke_width = view.screen_constant(STROKE_WIDTH);

    for item in layout {
        let style = ItemStyle {
            fill: palette.fill(item.kind()),
            stroke,
            stroke_width,
            shadow,
        };
        let bounds = item.bounds();
        let command = if item.kind().is_round() {
            DrawCommand::Circle {
                id: item.id().clone(),
                kind: item.kind(),
                center: bounds.center(),
                radius: bounds.width / 2.0,
                style,
            }
        } else {
            DrawCommand::Rect {
                id: item.id().clone(),
                kind: item.kind(),
                bounds,
                style,
            }
        };
        commands.push(command);
    }

    commands.push(DrawCommand::EndView);

    Scene {
        width: canvas.width,
        height: canvas.height,
        commands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutItem;
    use pretty_assertions::assert_eq;

    fn layout() -> Layout {
        Layout::from_items(vec![
            LayoutItem::new("floor", ItemKind::DanceFloor, 340.0, 444.0),
            LayoutItem::new("t1", ItemKind::RoundTable, 20.0, 20.0),
        ])
        .unwrap()
    }

    fn build(view: ViewTransform, background: Background) -> Scene {
        build_scene(
            &layout(),
            &view,
            &background,
            &CanvasConfig::default(),
            &Palette::default(),
        )
    }

    #[test]
    fn test_command_order() {
        let scene = build(ViewTransform::identity(), Background::None);
        assert_eq!(scene.commands.first(), Some(&DrawCommand::Clear));
        assert_eq!(
            scene.commands[1],
            DrawCommand::BeginView(ViewTransform::identity())
        );
        assert_eq!(scene.commands.last(), Some(&DrawCommand::EndView));
        let ids: Vec<_> = scene.item_ids().into_iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["floor", "t1"]);
    }

    #[test]
    fn test_grid_covers_canvas() {
        let scene = build(ViewTransform::identity(), Background::None);
        // 800 / 24 -> 34 vertical lines, 600 / 24 -> 25 horizontal lines
        assert_eq!(scene.grid_line_count(), 34 + 25);
    }

    #[test]
    fn test_background_suppresses_grid() {
        let photo = Background::Photo(ImageData::new(vec![1, 2, 3], "image/png"));
        let scene = build(ViewTransform::identity(), photo);
        assert_eq!(scene.grid_line_count(), 0);
        assert_eq!(
            scene.commands[1],
            DrawCommand::Background {
                href: "data:image/png;base64,AQID".to_string()
            }
        );
        let ambience = Background::Ambience("https://example.com/bg.png".into());
        assert_eq!(build(ViewTransform::identity(), ambience).grid_line_count(), 0);
    }

    #[test]
    fn test_round_table_is_inscribed_circle() {
        let scene = build(ViewTransform::identity(), Background::None);
        let circle = scene
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Circle { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            })
            .unwrap();
        assert_eq!(circle, (Point::new(44.0, 44.0), 24.0));
    }

    #[test]
    fn test_line_widths_scale_inversely_with_zoom() {
        let scene = build(ViewTransform::new(2.0, 0.0, 0.0), Background::None);
        let shadow = scene.shadow().unwrap();
        assert_eq!(
            (shadow.blur, shadow.offset_x, shadow.offset_y),
            (5.0, 1.0, 2.0)
        );
        for command in &scene.commands {
            match command {
                DrawCommand::GridLine { width, .. } => assert_eq!(*width, 0.25),
                DrawCommand::Rect { style, .. } | DrawCommand::Circle { style, .. } => {
                    assert_eq!(style.stroke_width, 1.0)
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_scene_is_pure() {
        let a = build(ViewTransform::new(1.5, 10.0, -4.0), Background::None);
        let b = build(ViewTransform::new(1.5, 10.0, -4.0), Background::None);
        assert_eq!(a, b);
    }
}
