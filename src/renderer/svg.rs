//! SVG generation from a scene

use crate::interaction::ViewTransform;
use crate::layout::{ItemKind, Point};
use crate::stylesheet::Rgba;

use super::scene::{DrawCommand, ItemStyle, Scene, Shadow};
use super::SvgConfig;

/// Accumulates the elements of one canvas frame
pub struct SvgBuilder {
    config: SvgConfig,
    width: f64,
    height: f64,
    defs: Vec<String>,
    elements: Vec<String>,
    shadow_id: Option<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder for a surface of the given size
    pub fn new(config: SvgConfig, width: f64, height: f64) -> Self {
        Self {
            config,
            width,
            height,
            defs: vec![],
            elements: vec![],
            shadow_id: None,
            indent: 1,
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Fill the surface with a solid colour
    pub fn add_backdrop(&mut self, color: Rgba) {
        self.elements.push(format!(
            r#"{}<rect class="{}backdrop" x="0" y="0" width="{}" height="{}" fill="{}"{}/>"#,
            self.indent_str(),
            self.prefix(),
            self.width,
            self.height,
            color.to_hex(),
            opacity_attr("fill-opacity", color)
        ));
    }

    /// Stretch an image over the surface, cropping to keep its aspect ratio
    pub fn add_background_image(&mut self, href: &str) {
        self.elements.push(format!(
            r#"{}<image class="{}background" x="0" y="0" width="{}" height="{}" preserveAspectRatio="xMidYMid slice" href="{}"/>"#,
            self.indent_str(),
            self.prefix(),
            self.width,
            self.height,
            escape_xml(href)
        ));
    }

    /// Define the drop shadow filter once; later calls reuse the first definition
    pub fn add_shadow_filter(&mut self, shadow: &Shadow) -> String {
        if let Some(id) = &self.shadow_id {
            return id.clone();
        }
        let id = format!("{}shadow", self.prefix());
        // Canvas shadow blur is twice the Gaussian standard deviation
        self.defs.push(format!(
            r#"<filter id="{}" x="-50%" y="-50%" width="200%" height="200%">
      <feDropShadow dx="{}" dy="{}" stdDeviation="{}" flood-color="{}" flood-opacity="{}"/>
    </filter>"#,
            id,
            shadow.offset_x,
            shadow.offset_y,
            shadow.blur / 2.0,
            shadow.color.to_hex(),
            shadow.color.opacity()
        ));
        self.shadow_id = Some(id.clone());
        id
    }

    /// Open a group in canvas coordinates: translate by the pan, then scale by the zoom
    pub fn start_view(&mut self, view: &ViewTransform) {
        self.elements.push(format!(
            r#"{}<g class="{}view" transform="translate({} {}) scale({})">"#,
            self.indent_str(),
            self.prefix(),
            view.pan_x,
            view.pan_y,
            view.zoom
        ));
        self.indent += 1;
    }

    /// Close the view group
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Add a grid line
    pub fn add_line(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
        self.elements.push(format!(
            r#"{}<line class="{}grid" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}"{} stroke-width="{}"/>"#,
            self.indent_str(),
            self.prefix(),
            from.x,
            from.y,
            to.x,
            to.y,
            color.to_hex(),
            opacity_attr("stroke-opacity", color),
            width
        ));
    }

    /// Add a round item
    pub fn add_circle(
        &mut self,
        id: &str,
        kind: ItemKind,
        center: Point,
        r: f64,
        style: &ItemStyle,
    ) {
        let styles = self.item_styles(style);
        self.elements.push(format!(
            r#"{}<circle id="{}" class="{}" cx="{}" cy="{}" r="{}"{}/>"#,
            self.indent_str(),
            escape_xml(id),
            self.item_classes(kind),
            center.x,
            center.y,
            r,
            styles
        ));
    }

    /// Add a rectangular item
    pub fn add_rect(
        &mut self,
        id: &str,
        kind: ItemKind,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        style: &ItemStyle,
    ) {
        let styles = self.item_styles(style);
        self.elements.push(format!(
            r#"{}<rect id="{}" class="{}" x="{}" y="{}" width="{}" height="{}"{}/>"#,
            self.indent_str(),
            escape_xml(id),
            self.item_classes(kind),
            x,
            y,
            w,
            h,
            styles
        ));
    }

    fn item_classes(&self, kind: ItemKind) -> String {
        let prefix = self.prefix();
        format!("{prefix}item {prefix}{}", kind.as_str())
    }

    fn item_styles(&mut self, style: &ItemStyle) -> String {
        let filter = self.add_shadow_filter(&style.shadow);
        format!(
            r#" fill="{}"{} stroke="{}"{} stroke-width="{}" filter="url(#{})""#,
            style.fill.to_hex(),
            opacity_attr("fill-opacity", style.fill),
            style.stroke.to_hex(),
            opacity_attr("stroke-opacity", style.stroke),
            style.stroke_width,
            filter
        )
    }

    /// Wrap the elements in the root document around a clipped surface
    pub fn build(self) -> String {
        let nl = self.newline();

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        ));
        svg.push_str(nl);

        if !self.defs.is_empty() {
            svg.push_str("  <defs>");
            svg.push_str(nl);
            for def in &self.defs {
                svg.push_str("    ");
                svg.push_str(def);
                svg.push_str(nl);
            }
            svg.push_str("  </defs>");
            svg.push_str(nl);
        }

        // Content outside the surface is clipped, like a canvas element
        svg.push_str(&format!(
            r#"  <svg class="{}surface" x="0" y="0" width="{}" height="{}" overflow="hidden">"#,
            self.prefix(),
            self.width,
            self.height
        ));
        svg.push_str(nl);
        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }
        svg.push_str("  </svg>");
        svg.push_str(nl);

        svg.push_str("</svg>");

        svg
    }
}

/// Render a scene to an SVG string
pub fn render_svg(scene: &Scene, config: &SvgConfig) -> String {
    let mut builder = SvgBuilder::new(config.clone(), scene.width, scene.height);
    builder.indent = 2;

    for command in &scene.commands {
        match command {
            DrawCommand::Clear => {
                if let Some(color) = config.backdrop {
                    builder.add_backdrop(color);
                }
            }
            DrawCommand::Background { href } => builder.add_background_image(href),
            DrawCommand::BeginView(view) => builder.start_view(view),
            DrawCommand::GridLine {
                from,
                to,
                color,
                width,
            } => builder.add_line(*from, *to, *color, *width),
            DrawCommand::Circle {
                id,
                kind,
                center,
                radius,
                style,
            } => builder.add_circle(id.as_str(), *kind, *center, *radius, style),
            DrawCommand::Rect {
                id,
                kind,
                bounds,
                style,
            } => builder.add_rect(
                id.as_str(),
                *kind,
                bounds.x,
                bounds.y,
                bounds.width,
                bounds.height,
                style,
            ),
            DrawCommand::EndView => builder.end_group(),
        }
    }

    builder.build()
}

/// ` name="0.6"` for translucent colours, nothing for opaque ones
fn opacity_attr(name: &str, color: Rgba) -> String {
    if color.a == 255 {
        String::new()
    } else {
        format!(r#" {}="{}""#, name, round3(color.opacity()))
    }
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
