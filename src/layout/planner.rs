//! Procedural baseline layouts for an empty venue
//!
//! Two deterministic proposals are produced without any AI involvement:
//!
//! - **Grid**: a dance floor centered near the bottom wall and round tables
//!   filling the space above it row by row.
//! - **Perimeter**: a stage centered at the top, the dance floor below it and
//!   round tables lining the walls.
//!
//! Spacing comes from [`CanvasConfig::padding`]. A candidate table that would
//! collide with anything already placed is skipped, so planned items never
//! overlap; a canvas that is too small simply yields fewer tables and a
//! canvas without a finite size yields nothing.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use super::config::CanvasConfig;
use super::types::{BoundingBox, ItemKind, Layout, LayoutItem};

/// Which baseline arrangement to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanVariant {
    Grid,
    Perimeter,
}

impl PlanVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanVariant::Grid => "grid",
            PlanVariant::Perimeter => "perimeter",
        }
    }
}

impl fmt::Display for PlanVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" => Ok(PlanVariant::Grid),
            "perimeter" => Ok(PlanVariant::Perimeter),
            other => Err(format!(
                "unknown layout variant '{}' (expected grid or perimeter)",
                other
            )),
        }
    }
}

/// Plan both proposals for a canvas of the given pixel size.
///
/// Returns `(grid, perimeter)`.
pub fn plan_layout(canvas_width: f64, canvas_height: f64) -> (Layout, Layout) {
    let config = CanvasConfig::new().with_size(canvas_width, canvas_height);
    (
        plan_variant(PlanVariant::Grid, &config),
        plan_variant(PlanVariant::Perimeter, &config),
    )
}

/// Plan a single proposal
pub fn plan_variant(variant: PlanVariant, config: &CanvasConfig) -> Layout {
    if !(config.width.is_finite() && config.height.is_finite()) {
        warn!(
            variant = variant.as_str(),
            width = config.width,
            height = config.height,
            "canvas size is not finite, nothing planned"
        );
        return Layout::new();
    }
    let layout = match variant {
        PlanVariant::Grid => plan_grid(config),
        PlanVariant::Perimeter => plan_perimeter(config),
    };
    debug!(
        variant = variant.as_str(),
        width = config.width,
        height = config.height,
        items = layout.len(),
        "planned layout"
    );
    layout
}

/// Edge of one spatial-hash cell, the longest item side
const CELL: f64 = 144.0;

/// Accumulates items, refusing any that would collide with earlier ones.
///
/// Placed items are bucketed by the grid cells their bounds cover, so a
/// candidate is only tested against its neighbours.
struct Placer {
    items: Vec<LayoutItem>,
    cells: HashMap<(i64, i64), Vec<usize>>,
    tables: usize,
}

impl Placer {
    fn new() -> Self {
        Self {
            items: vec![],
            cells: HashMap::new(),
            tables: 0,
        }
    }

    fn cells_of(bounds: &BoundingBox) -> impl Iterator<Item = (i64, i64)> {
        let (x0, x1) = ((bounds.x / CELL).floor(), (bounds.right() / CELL).floor());
        let (y0, y1) = ((bounds.y / CELL).floor(), (bounds.bottom() / CELL).floor());
        let (x0, x1, y0, y1) = (x0 as i64, x1 as i64, y0 as i64, y1 as i64);
        (x0..=x1).flat_map(move |cx| (y0..=y1).map(move |cy| (cx, cy)))
    }

    fn collides(&self, candidate: &BoundingBox) -> bool {
        Self::cells_of(candidate)
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
            .any(|&i| self.items[i].bounds().intersects(candidate))
    }

    fn place(&mut self, id: String, kind: ItemKind, x: f64, y: f64) -> Option<BoundingBox> {
        let (width, height) = kind.dimensions();
        let candidate = BoundingBox::new(x, y, width, height);
        if self.collides(&candidate) {
            return None;
        }
        let index = self.items.len();
        for cell in Self::cells_of(&candidate) {
            self.cells.entry(cell).or_default().push(index);
        }
        self.items.push(LayoutItem::new(id, kind, x, y));
        Some(candidate)
    }

    fn place_table(&mut self, x: f64, y: f64) {
        let id = format!("{}-{}", ItemKind::RoundTable.id_prefix(), self.tables + 1);
        if self.place(id, ItemKind::RoundTable, x, y).is_some() {
            self.tables += 1;
        }
    }

    /// Place the single dance floor or stage of a plan
    fn place_fixed(&mut self, kind: ItemKind, x: f64, y: f64) -> Option<BoundingBox> {
        self.place(format!("{}-1", kind.id_prefix()), kind, x, y)
    }

    fn finish(self) -> Layout {
        // Ids come from distinct prefixes and counters, so none repeat
        Layout::from_items(self.items).unwrap_or_default()
    }
}

fn plan_grid(config: &CanvasConfig) -> Layout {
    let pad = config.padding;
    let (floor_w, floor_h) = ItemKind::DanceFloor.dimensions();
    let (table_w, table_h) = ItemKind::RoundTable.dimensions();

    let mut placer = Placer::new();
    let floor_y = config.height - floor_h - pad;
    placer.place_fixed(ItemKind::DanceFloor, (config.width - floor_w) / 2.0, floor_y);

    let mut y = pad;
    while y + table_h < floor_y - pad {
        let mut x = pad;
        while x + table_w < config.width - pad {
            placer.place_table(x, y);
            x += table_w + pad;
        }
        y += table_h + pad;
    }

    placer.finish()
}

fn plan_perimeter(config: &CanvasConfig) -> Layout {
    let pad = config.padding;
    let (stage_w, stage_h) = ItemKind::Stage.dimensions();
    let (floor_w, _) = ItemKind::DanceFloor.dimensions();
    let (table_w, table_h) = ItemKind::RoundTable.dimensions();

    let mut placer = Placer::new();
    let stage = BoundingBox::new((config.width - stage_w) / 2.0, pad, stage_w, stage_h);
    placer.place_fixed(ItemKind::Stage, stage.x, stage.y);

    let floor_y = stage.bottom() + pad;
    placer.place_fixed(ItemKind::DanceFloor, (config.width - floor_w) / 2.0, floor_y);

    // Top row, vertically centered on the stage, leaving the stage span clear
    let top_y = stage.y + (stage_h - table_h) / 2.0;
    let mut x = pad;
    while x + table_w < config.width - pad {
        if x + table_w + pad <= stage.x || x >= stage.right() + pad {
            placer.place_table(x, top_y);
        }
        x += table_w + pad;
    }

    // Bottom row along the far wall
    let bottom_y = config.height - table_h - pad;
    let mut x = pad;
    while x + table_w < config.width - pad {
        placer.place_table(x, bottom_y);
        x += table_w + pad;
    }

    // Side columns between the stage area and the bottom row
    let mut y = floor_y;
    while y + table_h < config.height - pad - table_h {
        placer.place_table(pad, y);
        placer.place_table(config.width - table_w - pad, y);
        y += table_h + pad;
    }

    placer.finish()
}
