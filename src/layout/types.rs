//! Core types for the venue layout model

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::LayoutError;

/// Sizes read back from JSON may differ from the constants by rounding noise
const DIMENSION_TOLERANCE: f64 = 1e-6;

/// A 2D point, either in canvas space or in screen space depending on context
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point halfway between `self` and `other`
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// A bounding box representing the spatial extent of an item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check if this bounding box contains a point (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Check if this bounding box intersects another.
    ///
    /// Boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Smallest box around both
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox::new(x, y, right - x, bottom - y)
    }
}

/// The closed set of furniture and stage elements that can be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    RoundTable,
    RectTable,
    DanceFloor,
    Stage,
}

impl ItemKind {
    /// Every kind, in toolbar order
    pub const ALL: [ItemKind; 4] = [
        ItemKind::RoundTable,
        ItemKind::RectTable,
        ItemKind::DanceFloor,
        ItemKind::Stage,
    ];

    /// Fixed (width, height) in canvas pixels at 24px per meter
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            // 2m diameter
            ItemKind::RoundTable => (48.0, 48.0),
            // 1m x 3m
            ItemKind::RectTable => (24.0, 72.0),
            // 5m x 5m
            ItemKind::DanceFloor => (120.0, 120.0),
            // 6m x 3m
            ItemKind::Stage => (144.0, 72.0),
        }
    }

    pub fn width(self) -> f64 {
        self.dimensions().0
    }

    pub fn height(self) -> f64 {
        self.dimensions().1
    }

    /// Wire name of the kind
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::RoundTable => "round-table",
            ItemKind::RectTable => "rect-table",
            ItemKind::DanceFloor => "dance-floor",
            ItemKind::Stage => "stage",
        }
    }

    /// Human-readable toolbar label
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::RoundTable => "Round table",
            ItemKind::RectTable => "Rect. table",
            ItemKind::DanceFloor => "Dance floor",
            ItemKind::Stage => "Stage",
        }
    }

    /// Short prefix used when allocating ids
    pub fn id_prefix(self) -> &'static str {
        match self {
            ItemKind::RoundTable => "rt",
            ItemKind::RectTable => "rect",
            ItemKind::DanceFloor => "df",
            ItemKind::Stage => "st",
        }
    }

    /// Round tables are drawn as circles inscribed in their box
    pub fn is_round(self) -> bool {
        matches!(self, ItemKind::RoundTable)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| LayoutError::unknown_kind(s))
    }
}

/// An item identifier, unique within a layout
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A placed furniture or stage element.
///
/// Width and height are not stored: they are always the fixed dimensions of
/// the item's kind, so repositioning can never resize an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireItem", try_from = "WireItem")]
pub struct LayoutItem {
    id: ItemId,
    kind: ItemKind,
    /// Top-left corner in canvas pixels
    pub x: f64,
    pub y: f64,
}

impl LayoutItem {
    pub fn new(id: impl Into<ItemId>, kind: ItemKind, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            x,
            y,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn width(&self) -> f64 {
        self.kind.width()
    }

    pub fn height(&self) -> f64 {
        self.kind.height()
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width(), self.height())
    }

    /// Move the top-left corner, keeping the fixed size
    pub fn move_to(&mut self, origin: Point) {
        self.x = origin.x;
        self.y = origin.y;
    }
}

/// JSON shape of an item: `{id, type, x, y, width, height}`
#[derive(Serialize, Deserialize)]
struct WireItem {
    id: ItemId,
    #[serde(rename = "type")]
    kind: ItemKind,
    x: f64,
    y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
}

impl From<LayoutItem> for WireItem {
    fn from(item: LayoutItem) -> Self {
        let (width, height) = item.kind.dimensions();
        WireItem {
            id: item.id,
            kind: item.kind,
            x: item.x,
            y: item.y,
            width: Some(width),
            height: Some(height),
        }
    }
}

impl TryFrom<WireItem> for LayoutItem {
    type Error = LayoutError;

    fn try_from(wire: WireItem) -> Result<Self, Self::Error> {
        let (expected_w, expected_h) = wire.kind.dimensions();
        let width = wire.width.unwrap_or(expected_w);
        let height = wire.height.unwrap_or(expected_h);
        if (width - expected_w).abs() > DIMENSION_TOLERANCE
            || (height - expected_h).abs() > DIMENSION_TOLERANCE
        {
            return Err(LayoutError::dimension_mismatch(
                wire.id.0, wire.kind, width, height,
            ));
        }
        Ok(LayoutItem::new(wire.id, wire.kind, wire.x, wire.y))
    }
}

/// An ordered collection of items.
///
/// Insertion order is z-order: later items draw on top and win hit tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<LayoutItem>", try_from = "Vec<LayoutItem>")]
pub struct Layout {
    items: Vec<LayoutItem>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a layout, rejecting duplicate ids
    pub fn from_items(items: Vec<LayoutItem>) -> Result<Self, LayoutError> {
        if let Some(id) = first_duplicate(&items) {
            return Err(LayoutError::duplicate(id.0.clone()));
        }
        Ok(Layout { items })
    }

    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LayoutItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains_id(&self, id: &ItemId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    pub fn get(&self, id: &ItemId) -> Option<&LayoutItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut LayoutItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    /// Append an item on top of the others
    pub fn push(&mut self, item: LayoutItem) -> Result<(), LayoutError> {
        if self.contains_id(&item.id) {
            return Err(LayoutError::duplicate(item.id.0));
        }
        self.items.push(item);
        Ok(())
    }

    /// Allocate an id of the form `<kind>-<n>` not yet used in this layout
    pub fn fresh_id(&self, kind: ItemKind) -> ItemId {
        let mut n = self.items.len() + 1;
        loop {
            let candidate = ItemId(format!("{}-{}", kind.as_str(), n));
            if !self.contains_id(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Append a new item of `kind` at `origin` under a freshly allocated id
    pub fn add_item(&mut self, kind: ItemKind, origin: Point) -> &LayoutItem {
        let id = self.fresh_id(kind);
        let index = self.items.len();
        self.items
            .push(LayoutItem::new(id, kind, origin.x, origin.y));
        &self.items[index]
    }

    /// Topmost item whose bounding box contains `point`
    pub fn hit_test(&self, point: Point) -> Option<&LayoutItem> {
        self.items
            .iter()
            .rev()
            .find(|item| item.bounds().contains(point))
    }

    /// Reposition an item; its size never changes
    pub fn move_item(&mut self, id: &ItemId, origin: Point) -> Result<(), LayoutError> {
        let item = self
            .get_mut(id)
            .ok_or_else(|| LayoutError::unknown_item(id.0.clone()))?;
        item.move_to(origin);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replace the whole layout, returning the previous one
    pub fn replace(&mut self, other: Layout) -> Layout {
        std::mem::replace(self, other)
    }

    /// Pairs of items whose bounding boxes intersect, in insertion order
    pub fn overlapping_pairs(&self) -> Vec<(ItemId, ItemId)> {
        let mut pairs = vec![];
        for (i, a) in self.items.iter().enumerate() {
            for b in &self.items[i + 1..] {
                if a.bounds().intersects(&b.bounds()) {
                    pairs.push((a.id.clone(), b.id.clone()));
                }
            }
        }
        pairs
    }

    /// Union of all item bounds, `None` for an empty layout
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.items
            .iter()
            .map(LayoutItem::bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Count items of one kind
    pub fn count(&self, kind: ItemKind) -> usize {
        self.items.iter().filter(|item| item.kind == kind).count()
    }

    pub fn to_json(&self) -> Result<String, LayoutError> {
        serde_json::to_string_pretty(self).map_err(|e| LayoutError::Serde(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        serde_json::from_str(json).map_err(|e| LayoutError::Serde(e.to_string()))
    }
}

fn first_duplicate(items: &[LayoutItem]) -> Option<&ItemId> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .map(LayoutItem::id)
        .find(|id| !seen.insert(*id))
}

impl From<Layout> for Vec<LayoutItem> {
    fn from(layout: Layout) -> Self {
        layout.items
    }
}

impl TryFrom<Vec<LayoutItem>> for Layout {
    type Error = LayoutError;

    fn try_from(items: Vec<LayoutItem>) -> Result<Self, Self::Error> {
        Layout::from_items(items)
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = &'a LayoutItem;
    type IntoIter = std::slice::Iter<'a, LayoutItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fixed_dimensions() {
        assert_eq!(ItemKind::RoundTable.dimensions(), (48.0, 48.0));
        assert_eq!(ItemKind::RectTable.dimensions(), (24.0, 72.0));
        assert_eq!(ItemKind::DanceFloor.dimensions(), (120.0, 120.0));
        assert_eq!(ItemKind::Stage.dimensions(), (144.0, 72.0));
    }

    #[test]
    fn test_kind_round_trips_through_name() {
        for kind in ItemKind::ALL {
            assert_eq!(kind.as_str().parse::<ItemKind>().unwrap(), kind);
        }
        assert!("bar".parse::<ItemKind>().is_err());
    }

    #[test]
    fn test_bounding_box_contains_edges() {
        let b = BoundingBox::new(10.0, 10.0, 20.0, 20.0);
        assert!(b.contains(Point::new(10.0, 10.0)));
        assert!(b.contains(Point::new(30.0, 30.0)));
        assert!(!b.contains(Point::new(30.1, 15.0)));
    }

    #[test]
    fn test_touching_boxes_do_not_intersect() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        let c = BoundingBox::new(9.0, 9.0, 10.0, 10.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn test_push_rejects_duplicate_id() {
        let mut layout = Layout::new();
        layout
            .push(LayoutItem::new("a", ItemKind::Stage, 0.0, 0.0))
            .unwrap();
        let err = layout
            .push(LayoutItem::new("a", ItemKind::RoundTable, 5.0, 5.0))
            .unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateId { .. }));
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_from_items_finds_late_duplicate() {
        let mut items: Vec<_> = (0..5000)
            .map(|i| LayoutItem::new(format!("rt-{}", i), ItemKind::RoundTable, 0.0, 0.0))
            .collect();
        assert_eq!(Layout::from_items(items.clone()).unwrap().len(), 5000);
        items.push(LayoutItem::new("rt-17", ItemKind::Stage, 0.0, 0.0));
        let err = Layout::from_items(items).unwrap_err();
        assert!(err.to_string().contains("duplicate item id 'rt-17'"));
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let mut layout = Layout::new();
        layout
            .push(LayoutItem::new("round-table-1", ItemKind::RoundTable, 0.0, 0.0))
            .unwrap();
        let id = layout.add_item(ItemKind::RoundTable, Point::new(0.0, 0.0)).id().clone();
        assert_eq!(id.as_str(), "round-table-2");
        let id = layout.add_item(ItemKind::RoundTable, Point::new(0.0, 0.0)).id().clone();
        assert_eq!(id.as_str(), "round-table-3");
    }

    #[test]
    fn test_hit_test_prefers_later_items() {
        let mut layout = Layout::new();
        layout
            .push(LayoutItem::new("floor", ItemKind::DanceFloor, 0.0, 0.0))
            .unwrap();
        layout
            .push(LayoutItem::new("table", ItemKind::RoundTable, 10.0, 10.0))
            .unwrap();
        let hit = layout.hit_test(Point::new(20.0, 20.0)).unwrap();
        assert_eq!(hit.id().as_str(), "table");
        let hit = layout.hit_test(Point::new(100.0, 100.0)).unwrap();
        assert_eq!(hit.id().as_str(), "floor");
        assert!(layout.hit_test(Point::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn test_move_keeps_dimensions() {
        let mut layout = Layout::new();
        let id = layout.add_item(ItemKind::Stage, Point::new(0.0, 0.0)).id().clone();
        layout.move_item(&id, Point::new(-50.0, 900.0)).unwrap();
        let item = layout.get(&id).unwrap();
        assert_eq!(item.bounds(), BoundingBox::new(-50.0, 900.0, 144.0, 72.0));
    }

    #[test]
    fn test_move_unknown_item() {
        let mut layout = Layout::new();
        let err = layout
            .move_item(&ItemId::new("ghost"), Point::new(0.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, LayoutError::UnknownItem { .. }));
    }

    #[test]
    fn test_json_shape() {
        let layout =
            Layout::from_items(vec![LayoutItem::new("t1", ItemKind::RectTable, 1.0, 2.0)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&layout.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "id": "t1",
                "type": "rect-table",
                "x": 1.0,
                "y": 2.0,
                "width": 24.0,
                "height": 72.0
            }])
        );
    }

    #[test]
    fn test_json_rejects_wrong_size() {
        let json = r#"[{"id": "t1", "type": "stage", "x": 0, "y": 0, "width": 10, "height": 72}]"#;
        let err = Layout::from_json(json).unwrap_err();
        assert!(err.to_string().contains("144x72"));
    }

    #[test]
    fn test_json_rejects_duplicate_ids() {
        let json = r#"[
            {"id": "a", "type": "stage", "x": 0, "y": 0},
            {"id": "a", "type": "stage", "x": 5, "y": 5}
        ]"#;
        let err = Layout::from_json(json).unwrap_err();
        assert!(err.to_string().contains("duplicate item id 'a'"));
    }

    #[test]
    fn test_overlapping_pairs() {
        let layout = Layout::from_items(vec![
            LayoutItem::new("a", ItemKind::RoundTable, 0.0, 0.0),
            LayoutItem::new("b", ItemKind::RoundTable, 40.0, 0.0),
            LayoutItem::new("c", ItemKind::RoundTable, 200.0, 0.0),
        ])
        .unwrap();
        assert_eq!(
            layout.overlapping_pairs(),
            vec![(ItemId::new("a"), ItemId::new("b"))]
        );
    }

    #[test]
    fn test_bounds_union() {
        let layout = Layout::from_items(vec![
            LayoutItem::new("a", ItemKind::RoundTable, 0.0, 0.0),
            LayoutItem::new("b", ItemKind::Stage, 100.0, 100.0),
        ])
        .unwrap();
        assert_eq!(
            layout.bounds(),
            Some(BoundingBox::new(0.0, 0.0, 244.0, 172.0))
        );
        assert_eq!(Layout::new().bounds(), None);
    }
}
