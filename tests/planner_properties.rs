//! Properties every procedural layout must hold, over a range of canvas sizes

use std::collections::HashSet;

use pretty_assertions::assert_eq;
use venue_designer::{plan_layout, plan_variant, CanvasConfig, ItemKind, Layout, PlanVariant};

const SIZES: [(f64, f64); 6] = [
    (800.0, 600.0),
    (1024.0, 768.0),
    (1600.0, 1200.0),
    (640.0, 480.0),
    (500.0, 400.0),
    (300.0, 300.0),
];

fn both(width: f64, height: f64) -> [(&'static str, Layout); 2] {
    let (grid, perimeter) = plan_layout(width, height);
    [("grid", grid), ("perimeter", perimeter)]
}

#[test]
fn no_two_items_overlap() {
    for (w, h) in SIZES {
        for (name, layout) in both(w, h) {
            assert_eq!(
                layout.overlapping_pairs(),
                vec![],
                "{} plan on {}x{}",
                name,
                w,
                h
            );
        }
    }
}

#[test]
fn items_stay_on_the_canvas() {
    for (w, h) in SIZES {
        for (name, layout) in both(w, h) {
            for item in &layout {
                let b = item.bounds();
                assert!(
                    b.x >= 0.0 && b.y >= 0.0 && b.right() <= w && b.bottom() <= h,
                    "{} plan on {}x{}: {} at {:?}",
                    name,
                    w,
                    h,
                    item.id(),
                    b
                );
            }
        }
    }
}

#[test]
fn ids_are_unique_and_deterministic() {
    for (w, h) in SIZES {
        let (grid_a, perimeter_a) = plan_layout(w, h);
        let (grid_b, perimeter_b) = plan_layout(w, h);
        assert_eq!(grid_a, grid_b);
        assert_eq!(perimeter_a, perimeter_b);

        for layout in [&grid_a, &perimeter_a] {
            let ids: HashSet<_> = layout.iter().map(|item| item.id().clone()).collect();
            assert_eq!(ids.len(), layout.len());
        }
    }
}

#[test]
fn every_item_has_its_kind_dimensions() {
    let (grid, perimeter) = plan_layout(800.0, 600.0);
    for item in grid.iter().chain(perimeter.iter()) {
        assert_eq!((item.width(), item.height()), item.kind().dimensions());
    }
}

#[test]
fn fixed_items_are_always_present() {
    for (w, h) in SIZES {
        let (grid, perimeter) = plan_layout(w, h);
        assert_eq!(grid.count(ItemKind::DanceFloor), 1);
        assert_eq!(grid.count(ItemKind::Stage), 0);
        assert_eq!(perimeter.count(ItemKind::DanceFloor), 1);
        assert_eq!(perimeter.count(ItemKind::Stage), 1);
    }
}

#[test]
fn larger_canvases_seat_more_tables() {
    let (small_grid, small_perimeter) = plan_layout(640.0, 480.0);
    let (large_grid, large_perimeter) = plan_layout(1600.0, 1200.0);
    assert!(large_grid.count(ItemKind::RoundTable) > small_grid.count(ItemKind::RoundTable));
    assert!(
        large_perimeter.count(ItemKind::RoundTable)
            > small_perimeter.count(ItemKind::RoundTable)
    );
}

#[test]
fn padding_is_respected() {
    let config = CanvasConfig::new().with_padding(60.0);
    let grid = plan_variant(PlanVariant::Grid, &config);
    let first = grid.get(&"rt-1".into()).unwrap();
    assert_eq!((first.x, first.y), (60.0, 60.0));
    let floor = grid.get(&"df-1".into()).unwrap();
    assert_eq!(floor.bounds().bottom(), 600.0 - 60.0);
}

#[test]
fn plans_survive_a_json_export() {
    let (grid, _) = plan_layout(800.0, 600.0);
    let json = grid.to_json().unwrap();
    assert!(json.contains(r#""type": "dance-floor""#));
    assert_eq!(Layout::from_json(&json).unwrap(), grid);
}

#[test]
fn wide_venue_fills_every_grid_row() {
    let (grid, perimeter) = plan_layout(20000.0, 2000.0);
    // 237 columns x 21 rows above the floor
    assert_eq!(grid.count(ItemKind::RoundTable), 4977);
    assert_eq!(grid.overlapping_pairs(), vec![]);
    assert_eq!(perimeter.overlapping_pairs(), vec![]);
    assert_eq!(grid.get(&"rt-4977".into()).map(|t| t.y), Some(36.0 + 20.0 * 84.0));
}

#[test]
fn unbounded_canvas_plans_nothing() {
    let config = CanvasConfig::new().with_size(f64::INFINITY, 600.0);
    assert!(plan_variant(PlanVariant::Grid, &config).is_empty());
    assert!(plan_variant(PlanVariant::Perimeter, &config).is_empty());
}
