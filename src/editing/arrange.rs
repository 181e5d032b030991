//! Multi-select geometry operations
//!
//! Batch operations over the current selection: alignment in six
//! directions, size matching against the first-selected region, and
//! even-spacing distribution. All of them read effective rects and write
//! position/size deltas through the shared store, touching only the axis
//! the operation is about.

use kurbo::Rect;

use crate::document::registry::Region;
use crate::editing::delta::{DeltaPatch, LayoutDeltaStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignEdge {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAxis {
    Width,
    Height,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Align every member's edge (or center) to a target computed across the
/// selection's effective rects. Requires at least two members; returns
/// whether anything was written.
pub fn align(
    members: &[&Region],
    edge: AlignEdge,
    store: &mut LayoutDeltaStore,
) -> bool {
    if members.len() < 2 {
        return false;
    }
    let rects: Vec<Rect> = effective_rects(members, store);

    let target = match edge {
        AlignEdge::Left => fold_min(rects.iter().map(|r| r.x0)),
        AlignEdge::Right => fold_max(rects.iter().map(|r| r.x1)),
        AlignEdge::Top => fold_min(rects.iter().map(|r| r.y0)),
        AlignEdge::Bottom => fold_max(rects.iter().map(|r| r.y1)),
        AlignEdge::Center => mean(rects.iter().map(|r| r.center().x)),
        AlignEdge::Middle => mean(rects.iter().map(|r| r.center().y)),
    };

    for (region, rect) in members.iter().zip(&rects) {
        let patch = match edge {
            AlignEdge::Left => {
                DeltaPatch { x: Some(target - region.base_rect.x0), ..Default::default() }
            }
            AlignEdge::Right => DeltaPatch {
                x: Some(target - rect.width() - region.base_rect.x0),
                ..Default::default()
            },
            AlignEdge::Center => DeltaPatch {
                x: Some(target - rect.width() / 2.0 - region.base_rect.x0),
                ..Default::default()
            },
            AlignEdge::Top => {
                DeltaPatch { y: Some(target - region.base_rect.y0), ..Default::default() }
            }
            AlignEdge::Bottom => DeltaPatch {
                y: Some(target - rect.height() - region.base_rect.y0),
                ..Default::default()
            },
            AlignEdge::Middle => DeltaPatch {
                y: Some(target - rect.height() / 2.0 - region.base_rect.y0),
                ..Default::default()
            },
        };
        store.set(&region.id, patch);
    }
    true
}

/// Make every member's effective size match the first-selected region's
/// (selection order, not geometric order). Requires at least two members.
pub fn match_size(
    members: &[&Region],
    axis: MatchAxis,
    store: &mut LayoutDeltaStore,
) -> bool {
    if members.len() < 2 {
        return false;
    }
    let reference = store.effective_rect(&members[0].id, members[0].base_rect);

    for region in &members[1..] {
        let mut patch = DeltaPatch::default();
        if matches!(axis, MatchAxis::Width | MatchAxis::Both) {
            patch.width = Some(reference.width() - region.base_rect.width());
        }
        if matches!(axis, MatchAxis::Height | MatchAxis::Both) {
            patch.height = Some(reference.height() - region.base_rect.height());
        }
        store.set(&region.id, patch);
    }
    true
}

/// Re-space the selection evenly along one axis, holding the outermost two
/// members fixed. Requires at least three members.
pub fn distribute(
    members: &[&Region],
    direction: Direction,
    store: &mut LayoutDeltaStore,
) -> bool {
    if members.len() < 3 {
        return false;
    }

    let mut sorted: Vec<(&Region, Rect)> = members
        .iter()
        .map(|region| (*region, store.effective_rect(&region.id, region.base_rect)))
        .collect();
    sorted.sort_by(|(_, a), (_, b)| {
        let (a, b) = match direction {
            Direction::Horizontal => (a.x0, b.x0),
            Direction::Vertical => (a.y0, b.y0),
        };
        a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
    });

    let (leading, trailing, extent): (fn(Rect) -> f64, fn(Rect) -> f64, fn(Rect) -> f64) =
        match direction {
            Direction::Horizontal => (|r| r.x0, |r| r.x1, |r| r.width()),
            Direction::Vertical => (|r| r.y0, |r| r.y1, |r| r.height()),
        };

    let span = trailing(sorted[sorted.len() - 1].1) - leading(sorted[0].1);
    let total_extent: f64 = sorted.iter().map(|(_, rect)| extent(*rect)).sum();
    let gap = (span - total_extent) / (sorted.len() - 1) as f64;

    // The outermost two define the span and stay put.
    let mut cursor = trailing(sorted[0].1);
    for (region, rect) in &sorted[1..sorted.len() - 1] {
        let position = cursor + gap;
        let patch = match direction {
            Direction::Horizontal => DeltaPatch {
                x: Some(position - region.base_rect.x0),
                ..Default::default()
            },
            Direction::Vertical => DeltaPatch {
                y: Some(position - region.base_rect.y0),
                ..Default::default()
            },
        };
        store.set(&region.id, patch);
        cursor = position + extent(*rect);
    }
    true
}

fn effective_rects(members: &[&Region], store: &LayoutDeltaStore) -> Vec<Rect> {
    members
        .iter()
        .map(|region| store.effective_rect(&region.id, region.base_rect))
        .collect()
}

fn fold_min(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::INFINITY, f64::min)
}

fn fold_max(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::NEG_INFINITY, f64::max)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let collected: Vec<f64> = values.collect();
    collected.iter().sum::<f64>() / collected.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::view_tree::ViewNodeId;

    fn region(id: &str, x: f64, y: f64, w: f64, h: f64) -> Region {
        Region {
            id: id.to_string(),
            label: id.to_string(),
            base_rect: Rect::from_origin_size((x, y), (w, h)),
            node: dummy_node(),
        }
    }

    fn dummy_node() -> ViewNodeId {
        use crate::document::view_tree::ViewTree;
        let mut tree = ViewTree::new(kurbo::Size::new(1.0, 1.0));
        tree.push_node(tree.page(), Rect::ZERO)
    }

    #[test]
    fn align_needs_at_least_two_members() {
        let a = region("a", 10.0, 10.0, 50.0, 20.0);
        let mut store = LayoutDeltaStore::default();
        assert!(!align(&[&a], AlignEdge::Left, &mut store));
        assert!(store.is_empty());
    }

    #[test]
    fn align_left_targets_the_minimum_edge() {
        let a = region("a", 10.0, 10.0, 50.0, 20.0);
        let b = region("b", 40.0, 80.0, 30.0, 20.0);
        let mut store = LayoutDeltaStore::default();
        assert!(align(&[&a, &b], AlignEdge::Left, &mut store));
        assert_eq!(store.effective_rect("a", a.base_rect).x0, 10.0);
        assert_eq!(store.effective_rect("b", b.base_rect).x0, 10.0);
    }

    #[test]
    fn horizontal_alignment_never_touches_y() {
        let a = region("a", 10.0, 10.0, 50.0, 20.0);
        let b = region("b", 40.0, 80.0, 30.0, 20.0);
        let mut store = LayoutDeltaStore::default();
        align(&[&a, &b], AlignEdge::Right, &mut store);
        assert_eq!(store.get("a").y, 0.0);
        assert_eq!(store.get("b").y, 0.0);
        assert_eq!(store.effective_rect("a", a.base_rect).y0, 10.0);
        assert_eq!(store.effective_rect("b", b.base_rect).y0, 80.0);
    }

    #[test]
    fn align_center_uses_the_mean_of_centers() {
        let a = region("a", 0.0, 0.0, 20.0, 10.0); // center x 10
        let b = region("b", 20.0, 50.0, 40.0, 10.0); // center x 40
        let mut store = LayoutDeltaStore::default();
        align(&[&a, &b], AlignEdge::Center, &mut store);
        assert_eq!(store.effective_rect("a", a.base_rect).center().x, 25.0);
        assert_eq!(store.effective_rect("b", b.base_rect).center().x, 25.0);
    }

    #[test]
    fn match_size_uses_the_first_selected_as_reference() {
        let a = region("a", 0.0, 0.0, 64.0, 24.0);
        let b = region("b", 100.0, 0.0, 30.0, 50.0);
        let mut store = LayoutDeltaStore::default();
        assert!(match_size(&[&a, &b], MatchAxis::Both, &mut store));
        // Selection order decides: b matches a, a is untouched
        assert!(store.get("a").is_zero());
        let b_rect = store.effective_rect("b", b.base_rect);
        assert_eq!((b_rect.width(), b_rect.height()), (64.0, 24.0));
    }

    #[test]
    fn match_width_leaves_heights_alone() {
        let a = region("a", 0.0, 0.0, 64.0, 24.0);
        let b = region("b", 100.0, 0.0, 30.0, 50.0);
        let mut store = LayoutDeltaStore::default();
        match_size(&[&a, &b], MatchAxis::Width, &mut store);
        let b_rect = store.effective_rect("b", b.base_rect);
        assert_eq!((b_rect.width(), b_rect.height()), (64.0, 50.0));
    }

    #[test]
    fn distribute_needs_at_least_three_members() {
        let a = region("a", 0.0, 0.0, 10.0, 10.0);
        let b = region("b", 50.0, 0.0, 10.0, 10.0);
        let mut store = LayoutDeltaStore::default();
        assert!(!distribute(&[&a, &b], Direction::Horizontal, &mut store));
    }

    #[test]
    fn distribute_preserves_the_span_and_the_outermost_members() {
        let a = region("a", 0.0, 0.0, 80.0, 40.0);
        let b = region("b", 90.0, 0.0, 60.0, 40.0);
        let c = region("c", 300.0, 0.0, 40.0, 40.0);
        let mut store = LayoutDeltaStore::default();
        // Selection order is not geometric order; sorting happens inside
        assert!(distribute(&[&c, &a, &b], Direction::Horizontal, &mut store));

        let a_rect = store.effective_rect("a", a.base_rect);
        let b_rect = store.effective_rect("b", b.base_rect);
        let c_rect = store.effective_rect("c", c.base_rect);
        assert_eq!(a_rect.x0, 0.0);
        assert_eq!(c_rect.x1, 340.0);
        // span 340, extents 180, two gaps of 80 each
        assert_eq!(b_rect.x0, a_rect.x1 + 80.0);
        assert_eq!(c_rect.x0, b_rect.x1 + 80.0);
    }

    #[test]
    fn distribute_vertical_never_touches_x() {
        let a = region("a", 5.0, 0.0, 10.0, 20.0);
        let b = region("b", 50.0, 100.0, 10.0, 20.0);
        let c = region("c", 80.0, 30.0, 10.0, 20.0);
        let mut store = LayoutDeltaStore::default();
        distribute(&[&a, &b, &c], Direction::Vertical, &mut store);
        assert_eq!(store.get("a").x, 0.0);
        assert_eq!(store.get("b").x, 0.0);
        assert_eq!(store.get("c").x, 0.0);
    }
}
