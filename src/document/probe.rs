//! Geometry probe
//!
//! Measures a region's *base* rect: its position and size as if no placement
//! override were applied, normalized into page coordinates at scale 1. The
//! probe briefly clears the node's placement, measures, and restores it, all
//! within one synchronous pass so the round trip is never observable.

use kurbo::Rect;

use crate::document::view_tree::{ViewNodeId, ViewTree};

/// Measure `node`'s untransformed rect in page coordinates at scale 1.
///
/// The measured absolute box is corrected by the combined scale factor of the
/// node's ancestors (1.0 when no ancestor scales) and by the page's own
/// absolute offset.
pub fn probe_base_rect(tree: &mut ViewTree, node: ViewNodeId) -> Rect {
    // Hold and clear the current override, measure, then put it back.
    let held = tree.take_placement(node);
    let measured = tree.bounding_box(node);
    tree.set_placement(node, held);

    let factor = tree.ancestor_scale(node);
    let page_origin = tree.bounding_box(tree.page()).origin();

    let x = (measured.x0 - page_origin.x) / factor;
    let y = (measured.y0 - page_origin.y) / factor;
    Rect::from_origin_size(
        (x, y),
        (measured.width() / factor, measured.height() / factor),
    )
}
