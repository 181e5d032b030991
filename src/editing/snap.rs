//! Snap engine
//!
//! Given a region's proposed geometry during a drag, computes the snapped
//! alternative by comparing against every sibling region and the page
//! bounds. Rules run in a fixed order (edge, center, spacing equalization,
//! container) and each later match overwrites the axis coordinate, so the
//! last matching rule for an axis wins. Matches also emit guide lines for
//! user feedback.

use kurbo::{Rect, Size};

use crate::core::settings::{
    GUIDE_MERGE_DISTANCE, SNAP_ALIGN_THRESHOLD, SNAP_SPACING_THRESHOLD,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Transient visual line indicating a detected alignment or spacing
/// relationship; rebuilt on every pointer move
#[derive(Debug, Clone, PartialEq)]
pub struct SnapGuide {
    pub axis: Axis,
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct SnapResult {
    pub rect: Rect,
    pub guides: Vec<SnapGuide>,
}

/// Snap a moving candidate rect against sibling regions and the page.
///
/// `regions` holds every detected region's effective rect; the dragged
/// region is excluded by id. Size is never changed here, only position.
pub fn compute_move_snap(
    candidate: Rect,
    exclude_id: &str,
    regions: &[(String, Rect)],
    page: Size,
) -> SnapResult {
    let width = candidate.width();
    let height = candidate.height();
    let mut x = candidate.x0;
    let mut y = candidate.y0;
    let mut guides: Vec<SnapGuide> = Vec::new();

    let others: Vec<&(String, Rect)> = regions
        .iter()
        .filter(|(id, _)| id != exclude_id)
        .collect();

    // 1. Edge-to-edge
    for (id, other) in others.iter().map(|entry| (&entry.0, entry.1)) {
        for (edge_offset, target) in [
            (0.0, other.x0),
            (0.0, other.x1),
            (width, other.x1),
            (width, other.x0),
        ] {
            if (x + edge_offset - target).abs() <= SNAP_ALIGN_THRESHOLD {
                x = target - edge_offset;
                guides.push(guide(Axis::X, target, format!("edge of {id}")));
            }
        }
        for (edge_offset, target) in [
            (0.0, other.y0),
            (0.0, other.y1),
            (height, other.y1),
            (height, other.y0),
        ] {
            if (y + edge_offset - target).abs() <= SNAP_ALIGN_THRESHOLD {
                y = target - edge_offset;
                guides.push(guide(Axis::Y, target, format!("edge of {id}")));
            }
        }
    }

    // 2. Center-to-center
    for (id, other) in others.iter().map(|entry| (&entry.0, entry.1)) {
        let target = other.center().x;
        if (x + width / 2.0 - target).abs() <= SNAP_ALIGN_THRESHOLD {
            x = target - width / 2.0;
            guides.push(guide(Axis::X, target, format!("center of {id}")));
        }
        let target = other.center().y;
        if (y + height / 2.0 - target).abs() <= SNAP_ALIGN_THRESHOLD {
            y = target - height / 2.0;
            guides.push(guide(Axis::Y, target, format!("center of {id}")));
        }
    }

    // 3. Spacing equalization: continue an even row or column started by any
    //    other two regions
    for (_, a) in &others {
        for (_, b) in &others {
            if a.x1 < b.x0 {
                let gap = b.x0 - a.x1;
                let target = b.x1 + gap;
                if (x - target).abs() <= SNAP_SPACING_THRESHOLD {
                    x = target;
                    guides.push(guide(Axis::X, target, "equal spacing".into()));
                }
            }
            if a.y1 < b.y0 {
                let gap = b.y0 - a.y1;
                let target = b.y1 + gap;
                if (y - target).abs() <= SNAP_SPACING_THRESHOLD {
                    y = target;
                    guides.push(guide(Axis::Y, target, "equal spacing".into()));
                }
            }
        }
    }

    // 4. Container: page center, then page edges
    if (x + width / 2.0 - page.width / 2.0).abs() <= SNAP_ALIGN_THRESHOLD {
        x = (page.width - width) / 2.0;
        guides.push(guide(Axis::X, page.width / 2.0, "page center".into()));
    }
    if (y + height / 2.0 - page.height / 2.0).abs() <= SNAP_ALIGN_THRESHOLD {
        y = (page.height - height) / 2.0;
        guides.push(guide(Axis::Y, page.height / 2.0, "page center".into()));
    }
    for (edge_offset, target) in [(0.0, 0.0), (width, page.width)] {
        if (x + edge_offset - target).abs() <= SNAP_ALIGN_THRESHOLD {
            x = target - edge_offset;
            guides.push(guide(Axis::X, target, "page edge".into()));
        }
    }
    for (edge_offset, target) in [(0.0, 0.0), (height, page.height)] {
        if (y + edge_offset - target).abs() <= SNAP_ALIGN_THRESHOLD {
            y = target - edge_offset;
            guides.push(guide(Axis::Y, target, "page edge".into()));
        }
    }

    SnapResult {
        rect: Rect::from_origin_size((x, y), (width, height)),
        guides: collapse_guides(guides),
    }
}

/// Snap a resizing candidate's width/height to match other regions' sizes.
///
/// Narrower than move snapping: positions are never compared, and only the
/// axes being actively resized participate.
pub fn compute_resize_snap(
    size: Size,
    exclude_id: &str,
    regions: &[(String, Rect)],
    horizontal: bool,
    vertical: bool,
) -> (Size, Vec<SnapGuide>) {
    let mut width = size.width;
    let mut height = size.height;
    let mut guides: Vec<SnapGuide> = Vec::new();

    for (id, other) in regions.iter().filter(|(id, _)| id != exclude_id) {
        if horizontal && (width - other.width()).abs() <= SNAP_ALIGN_THRESHOLD {
            width = other.width();
            guides.push(guide(Axis::X, width, format!("width of {id}")));
        }
        if vertical && (height - other.height()).abs() <= SNAP_ALIGN_THRESHOLD {
            height = other.height();
            guides.push(guide(Axis::Y, height, format!("height of {id}")));
        }
    }

    (Size::new(width, height), collapse_guides(guides))
}

fn guide(axis: Axis, position: f64, label: String) -> SnapGuide {
    SnapGuide {
        axis,
        position,
        label,
    }
}

/// Collapse guides on the same axis closer than half a unit, keeping the
/// most recent one (the rule that actually decided the coordinate)
fn collapse_guides(guides: Vec<SnapGuide>) -> Vec<SnapGuide> {
    let mut out: Vec<SnapGuide> = Vec::new();
    for guide in guides {
        if let Some(existing) = out.iter_mut().find(|g| {
            g.axis == guide.axis
                && (g.position - guide.position).abs() <= GUIDE_MERGE_DISTANCE
        }) {
            *existing = guide;
        } else {
            out.push(guide);
        }
    }
    out
}
