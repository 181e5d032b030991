//! Gizmo rendering of the editing overlay
//!
//! Draws the page frame, region outlines, selection handles, and the
//! transient snap guides. Everything is immediate-mode gizmos rebuilt each
//! frame from the controller's state.

use bevy::prelude::*;
use kurbo::Rect;

use crate::core::state::{EditorDocument, EditorOverlay};
use crate::editing::drag::ResizeHandle;
use crate::editing::snap::Axis;

pub const BACKGROUND_COLOR: Color = Color::srgb(0.13, 0.13, 0.14);
const PAGE_COLOR: Color = Color::srgb(0.95, 0.95, 0.93);
const REGION_COLOR: Color = Color::srgba(0.45, 0.55, 0.7, 0.9);
const SELECTED_COLOR: Color = Color::srgb(1.0, 0.55, 0.1);
const HANDLE_COLOR: Color = Color::srgb(1.0, 0.75, 0.3);
const GUIDE_COLOR: Color = Color::srgb(0.3, 0.85, 0.55);

const HANDLE_SIZE: f32 = 8.0;
const GUIDE_DASH_LENGTH: f32 = 8.0;
const GUIDE_GAP_LENGTH: f32 = 4.0;

pub struct OverlayRenderPlugin;

impl Plugin for OverlayRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, render_overlay);
    }
}

/// Everything is drawn in host coordinates (the page's on-screen geometry
/// under the document's preview scale), the same space the pointer reports
/// in, so the cursor, the hit test, and the picture always agree.
fn render_overlay(
    mut gizmos: Gizmos,
    document: Res<EditorDocument>,
    overlay: Res<EditorOverlay>,
) {
    let tree = &document.tree;
    let page_host = tree.bounding_box(tree.page());
    draw_rect(&mut gizmos, page_host, PAGE_COLOR);

    let controller = &overlay.controller;
    if !controller.is_active() {
        return;
    }

    for region in controller.regions() {
        let Some(rect) = controller.host_rect(tree, &region.id) else {
            continue;
        };
        let selected = controller.is_selected(&region.id);
        let color = if selected { SELECTED_COLOR } else { REGION_COLOR };
        draw_rect(&mut gizmos, rect, color);

        if selected {
            for handle in ResizeHandle::ALL {
                let anchor = to_world(handle.anchor(rect));
                gizmos.rect_2d(anchor, Vec2::splat(HANDLE_SIZE), HANDLE_COLOR);
            }
        }
    }

    // Guides are computed in page coordinates; map them through the page's
    // content scale.
    let factor = tree.page_scale();
    let origin = page_host.origin();
    for guide in controller.guides() {
        let (start, end) = match guide.axis {
            Axis::X => {
                let x = origin.x + guide.position * factor;
                (
                    to_world(kurbo::Point::new(x, page_host.y0)),
                    to_world(kurbo::Point::new(x, page_host.y1)),
                )
            }
            Axis::Y => {
                let y = origin.y + guide.position * factor;
                (
                    to_world(kurbo::Point::new(page_host.x0, y)),
                    to_world(kurbo::Point::new(page_host.x1, y)),
                )
            }
        };
        draw_dashed_line(
            &mut gizmos,
            start,
            end,
            GUIDE_COLOR,
            GUIDE_DASH_LENGTH,
            GUIDE_GAP_LENGTH,
        );
    }
}

/// Page point (y down) to world point (y up)
fn to_world(point: kurbo::Point) -> Vec2 {
    Vec2::new(point.x as f32, -point.y as f32)
}

fn draw_rect(gizmos: &mut Gizmos, rect: Rect, color: Color) {
    let center = to_world(rect.center());
    let size = Vec2::new(rect.width() as f32, rect.height() as f32);
    gizmos.rect_2d(center, size, color);
}

/// Helper to draw a dashed line between two points
fn draw_dashed_line(
    gizmos: &mut Gizmos,
    start: Vec2,
    end: Vec2,
    color: Color,
    dash_length: f32,
    gap_length: f32,
) {
    let direction = end - start;
    let total_length = direction.length();
    if total_length <= f32::EPSILON {
        return;
    }
    let step = direction / total_length;
    let segment = dash_length + gap_length;

    let mut travelled = 0.0;
    while travelled < total_length {
        let dash_end = (travelled + dash_length).min(total_length);
        gizmos.line_2d(
            start + step * travelled,
            start + step * dash_end,
            color,
        );
        travelled += segment;
    }
}
