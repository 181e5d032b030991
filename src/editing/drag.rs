//! Drag controller
//!
//! A small state machine translating pointer motion into a candidate
//! geometry for exactly one active operation (move or resize) at a time.
//! The operation baseline (pointer position and region rect) is captured
//! once at `begin`; every subsequent update recomputes the candidate from
//! that fixed baseline, never incrementally from the previous frame, so
//! rounding can not drift. The candidate stays local to the controller and
//! is committed to the shared delta store only on `end`, so mid-drag state
//! is never visible to other readers of the store.

use kurbo::{Point, Rect, Size, Vec2};

use crate::core::settings::{
    DRAG_DEAD_ZONE, MIN_REGION_HEIGHT, MIN_REGION_WIDTH,
};
use crate::editing::delta::{DeltaPatch, LayoutDeltaStore};
use crate::editing::snap::{
    compute_move_snap, compute_resize_snap, SnapGuide,
};

/// The eight resize handles around a selected region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::N,
        ResizeHandle::Ne,
        ResizeHandle::E,
        ResizeHandle::Se,
        ResizeHandle::S,
        ResizeHandle::Sw,
        ResizeHandle::W,
        ResizeHandle::Nw,
    ];

    /// Handle adjusts width
    pub fn horizontal(self) -> bool {
        !matches!(self, ResizeHandle::N | ResizeHandle::S)
    }

    /// Handle adjusts height
    pub fn vertical(self) -> bool {
        !matches!(self, ResizeHandle::E | ResizeHandle::W)
    }

    /// Growing from this handle must keep the right edge fixed
    pub fn west_bearing(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::W | ResizeHandle::Sw)
    }

    /// Growing from this handle must keep the bottom edge fixed
    pub fn north_bearing(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::N | ResizeHandle::Ne)
    }

    /// Where the handle sits on a region's rect
    pub fn anchor(self, rect: Rect) -> Point {
        let center = rect.center();
        match self {
            ResizeHandle::N => Point::new(center.x, rect.y0),
            ResizeHandle::Ne => Point::new(rect.x1, rect.y0),
            ResizeHandle::E => Point::new(rect.x1, center.y),
            ResizeHandle::Se => Point::new(rect.x1, rect.y1),
            ResizeHandle::S => Point::new(center.x, rect.y1),
            ResizeHandle::Sw => Point::new(rect.x0, rect.y1),
            ResizeHandle::W => Point::new(rect.x0, center.y),
            ResizeHandle::Nw => Point::new(rect.x0, rect.y0),
        }
    }
}

/// Exactly one drag operation is live at a time
#[derive(Debug, Clone, PartialEq)]
enum DragState {
    Idle,
    Moving {
        region_id: String,
        pointer_start: Point,
        rect_start: Rect,
    },
    Resizing {
        region_id: String,
        handle: ResizeHandle,
        pointer_start: Point,
        rect_start: Rect,
    },
}

/// Sibling geometry and page bounds the snap engine compares against
pub struct SnapContext<'a> {
    /// Effective rects of all detected regions (the dragged one is excluded
    /// by id inside the snap engine)
    pub regions: &'a [(String, Rect)],
    pub page: Size,
}

pub struct DragController {
    state: DragState,
    /// Base rect of the active region, for delta conversion on commit
    base_rect: Rect,
    candidate: Option<Rect>,
    guides: Vec<SnapGuide>,
    moved: bool,
}

impl Default for DragController {
    fn default() -> Self {
        Self {
            state: DragState::Idle,
            base_rect: Rect::ZERO,
            candidate: None,
            guides: Vec::new(),
            moved: false,
        }
    }
}

impl DragController {
    pub fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    pub fn active_region(&self) -> Option<&str> {
        match &self.state {
            DragState::Idle => None,
            DragState::Moving { region_id, .. }
            | DragState::Resizing { region_id, .. } => Some(region_id),
        }
    }

    /// The in-progress geometry of the active region, for live feedback
    pub fn preview_rect(&self) -> Option<Rect> {
        match &self.state {
            DragState::Idle => None,
            DragState::Moving { rect_start, .. }
            | DragState::Resizing { rect_start, .. } => {
                Some(self.candidate.unwrap_or(*rect_start))
            }
        }
    }

    pub fn guides(&self) -> &[SnapGuide] {
        &self.guides
    }

    /// Start a move; `effective_rect` and `base_rect` are the region's
    /// geometry at this instant and become the fixed operation baseline
    pub fn begin_move(
        &mut self,
        region_id: &str,
        base_rect: Rect,
        effective_rect: Rect,
        pointer: Point,
    ) {
        self.reset();
        self.base_rect = base_rect;
        self.state = DragState::Moving {
            region_id: region_id.to_string(),
            pointer_start: pointer,
            rect_start: effective_rect,
        };
    }

    /// Start a resize from one of the eight handles
    pub fn begin_resize(
        &mut self,
        region_id: &str,
        handle: ResizeHandle,
        base_rect: Rect,
        effective_rect: Rect,
        pointer: Point,
    ) {
        self.reset();
        self.base_rect = base_rect;
        self.state = DragState::Resizing {
            region_id: region_id.to_string(),
            handle,
            pointer_start: pointer,
            rect_start: effective_rect,
        };
    }

    /// Recompute the candidate from the fixed baseline.
    ///
    /// `scale` is the region's current ancestor scale factor, re-read every
    /// call since the container may be rescaled mid-drag.
    pub fn update(&mut self, pointer: Point, scale: f64, ctx: &SnapContext) {
        match self.state.clone() {
            DragState::Idle => {}
            DragState::Moving {
                region_id,
                pointer_start,
                rect_start,
            } => {
                let dx = (pointer.x - pointer_start.x) / scale;
                let dy = (pointer.y - pointer_start.y) / scale;
                let clamped = clamp_to_page(
                    rect_start + Vec2::new(dx, dy),
                    ctx.page,
                );
                let snapped =
                    compute_move_snap(clamped, &region_id, ctx.regions, ctx.page);
                self.note_movement(snapped.rect, rect_start);
                self.candidate = Some(snapped.rect);
                self.guides = snapped.guides;
            }
            DragState::Resizing {
                region_id,
                handle,
                pointer_start,
                rect_start,
            } => {
                let dx = (pointer.x - pointer_start.x) / scale;
                let dy = (pointer.y - pointer_start.y) / scale;

                let mut width = rect_start.width();
                let mut height = rect_start.height();
                if handle.horizontal() {
                    width += if handle.west_bearing() { -dx } else { dx };
                    width = width.max(MIN_REGION_WIDTH);
                }
                if handle.vertical() {
                    height += if handle.north_bearing() { -dy } else { dy };
                    height = height.max(MIN_REGION_HEIGHT);
                }

                let (size, guides) = compute_resize_snap(
                    Size::new(width, height),
                    &region_id,
                    ctx.regions,
                    handle.horizontal(),
                    handle.vertical(),
                );

                // Growing from a north/west handle shifts the origin so the
                // opposite edge stays put.
                let x = if handle.west_bearing() {
                    rect_start.x0 + (rect_start.width() - size.width)
                } else {
                    rect_start.x0
                };
                let y = if handle.north_bearing() {
                    rect_start.y0 + (rect_start.height() - size.height)
                } else {
                    rect_start.y0
                };

                let rect = Rect::from_origin_size((x, y), size);
                self.note_movement(rect, rect_start);
                self.candidate = Some(rect);
                self.guides = guides;
            }
        }
    }

    /// Finish the operation, committing the candidate as a delta iff the
    /// drag produced visible movement. Returns the edited region id, `None`
    /// for a plain click.
    pub fn end(&mut self, store: &mut LayoutDeltaStore) -> Option<String> {
        let committed = match (&self.state, self.candidate, self.moved) {
            (DragState::Moving { region_id, .. }, Some(rect), true) => {
                store.set(
                    region_id,
                    DeltaPatch::position(
                        rect.x0 - self.base_rect.x0,
                        rect.y0 - self.base_rect.y0,
                    ),
                );
                Some(region_id.clone())
            }
            (DragState::Resizing { region_id, .. }, Some(rect), true) => {
                store.set(
                    region_id,
                    DeltaPatch {
                        x: Some(rect.x0 - self.base_rect.x0),
                        y: Some(rect.y0 - self.base_rect.y0),
                        width: Some(rect.width() - self.base_rect.width()),
                        height: Some(rect.height() - self.base_rect.height()),
                    },
                );
                Some(region_id.clone())
            }
            _ => None,
        };
        self.reset();
        committed
    }

    /// Drop the operation without committing anything (window blur, mode
    /// exit)
    pub fn abort(&mut self) {
        self.reset();
    }

    fn note_movement(&mut self, candidate: Rect, start: Rect) {
        if (candidate.x0 - start.x0).abs() > DRAG_DEAD_ZONE
            || (candidate.y0 - start.y0).abs() > DRAG_DEAD_ZONE
            || (candidate.width() - start.width()).abs() > DRAG_DEAD_ZONE
            || (candidate.height() - start.height()).abs() > DRAG_DEAD_ZONE
        {
            self.moved = true;
        }
    }

    fn reset(&mut self) {
        self.state = DragState::Idle;
        self.candidate = None;
        self.guides.clear();
        self.moved = false;
    }
}

/// Keep the candidate's bounding box inside the page
fn clamp_to_page(rect: Rect, page: Size) -> Rect {
    let x = rect.x0.clamp(0.0, (page.width - rect.width()).max(0.0));
    let y = rect.y0.clamp(0.0, (page.height - rect.height()).max(0.0));
    Rect::from_origin_size((x, y), rect.size())
}
