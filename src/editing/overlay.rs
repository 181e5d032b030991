//! Overlay controller
//!
//! Composes the registry, delta store, drag controller, snap engine, and
//! multi-select operations into the interactive editing surface: detection
//! lifecycle, selection state, pointer and keyboard handling, and the
//! save / reset / cancel lifecycle that hands off to the external
//! persistence collaborator. Edit mode is an explicit flag on the
//! controller, never ambient state, so independent instances (e.g. in
//! tests) can not interfere with each other.

use kurbo::{Point, Rect, Size, Vec2};

use crate::core::errors::FreeplanResult;
use crate::core::settings::HANDLE_HIT_RADIUS;
use crate::document::persistence::OverrideSink;
use crate::document::registry::{Region, SectionRegistry};
use crate::document::view_tree::{Placement, ViewTree};
use crate::editing::arrange::{self, AlignEdge, Direction, MatchAxis};
use crate::editing::delta::{DeltaPatch, LayoutDeltaStore, OverrideRecord};
use crate::editing::drag::{DragController, ResizeHandle, SnapContext};
use crate::editing::snap::SnapGuide;

/// What the pointer landed on
#[derive(Debug, Clone, PartialEq)]
pub enum Hit {
    Handle(String, ResizeHandle),
    Body(String),
    Empty,
}

/// Interactive overlay over one rendered document
#[derive(Default)]
pub struct OverlayController {
    registry: SectionRegistry,
    store: LayoutDeltaStore,
    drag: DragController,
    /// Selection order matters: match-size uses the first member
    selection: Vec<String>,
    active: bool,
}

impl OverlayController {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn regions(&self) -> &[Region] {
        self.registry.regions()
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.iter().any(|member| member == id)
    }

    pub fn guides(&self) -> &[SnapGuide] {
        self.drag.guides()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Whether there are edits that would be lost without a save
    pub fn has_pending_edits(&self) -> bool {
        !self.store.is_empty()
    }

    /// Enter editing mode: detect regions (caching their pre-edit
    /// placement), reset the edit set, and load the persisted record.
    pub fn enter(&mut self, tree: &mut ViewTree, record: Option<&OverrideRecord>) {
        self.registry.detect(tree, true);
        self.store.clear();
        if let Some(record) = record {
            self.store.load_record(record);
        }
        self.selection.clear();
        self.active = true;
        self.sync_all_to_tree(tree);
        if self.registry.is_empty() {
            log::info!("overlay entered with no tagged regions; nothing to edit");
        }
    }

    /// Re-detect after a window resize or document reflow; the restoration
    /// cache from `enter` is preserved
    pub fn refresh(&mut self, tree: &mut ViewTree) {
        if self.active {
            self.registry.detect(tree, false);
        }
    }

    /// The region's current geometry: the live drag candidate while one is
    /// in progress, otherwise base rect + stored delta
    pub fn effective_rect(&self, id: &str) -> Option<Rect> {
        let region = self.registry.region(id)?;
        if self.drag.active_region() == Some(id) {
            if let Some(rect) = self.drag.preview_rect() {
                return Some(rect);
            }
        }
        Some(self.store.effective_rect(id, region.base_rect))
    }

    /// The region's current geometry in host coordinates, the space the
    /// pointer and the renderer live in
    pub fn host_rect(&self, tree: &ViewTree, id: &str) -> Option<Rect> {
        let region = self.registry.region(id)?;
        let rect = self.effective_rect(id)?;
        Some(tree.page_to_host(rect, region.node))
    }

    /// Hit testing happens in host coordinates: the pointer is compared
    /// against what is actually on screen, not the scale-1 page rects.
    /// Resize handles of selected regions win over region bodies; bodies
    /// hit-test topmost (last detected) first.
    pub fn hit_test(&self, tree: &ViewTree, pointer: Point) -> Hit {
        for id in &self.selection {
            if let Some(rect) = self.host_rect(tree, id) {
                for handle in ResizeHandle::ALL {
                    let anchor = handle.anchor(rect);
                    if (pointer.x - anchor.x).abs() <= HANDLE_HIT_RADIUS
                        && (pointer.y - anchor.y).abs() <= HANDLE_HIT_RADIUS
                    {
                        return Hit::Handle(id.clone(), handle);
                    }
                }
            }
        }
        for region in self.registry.regions().iter().rev() {
            if let Some(rect) = self.host_rect(tree, &region.id) {
                if rect.contains(pointer) {
                    return Hit::Body(region.id.clone());
                }
            }
        }
        Hit::Empty
    }

    /// Pointer-down: begin a move or resize, or adjust the selection.
    /// `pointer` is in host coordinates; `additive` is the multi-select
    /// modifier.
    pub fn pointer_down(&mut self, tree: &ViewTree, pointer: Point, additive: bool) {
        if !self.active {
            return;
        }
        match self.hit_test(tree, pointer) {
            Hit::Handle(id, handle) => {
                self.selection = vec![id.clone()];
                if let Some(region) = self.registry.region(&id) {
                    let effective =
                        self.store.effective_rect(&id, region.base_rect);
                    self.drag.begin_resize(
                        &id,
                        handle,
                        region.base_rect,
                        effective,
                        pointer,
                    );
                }
            }
            Hit::Body(id) => {
                if additive {
                    // Toggle membership; no drag starts from a modifier
                    // click.
                    if let Some(index) =
                        self.selection.iter().position(|member| member == &id)
                    {
                        self.selection.remove(index);
                    } else {
                        self.selection.push(id);
                    }
                } else {
                    // A drag reduces the selection to the dragged region.
                    self.selection = vec![id.clone()];
                    if let Some(region) = self.registry.region(&id) {
                        let effective =
                            self.store.effective_rect(&id, region.base_rect);
                        self.drag.begin_move(
                            &id,
                            region.base_rect,
                            effective,
                            pointer,
                        );
                    }
                }
            }
            Hit::Empty => {
                if !additive {
                    self.selection.clear();
                }
            }
        }
    }

    pub fn pointer_move(&mut self, tree: &ViewTree, pointer: Point) {
        let Some(active_id) = self.drag.active_region().map(str::to_string) else {
            return;
        };
        let Some(region) = self.registry.region(&active_id) else {
            self.drag.abort();
            return;
        };
        // Recomputed every move: the preview scale can change mid-drag.
        let scale = tree.ancestor_scale(region.node);
        let regions = self.effective_rects_for_snap();
        self.drag.update(
            pointer,
            scale,
            &SnapContext {
                regions: &regions,
                page: tree.page_size(),
            },
        );
    }

    /// Pointer-up: commit the drag if it moved, mirror the result into the
    /// tree. Returns the edited region id for a completed edit.
    pub fn pointer_up(&mut self, tree: &mut ViewTree) -> Option<String> {
        let edited = self.drag.end(&mut self.store);
        if let Some(id) = &edited {
            self.sync_region_to_tree(tree, id);
        }
        edited
    }

    /// Force-abandon an in-progress drag (window blur, mode exit)
    pub fn abort_drag(&mut self) {
        self.drag.abort();
    }

    /// Arrow-key nudge of the whole selection, in page units
    pub fn nudge_selection(&mut self, tree: &mut ViewTree, dx: f64, dy: f64) {
        if !self.active || self.selection.is_empty() {
            return;
        }
        for id in self.selection.clone() {
            let delta = self.store.get(&id);
            self.store
                .set(&id, DeltaPatch::position(delta.x + dx, delta.y + dy));
            self.sync_region_to_tree(tree, &id);
        }
    }

    /// Delete/Backspace: drop the selected regions' deltas and put their
    /// cached placement back
    pub fn reset_selected(&mut self, tree: &mut ViewTree) {
        for id in self.selection.clone() {
            self.store.remove(&id);
            self.registry.restore(tree, &id);
        }
    }

    /// Escape: selection only, edits stay
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn select_all(&mut self) {
        self.selection = self
            .registry
            .regions()
            .iter()
            .map(|region| region.id.clone())
            .collect();
    }

    pub fn align_selection(&mut self, tree: &mut ViewTree, edge: AlignEdge) -> bool {
        let members = self.selected_regions_cloned();
        let refs: Vec<&Region> = members.iter().collect();
        let changed = arrange::align(&refs, edge, &mut self.store);
        if changed {
            self.sync_members(tree, &members);
        }
        changed
    }

    pub fn match_selection_size(
        &mut self,
        tree: &mut ViewTree,
        axis: MatchAxis,
    ) -> bool {
        let members = self.selected_regions_cloned();
        let refs: Vec<&Region> = members.iter().collect();
        let changed = arrange::match_size(&refs, axis, &mut self.store);
        if changed {
            self.sync_members(tree, &members);
        }
        changed
    }

    pub fn distribute_selection(
        &mut self,
        tree: &mut ViewTree,
        direction: Direction,
    ) -> bool {
        let members = self.selected_regions_cloned();
        let refs: Vec<&Region> = members.iter().collect();
        let changed = arrange::distribute(&refs, direction, &mut self.store);
        if changed {
            self.sync_members(tree, &members);
        }
        changed
    }

    /// Save: drop every live placement (the document re-renders from base
    /// layout + flushed deltas), flush to the sink, and clear the edit set
    /// only once the flush succeeded. A failed flush keeps the edits and
    /// the editing session for retry.
    pub fn save(
        &mut self,
        tree: &mut ViewTree,
        sink: &mut dyn OverrideSink,
        broadcast: bool,
    ) -> FreeplanResult<()> {
        self.drag.abort();
        tree.clear_region_placements();
        let record = self.store.record();
        match sink.flush(&record, broadcast) {
            Ok(()) => {
                self.store.clear();
                self.selection.clear();
                self.active = false;
                Ok(())
            }
            Err(error) => {
                // Edits stay; put the live placements back so the document
                // does not visually revert under the user.
                self.sync_all_to_tree(tree);
                Err(error)
            }
        }
    }

    /// Cancel: restore every region's placement to the snapshot taken when
    /// editing mode was entered and discard the edit set
    pub fn cancel(&mut self, tree: &mut ViewTree) {
        self.drag.abort();
        self.registry.restore_all(tree);
        self.store.clear();
        self.selection.clear();
        self.active = false;
    }

    fn effective_rects_for_snap(&self) -> Vec<(String, Rect)> {
        self.registry
            .regions()
            .iter()
            .map(|region| {
                (
                    region.id.clone(),
                    self.store.effective_rect(&region.id, region.base_rect),
                )
            })
            .collect()
    }

    fn selected_regions_cloned(&self) -> Vec<Region> {
        self.selection
            .iter()
            .filter_map(|id| self.registry.region(id).cloned())
            .collect()
    }

    fn sync_members(&mut self, tree: &mut ViewTree, members: &[Region]) {
        for region in members {
            self.sync_region_to_tree(tree, &region.id);
        }
    }

    /// Mirror a region's stored delta into the tree as a placement
    fn sync_region_to_tree(&self, tree: &mut ViewTree, id: &str) {
        let Some(region) = self.registry.region(id) else {
            return;
        };
        let delta = self.store.get(id);
        let placement = if delta.is_zero() {
            Placement::default()
        } else {
            let size = if delta.width != 0.0 || delta.height != 0.0 {
                Some(Size::new(
                    region.base_rect.width() + delta.width,
                    region.base_rect.height() + delta.height,
                ))
            } else {
                None
            };
            Placement {
                offset: Vec2::new(delta.x, delta.y),
                size,
            }
        };
        tree.set_placement(region.node, placement);
    }

    fn sync_all_to_tree(&self, tree: &mut ViewTree) {
        for region in self.registry.regions() {
            self.sync_region_to_tree(tree, &region.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::persistence::MemorySink;
    use crate::document::view_tree::RegionTag;
    use crate::editing::delta::LayoutDelta;

    fn document() -> ViewTree {
        let mut tree = ViewTree::new(Size::new(800.0, 600.0));
        let page = tree.page();
        for (id, x, y) in [
            ("header", 20.0, 20.0),
            ("schedule", 20.0, 160.0),
            ("fees", 20.0, 300.0),
        ] {
            let node = tree.push_node(
                page,
                Rect::from_origin_size((x, y), (300.0, 100.0)),
            );
            tree.tag_region(
                node,
                RegionTag {
                    id: id.into(),
                    label: id.into(),
                },
            );
        }
        tree
    }

    fn entered() -> (ViewTree, OverlayController) {
        let mut tree = document();
        let mut overlay = OverlayController::default();
        overlay.enter(&mut tree, None);
        (tree, overlay)
    }

    #[test]
    fn enter_loads_and_applies_the_persisted_record() {
        let mut tree = document();
        let mut record = OverrideRecord::new();
        record.insert(
            "header".into(),
            LayoutDelta {
                x: 10.0,
                y: -5.0,
                ..Default::default()
            },
        );
        let mut overlay = OverlayController::default();
        overlay.enter(&mut tree, Some(&record));
        let rect = overlay.effective_rect("header").unwrap();
        assert_eq!(rect.origin(), Point::new(30.0, 15.0));
    }

    #[test]
    fn click_selects_and_release_without_motion_records_no_edit() {
        let (mut tree, mut overlay) = entered();
        overlay.pointer_down(&tree, Point::new(100.0, 50.0), false);
        assert_eq!(overlay.selection(), ["header".to_string()]);
        let edited = overlay.pointer_up(&mut tree);
        assert_eq!(edited, None);
        assert!(!overlay.has_pending_edits());
    }

    #[test]
    fn drag_moves_a_region_and_mirrors_into_the_tree() {
        let (mut tree, mut overlay) = entered();
        overlay.pointer_down(&tree, Point::new(100.0, 50.0), false);
        overlay.pointer_move(&tree, Point::new(150.0, 80.0));
        let edited = overlay.pointer_up(&mut tree);
        assert_eq!(edited.as_deref(), Some("header"));
        let rect = overlay.effective_rect("header").unwrap();
        assert_eq!(rect.origin(), Point::new(70.0, 50.0));
        // Tree placement mirrors the committed delta
        let node = overlay.regions()[0].node;
        assert_eq!(tree.placement(node).offset, Vec2::new(50.0, 30.0));
    }

    #[test]
    fn modifier_click_extends_and_toggles_the_selection() {
        let (mut tree, mut overlay) = entered();
        overlay.pointer_down(&tree, Point::new(100.0, 50.0), false);
        overlay.pointer_up(&mut tree);
        overlay.pointer_down(&tree, Point::new(100.0, 200.0), true);
        overlay.pointer_up(&mut tree);
        assert_eq!(
            overlay.selection(),
            ["header".to_string(), "schedule".to_string()]
        );
        overlay.pointer_down(&tree, Point::new(100.0, 200.0), true);
        overlay.pointer_up(&mut tree);
        assert_eq!(overlay.selection(), ["header".to_string()]);
    }

    #[test]
    fn empty_click_clears_the_selection() {
        let (mut tree, mut overlay) = entered();
        overlay.pointer_down(&tree, Point::new(100.0, 50.0), false);
        overlay.pointer_up(&mut tree);
        overlay.pointer_down(&tree, Point::new(700.0, 550.0), false);
        assert!(overlay.selection().is_empty());
    }

    #[test]
    fn nudge_moves_the_selection_by_page_units() {
        let (mut tree, mut overlay) = entered();
        overlay.pointer_down(&tree, Point::new(100.0, 50.0), false);
        overlay.pointer_up(&mut tree);
        overlay.nudge_selection(&mut tree, 1.0, 0.0);
        overlay.nudge_selection(&mut tree, 0.0, -10.0);
        let rect = overlay.effective_rect("header").unwrap();
        assert_eq!(rect.origin(), Point::new(21.0, 10.0));
    }

    #[test]
    fn reset_selected_restores_the_entry_placement() {
        let (mut tree, mut overlay) = entered();
        overlay.pointer_down(&tree, Point::new(100.0, 50.0), false);
        overlay.pointer_move(&tree, Point::new(180.0, 90.0));
        overlay.pointer_up(&mut tree);
        overlay.reset_selected(&mut tree);
        let rect = overlay.effective_rect("header").unwrap();
        assert_eq!(rect, Rect::from_origin_size((20.0, 20.0), (300.0, 100.0)));
        let node = overlay.regions()[0].node;
        assert!(tree.placement(node).is_identity());
    }

    #[test]
    fn cancel_is_an_exact_reset() {
        let (mut tree, mut overlay) = entered();
        let node = overlay.regions()[0].node;
        let before = tree.placement(node);
        overlay.pointer_down(&tree, Point::new(100.0, 50.0), false);
        overlay.pointer_move(&tree, Point::new(200.0, 200.0));
        overlay.pointer_up(&mut tree);
        overlay.nudge_selection(&mut tree, 5.0, 5.0);
        overlay.cancel(&mut tree);
        assert_eq!(tree.placement(node), before);
        assert!(!overlay.is_active());
        assert!(!overlay.has_pending_edits());
    }

    #[test]
    fn save_flushes_and_clears_only_on_success() {
        let (mut tree, mut overlay) = entered();
        overlay.pointer_down(&tree, Point::new(100.0, 50.0), false);
        overlay.pointer_move(&tree, Point::new(150.0, 50.0));
        overlay.pointer_up(&mut tree);

        let mut sink = MemorySink {
            fail_next: true,
            ..Default::default()
        };
        assert!(overlay.save(&mut tree, &mut sink, false).is_err());
        // Failed save keeps the edits for retry
        assert!(overlay.has_pending_edits());
        assert!(overlay.is_active());

        assert!(overlay.save(&mut tree, &mut sink, true).is_ok());
        assert!(!overlay.has_pending_edits());
        assert!(!overlay.is_active());
        assert_eq!(sink.record["header"].x, 50.0);
        assert!(sink.last_broadcast);
    }

    #[test]
    fn save_then_reload_round_trips() {
        let (mut tree, mut overlay) = entered();
        overlay.pointer_down(&tree, Point::new(100.0, 50.0), false);
        overlay.pointer_move(&tree, Point::new(110.0, 45.0));
        overlay.pointer_up(&mut tree);
        let mut sink = MemorySink::default();
        overlay.save(&mut tree, &mut sink, false).unwrap();

        let mut fresh = OverlayController::default();
        fresh.enter(&mut tree, Some(&sink.record));
        let rect = fresh.effective_rect("header").unwrap();
        assert_eq!(rect.origin(), Point::new(30.0, 15.0));
    }

    #[test]
    fn resize_via_handle_hits_before_the_body() {
        let (mut tree, mut overlay) = entered();
        overlay.pointer_down(&tree, Point::new(100.0, 50.0), false);
        overlay.pointer_up(&mut tree);
        // Press exactly on the header's south-east corner handle
        overlay.pointer_down(&tree, Point::new(320.0, 120.0), false);
        overlay.pointer_move(&tree, Point::new(340.0, 135.0));
        let edited = overlay.pointer_up(&mut tree);
        assert_eq!(edited.as_deref(), Some("header"));
        let rect = overlay.effective_rect("header").unwrap();
        assert_eq!(rect.size(), Size::new(320.0, 115.0));
        assert_eq!(rect.origin(), Point::new(20.0, 20.0));
    }

    #[test]
    fn drag_under_a_preview_scale_tracks_the_cursor() {
        let mut tree = document();
        tree.set_viewport_scale(0.5);
        let mut overlay = OverlayController::default();
        overlay.enter(&mut tree, None);

        // The header's base rect is (20,20)-(320,120) in page space, so on
        // screen it occupies (10,10)-(170,60). A point inside the page rect
        // but outside the on-screen rect must not hit it.
        overlay.pointer_down(&tree, Point::new(200.0, 80.0), false);
        assert!(overlay.selection().is_empty());

        overlay.pointer_down(&tree, Point::new(50.0, 25.0), false);
        assert_eq!(overlay.selection(), ["header".to_string()]);
        overlay.pointer_move(&tree, Point::new(60.0, 25.0));
        let edited = overlay.pointer_up(&mut tree);
        assert_eq!(edited.as_deref(), Some("header"));

        // 10 pointer units at scale 0.5 is 20 page units; on screen the
        // region moved exactly as far as the cursor.
        let rect = overlay.effective_rect("header").unwrap();
        assert_eq!(rect.x0, 40.0);
        let host = overlay.host_rect(&tree, "header").unwrap();
        assert_eq!(host.x0, 20.0);
    }

    #[test]
    fn an_empty_document_is_inert() {
        let mut tree = ViewTree::new(Size::new(400.0, 400.0));
        let mut overlay = OverlayController::default();
        overlay.enter(&mut tree, None);
        assert!(overlay.regions().is_empty());
        overlay.pointer_down(&tree, Point::new(10.0, 10.0), false);
        assert_eq!(overlay.pointer_up(&mut tree), None);
        overlay.select_all();
        overlay.nudge_selection(&mut tree, 1.0, 0.0);
        assert!(!overlay.has_pending_edits());
    }

    #[test]
    fn align_and_distribute_operate_on_the_selection() {
        let (mut tree, mut overlay) = entered();
        overlay.select_all();
        assert!(overlay.align_selection(&mut tree, AlignEdge::Left));
        assert!(overlay.distribute_selection(&mut tree, Direction::Vertical));
        // Less than the required members: no-op
        overlay.clear_selection();
        assert!(!overlay.align_selection(&mut tree, AlignEdge::Left));
    }
}
