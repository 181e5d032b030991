//! Section registry
//!
//! Enumerates the tagged regions of the current document render, probing
//! each one's base rect, and caches every region's pre-edit placement so
//! reset and cancel can restore the document exactly as it was when editing
//! mode was entered.

use std::collections::HashMap;

use kurbo::Rect;

use crate::document::probe::probe_base_rect;
use crate::document::view_tree::{Placement, ViewNodeId, ViewTree};

/// A named, positionable region of the rendered document.
///
/// Records are rebuilt on every detection pass; only the arena id is kept,
/// never a live reference into the host render.
#[derive(Debug, Clone)]
pub struct Region {
    pub id: String,
    pub label: String,
    /// Position/size with all overrides removed, page coords at scale 1
    pub base_rect: Rect,
    pub node: ViewNodeId,
}

/// Registry of detected regions plus the restoration cache
#[derive(Default)]
pub struct SectionRegistry {
    regions: Vec<Region>,
    restore_cache: HashMap<String, Placement>,
}

impl SectionRegistry {
    /// Enumerate every tagged region and probe its base rect.
    ///
    /// When `initial` is true each region's current placement is snapshotted
    /// into the restoration cache; later non-initial passes never overwrite
    /// that snapshot.
    pub fn detect(&mut self, tree: &mut ViewTree, initial: bool) -> &[Region] {
        let tagged: Vec<(ViewNodeId, String, String)> = tree
            .regions()
            .map(|(node, tag)| (node, tag.id.clone(), tag.label.clone()))
            .collect();

        if initial {
            self.restore_cache.clear();
            for (node, id, _) in &tagged {
                self.restore_cache.insert(id.clone(), tree.placement(*node));
            }
        }

        self.regions.clear();
        for (node, id, label) in tagged {
            let base_rect = probe_base_rect(tree, node);
            self.regions.push(Region {
                id,
                label,
                base_rect,
                node,
            });
        }
        &self.regions
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|region| region.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Replay one region's cached placement into the tree
    pub fn restore(&self, tree: &mut ViewTree, id: &str) {
        if let (Some(region), Some(placement)) =
            (self.region(id), self.restore_cache.get(id))
        {
            tree.set_placement(region.node, *placement);
        }
    }

    /// Replay every cached placement (cancel path)
    pub fn restore_all(&self, tree: &mut ViewTree) {
        for region in &self.regions {
            if let Some(placement) = self.restore_cache.get(&region.id) {
                tree.set_placement(region.node, *placement);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::view_tree::{RegionTag, ViewTree};
    use kurbo::{Point, Size, Vec2};

    fn document() -> ViewTree {
        let mut tree = ViewTree::new(Size::new(800.0, 600.0));
        let page = tree.page();
        for (i, id) in ["header", "schedule", "fees"].iter().enumerate() {
            let node = tree.push_node(
                page,
                Rect::from_origin_size(
                    Point::new(20.0, 40.0 + 120.0 * i as f64),
                    Size::new(300.0, 100.0),
                ),
            );
            tree.tag_region(
                node,
                RegionTag {
                    id: id.to_string(),
                    label: id.to_string(),
                },
            );
        }
        tree
    }

    #[test]
    fn detection_is_idempotent() {
        let mut tree = document();
        let mut registry = SectionRegistry::default();
        let first: Vec<Rect> = registry
            .detect(&mut tree, false)
            .iter()
            .map(|r| r.base_rect)
            .collect();
        let second: Vec<Rect> = registry
            .detect(&mut tree, false)
            .iter()
            .map(|r| r.base_rect)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn non_initial_detect_keeps_the_restore_cache() {
        let mut tree = document();
        let mut registry = SectionRegistry::default();
        registry.detect(&mut tree, true);

        // Simulate a user edit, then a re-detection after a window resize.
        let node = registry.region("header").unwrap().node;
        tree.set_placement(
            node,
            Placement {
                offset: Vec2::new(50.0, 0.0),
                size: None,
            },
        );
        registry.detect(&mut tree, false);

        registry.restore(&mut tree, "header");
        assert!(tree.placement(node).is_identity());
    }

    #[test]
    fn restore_all_replays_the_entry_snapshot() {
        let mut tree = document();
        let node = tree.regions().next().unwrap().0;
        let original = Placement {
            offset: Vec2::new(7.0, -3.0),
            size: Some(Size::new(320.0, 90.0)),
        };
        tree.set_placement(node, original);

        let mut registry = SectionRegistry::default();
        registry.detect(&mut tree, true);
        tree.set_placement(node, Placement::default());

        registry.restore_all(&mut tree);
        assert_eq!(tree.placement(node), original);
    }
}
