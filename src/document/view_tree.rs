//! View-node arena for the rendered document
//!
//! The overlay engine never holds live references into the host render.
//! Instead the rendered document is mirrored as an explicit arena of view
//! nodes keyed by [`ViewNodeId`]; callers keep ids and ask the tree for
//! geometry at the moment they need it. Each node has a natural `frame`
//! (parent-relative, at scale 1), an optional 2D scale applied to its
//! descendants, and a [`Placement`] override holding the user-facing
//! positioning state (translate offset plus explicit size).

use kurbo::{Point, Rect, Size, Vec2};

/// Arena id for a node in the view tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewNodeId(u32);

impl ViewNodeId {
    #[allow(dead_code)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Positioning override applied on top of a node's natural frame.
///
/// Mirrors the host's translate transform and explicit width/height; an
/// identity placement means the node sits exactly where document flow put it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    /// Translate offset from the natural frame origin
    pub offset: Vec2,
    /// Explicit size replacing the natural frame size, if any
    pub size: Option<Size>,
}

impl Placement {
    pub fn is_identity(&self) -> bool {
        self.offset.x == 0.0 && self.offset.y == 0.0 && self.size.is_none()
    }
}

/// Marks a node as a named, user-positionable region of the document
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTag {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone)]
struct ViewNode {
    parent: Option<ViewNodeId>,
    frame: Rect,
    scale: f64,
    placement: Placement,
    region: Option<RegionTag>,
}

/// Arena of view nodes standing in for the host render tree.
///
/// The tree always has an outer viewport node (which may carry a preview
/// scale) and a page node inside it; regions live under the page.
pub struct ViewTree {
    nodes: Vec<ViewNode>,
    viewport: ViewNodeId,
    page: ViewNodeId,
}

impl ViewTree {
    /// Create a tree with a page of the given size at the viewport origin
    pub fn new(page_size: Size) -> Self {
        let viewport = ViewNode {
            parent: None,
            frame: Rect::from_origin_size(Point::ZERO, page_size),
            scale: 1.0,
            placement: Placement::default(),
            region: None,
        };
        let mut tree = Self {
            nodes: vec![viewport],
            viewport: ViewNodeId(0),
            page: ViewNodeId(0),
        };
        let page = tree.push_node(
            ViewNodeId(0),
            Rect::from_origin_size(Point::ZERO, page_size),
        );
        tree.page = page;
        tree
    }

    /// The outermost node; its scale models a zoomed document preview
    pub fn viewport(&self) -> ViewNodeId {
        self.viewport
    }

    /// The page node: the positioning container all regions are measured
    /// against
    pub fn page(&self) -> ViewNodeId {
        self.page
    }

    pub fn page_size(&self) -> Size {
        self.node(self.page).frame.size()
    }

    /// Set the preview scale the host applies around the page
    pub fn set_viewport_scale(&mut self, scale: f64) {
        self.node_mut(self.viewport).scale = scale;
    }

    /// Add a node under `parent` with the given natural frame
    pub fn push_node(&mut self, parent: ViewNodeId, frame: Rect) -> ViewNodeId {
        let id = ViewNodeId(self.nodes.len() as u32);
        self.nodes.push(ViewNode {
            parent: Some(parent),
            frame,
            scale: 1.0,
            placement: Placement::default(),
            region: None,
        });
        id
    }

    /// Add a group node that scales its descendants
    pub fn push_scaled_group(
        &mut self,
        parent: ViewNodeId,
        frame: Rect,
        scale: f64,
    ) -> ViewNodeId {
        let id = self.push_node(parent, frame);
        self.node_mut(id).scale = scale;
        id
    }

    /// Tag a node as a named region
    pub fn tag_region(&mut self, id: ViewNodeId, tag: RegionTag) {
        self.node_mut(id).region = Some(tag);
    }

    /// All tagged regions in document order
    pub fn regions(&self) -> impl Iterator<Item = (ViewNodeId, &RegionTag)> {
        self.nodes.iter().enumerate().filter_map(|(i, node)| {
            node.region
                .as_ref()
                .map(|tag| (ViewNodeId(i as u32), tag))
        })
    }

    pub fn placement(&self, id: ViewNodeId) -> Placement {
        self.node(id).placement
    }

    pub fn set_placement(&mut self, id: ViewNodeId, placement: Placement) {
        self.node_mut(id).placement = placement;
    }

    /// Read and clear a node's placement in one step (probe round trip)
    pub fn take_placement(&mut self, id: ViewNodeId) -> Placement {
        std::mem::take(&mut self.node_mut(id).placement)
    }

    pub fn clear_placement(&mut self, id: ViewNodeId) {
        self.node_mut(id).placement = Placement::default();
    }

    /// Clear the placement of every tagged region
    pub fn clear_region_placements(&mut self) {
        for node in &mut self.nodes {
            if node.region.is_some() {
                node.placement = Placement::default();
            }
        }
    }

    /// Combined scale factor applied to `id` by all of its ancestors
    pub fn ancestor_scale(&self, id: ViewNodeId) -> f64 {
        let mut factor = 1.0;
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            factor *= self.node(parent).scale;
            current = self.node(parent).parent;
        }
        factor
    }

    /// The node's local rect: natural frame with its placement applied
    fn local_rect(&self, id: ViewNodeId) -> Rect {
        let node = self.node(id);
        let origin = node.frame.origin() + node.placement.offset;
        let size = node.placement.size.unwrap_or_else(|| node.frame.size());
        Rect::from_origin_size(origin, size)
    }

    /// Absolute bounding box of a node, with every ancestor scale applied
    pub fn bounding_box(&self, id: ViewNodeId) -> Rect {
        let local = self.local_rect(id);
        match self.node(id).parent {
            None => local,
            Some(parent) => {
                let parent_box = self.bounding_box(parent);
                let factor = self.ancestor_scale(id);
                let origin = parent_box.origin()
                    + local.origin().to_vec2() * factor;
                Rect::from_origin_size(
                    origin,
                    Size::new(local.width() * factor, local.height() * factor),
                )
            }
        }
    }

    /// Map a rect in page coordinates at scale 1 back into host coordinates
    /// at `node`'s depth (the inverse of the probe normalization)
    pub fn page_to_host(&self, rect: Rect, id: ViewNodeId) -> Rect {
        let factor = self.ancestor_scale(id);
        let origin = self.bounding_box(self.page).origin();
        Rect::from_origin_size(
            (origin.x + rect.x0 * factor, origin.y + rect.y0 * factor),
            (rect.width() * factor, rect.height() * factor),
        )
    }

    /// Combined scale applied to the page's immediate content
    pub fn page_scale(&self) -> f64 {
        self.ancestor_scale(self.page) * self.node(self.page).scale
    }

    fn node(&self, id: ViewNodeId) -> &ViewNode {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: ViewNodeId) -> &mut ViewNode {
        &mut self.nodes[id.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_region() -> (ViewTree, ViewNodeId) {
        let mut tree = ViewTree::new(Size::new(800.0, 600.0));
        let page = tree.page();
        let node = tree.push_node(
            page,
            Rect::from_origin_size(Point::new(40.0, 30.0), Size::new(100.0, 50.0)),
        );
        tree.tag_region(
            node,
            RegionTag {
                id: "header".into(),
                label: "Header".into(),
            },
        );
        (tree, node)
    }

    #[test]
    fn bounding_box_without_scale_matches_frame() {
        let (tree, node) = tree_with_region();
        let bbox = tree.bounding_box(node);
        assert_eq!(bbox, Rect::new(40.0, 30.0, 140.0, 80.0));
    }

    #[test]
    fn viewport_scale_shrinks_absolute_geometry() {
        let (mut tree, node) = tree_with_region();
        tree.set_viewport_scale(0.5);
        let bbox = tree.bounding_box(node);
        assert_eq!(bbox.origin(), Point::new(20.0, 15.0));
        assert_eq!(bbox.size(), Size::new(50.0, 25.0));
        assert_eq!(tree.ancestor_scale(node), 0.5);
    }

    #[test]
    fn placement_offsets_and_resizes_the_local_rect() {
        let (mut tree, node) = tree_with_region();
        tree.set_placement(
            node,
            Placement {
                offset: Vec2::new(10.0, -5.0),
                size: Some(Size::new(120.0, 60.0)),
            },
        );
        let bbox = tree.bounding_box(node);
        assert_eq!(bbox, Rect::new(50.0, 25.0, 170.0, 85.0));
    }

    #[test]
    fn take_placement_clears_and_returns_previous_state() {
        let (mut tree, node) = tree_with_region();
        let placement = Placement {
            offset: Vec2::new(3.0, 4.0),
            size: None,
        };
        tree.set_placement(node, placement);
        let held = tree.take_placement(node);
        assert_eq!(held, placement);
        assert!(tree.placement(node).is_identity());
    }

    #[test]
    fn page_to_host_inverts_the_probe_normalization() {
        let (mut tree, node) = tree_with_region();
        tree.set_viewport_scale(0.5);
        let page_rect = Rect::new(40.0, 30.0, 140.0, 80.0);
        let host = tree.page_to_host(page_rect, node);
        assert_eq!(host, tree.bounding_box(node));
        assert_eq!(tree.page_scale(), 0.5);
    }

    #[test]
    fn nested_scaled_groups_compound() {
        let mut tree = ViewTree::new(Size::new(400.0, 400.0));
        let group = tree.push_scaled_group(
            tree.page(),
            Rect::from_origin_size(Point::new(10.0, 10.0), Size::new(200.0, 200.0)),
            2.0,
        );
        let inner = tree.push_node(
            group,
            Rect::from_origin_size(Point::new(5.0, 5.0), Size::new(20.0, 20.0)),
        );
        // group is unscaled by its ancestors; inner doubles
        assert_eq!(tree.ancestor_scale(group), 1.0);
        assert_eq!(tree.ancestor_scale(inner), 2.0);
        let bbox = tree.bounding_box(inner);
        assert_eq!(bbox.origin(), Point::new(20.0, 20.0));
        assert_eq!(bbox.size(), Size::new(40.0, 40.0));
    }
}
