//! Document description loading
//!
//! A document description is a small JSON file naming the page size, an
//! optional preview scale, and the named region frames in document order.
//! It stands in for whatever produced the rendered layout; the engine only
//! needs enough of it to rebuild a [`ViewTree`].

use std::fs;
use std::path::Path;

use anyhow::ensure;
use kurbo::{Rect, Size};
use serde::Deserialize;

use crate::core::errors::{FreeplanContext, FreeplanResult};
use crate::document::view_tree::{RegionTag, ViewNodeId, ViewTree};

#[derive(Debug, Deserialize)]
pub struct DocumentDescription {
    #[serde(default)]
    pub title: String,
    pub page: PageDescription,
    /// Preview scale the host applies around the page
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub regions: Vec<RegionDescription>,
    /// Scaled subtrees of the page; regions inside them are measured under
    /// the group's scale
    #[serde(default)]
    pub groups: Vec<GroupDescription>,
}

#[derive(Debug, Deserialize)]
pub struct GroupDescription {
    pub frame: FrameDescription,
    #[serde(default = "default_group_scale")]
    pub scale: f64,
    #[serde(default)]
    pub regions: Vec<RegionDescription>,
    #[serde(default)]
    pub groups: Vec<GroupDescription>,
}

fn default_group_scale() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
pub struct PageDescription {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Deserialize)]
pub struct RegionDescription {
    pub id: String,
    /// Falls back to the id when absent
    #[serde(default)]
    pub label: Option<String>,
    pub frame: FrameDescription,
}

#[derive(Debug, Deserialize)]
pub struct FrameDescription {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

pub fn load_document<P: AsRef<Path>>(path: P) -> FreeplanResult<DocumentDescription> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_file_context("read", path)?;
    let description: DocumentDescription =
        serde_json::from_str(&raw).with_file_context("parse", path)?;
    ensure!(
        description.page.width > 0.0 && description.page.height > 0.0,
        "document {} has a degenerate page size {}x{}",
        path.display(),
        description.page.width,
        description.page.height
    );
    // A non-positive scale would poison every probed rect with NaN.
    if let Some(scale) = description.scale {
        ensure!(
            scale.is_finite() && scale > 0.0,
            "document {} has an invalid preview scale {}",
            path.display(),
            scale
        );
    }
    validate_group_scales(&description.groups, path)?;
    Ok(description)
}

fn validate_group_scales(
    groups: &[GroupDescription],
    path: &Path,
) -> FreeplanResult<()> {
    for group in groups {
        ensure!(
            group.scale.is_finite() && group.scale > 0.0,
            "document {} has a group with an invalid scale {}",
            path.display(),
            group.scale
        );
        validate_group_scales(&group.groups, path)?;
    }
    Ok(())
}

/// Build the view-tree mirror of a described document
pub fn build_view_tree(description: &DocumentDescription) -> ViewTree {
    let mut tree = ViewTree::new(Size::new(
        description.page.width,
        description.page.height,
    ));
    if let Some(scale) = description.scale {
        tree.set_viewport_scale(scale);
    }
    let page = tree.page();
    add_regions(&mut tree, page, &description.regions);
    add_groups(&mut tree, page, &description.groups);
    tree
}

fn add_regions(
    tree: &mut ViewTree,
    parent: ViewNodeId,
    regions: &[RegionDescription],
) {
    for region in regions {
        let node = tree.push_node(parent, frame_rect(&region.frame));
        tree.tag_region(
            node,
            RegionTag {
                id: region.id.clone(),
                label: region
                    .label
                    .clone()
                    .unwrap_or_else(|| region.id.clone()),
            },
        );
    }
}

fn add_groups(
    tree: &mut ViewTree,
    parent: ViewNodeId,
    groups: &[GroupDescription],
) {
    for group in groups {
        let node =
            tree.push_scaled_group(parent, frame_rect(&group.frame), group.scale);
        add_regions(tree, node, &group.regions);
        add_groups(tree, node, &group.groups);
    }
}

fn frame_rect(frame: &FrameDescription) -> Rect {
    Rect::from_origin_size((frame.x, frame.y), (frame.width, frame.height))
}
