//! Runtime application state resources

use bevy::prelude::*;
use kurbo::Size;

use crate::document::view_tree::ViewTree;
use crate::editing::overlay::OverlayController;

/// The loaded document and its view-tree mirror
#[derive(Resource)]
pub struct EditorDocument {
    pub title: String,
    pub tree: ViewTree,
}

impl Default for EditorDocument {
    fn default() -> Self {
        // A4 at 96dpi until a document is loaded
        Self {
            title: "untitled".to_string(),
            tree: ViewTree::new(Size::new(794.0, 1123.0)),
        }
    }
}

/// The overlay controller driving all editing interaction
#[derive(Resource, Default)]
pub struct EditorOverlay {
    pub controller: OverlayController,
}
