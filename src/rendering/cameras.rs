//! Camera setup for the page view
//!
//! One 2D camera centered on the page. Page coordinates are y-down with the
//! top-left corner at the world origin, so the page center sits at
//! `(w/2, -h/2)` in world space.

use bevy::prelude::*;

use crate::core::state::EditorDocument;

/// Component that marks the page camera
#[derive(Component)]
pub struct PageCamera;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        // PostStartup: the document is loaded during Startup and the camera
        // centers on its page size.
        app.add_systems(PostStartup, spawn_page_camera);
    }
}

fn spawn_page_camera(mut commands: Commands, document: Res<EditorDocument>) {
    // Center on the page as it is actually shown (preview scale applied).
    let center = document.tree.bounding_box(document.tree.page()).center();
    commands.spawn((
        Camera2d,
        Transform::from_xyz(center.x as f32, -(center.y as f32), 0.0),
        PageCamera,
    ));
}
