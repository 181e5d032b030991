//! Mouse and trackpad management

use bevy::prelude::*;

use crate::rendering::cameras::PageCamera;

/// Single source of truth for pointer (mouse/trackpad) position
#[derive(Resource, Default)]
pub struct PointerInfo {
    /// Screen space coordinates (pixels)
    pub screen: Vec2,
    /// World space coordinates
    pub world: Vec2,
    /// Page coordinates: origin at the page's top-left corner, y down
    pub page: kurbo::Point,
}

/// Plugin that centrally manages pointer position conversions
pub struct PointerPlugin;

impl Plugin for PointerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerInfo>()
            .add_systems(Update, update_pointer_position);
    }
}

/// System that updates pointer position once per frame.
/// This is the ONLY place coordinate conversions should happen.
fn update_pointer_position(
    mut pointer_info: ResMut<PointerInfo>,
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform), With<PageCamera>>,
) {
    if let (Ok(window), Ok((camera, camera_transform))) =
        (windows.single(), camera_query.single())
    {
        if let Some(screen_pos) = window.cursor_position() {
            pointer_info.screen = screen_pos;

            if let Ok(world_pos) =
                camera.viewport_to_world_2d(camera_transform, screen_pos)
            {
                pointer_info.world = world_pos;

                // World y points up, page y points down; the page top-left
                // sits at the world origin.
                pointer_info.page =
                    kurbo::Point::new(world_pos.x as f64, -world_pos.y as f64);
            }
        }
    }
}
