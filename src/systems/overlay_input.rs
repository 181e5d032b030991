//! Input systems feeding the overlay controller
//!
//! Translates Bevy input events into controller calls. Key bindings:
//! E toggles editing mode, Ctrl+S saves (Shift broadcasts to siblings),
//! Ctrl+A selects all, arrows nudge (Shift for the large step),
//! Delete/Backspace resets the selection to the base layout, Escape drops
//! the drag or the selection. Losing window focus mid-drag aborts the drag.

use bevy::prelude::*;
use bevy::window::{WindowFocused, WindowResized};

use crate::core::cli::CliArgs;
use crate::core::pointer::PointerInfo;
use crate::core::settings::{NUDGE_AMOUNT, SHIFT_NUDGE_AMOUNT};
use crate::core::state::{EditorDocument, EditorOverlay};
use crate::document::persistence::{self, JsonFileSink};

pub struct OverlayInputPlugin;

impl Plugin for OverlayInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                handle_mode_keys,
                handle_pointer_buttons,
                handle_pointer_motion,
                handle_keyboard_adjustment,
                abort_drag_on_blur,
                refresh_on_resize,
            )
                .chain(),
        );
    }
}

fn shift_pressed(keys: &ButtonInput<KeyCode>) -> bool {
    keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight)
}

fn ctrl_pressed(keys: &ButtonInput<KeyCode>) -> bool {
    keys.pressed(KeyCode::ControlLeft)
        || keys.pressed(KeyCode::ControlRight)
        || keys.pressed(KeyCode::SuperLeft)
        || keys.pressed(KeyCode::SuperRight)
}

/// E toggles editing mode; Ctrl+S saves
fn handle_mode_keys(
    keys: Res<ButtonInput<KeyCode>>,
    cli_args: Res<CliArgs>,
    mut document: ResMut<EditorDocument>,
    mut overlay: ResMut<EditorOverlay>,
) {
    if keys.just_pressed(KeyCode::KeyE) && !ctrl_pressed(&keys) {
        if overlay.controller.is_active() {
            overlay.controller.cancel(&mut document.tree);
            info!("left editing mode, discarding unsaved changes");
        } else {
            let record = match persistence::load_record(&cli_args.overrides_path)
            {
                Ok(record) => record,
                Err(error) => {
                    warn!("could not load override record: {error:#}");
                    Default::default()
                }
            };
            overlay.controller.enter(&mut document.tree, Some(&record));
            info!(
                "entered editing mode with {} region(s)",
                overlay.controller.regions().len()
            );
        }
    }

    if keys.just_pressed(KeyCode::KeyS)
        && ctrl_pressed(&keys)
        && overlay.controller.is_active()
    {
        let broadcast = shift_pressed(&keys);
        let mut sink = JsonFileSink::new(cli_args.overrides_path.clone());
        match overlay
            .controller
            .save(&mut document.tree, &mut sink, broadcast)
        {
            Ok(()) => info!(
                "saved layout overrides to {}",
                cli_args.overrides_path.display()
            ),
            Err(error) => error!("failed to save layout overrides: {error:#}"),
        }
    }
}

fn handle_pointer_buttons(
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    pointer: Res<PointerInfo>,
    mut document: ResMut<EditorDocument>,
    mut overlay: ResMut<EditorOverlay>,
) {
    if buttons.just_pressed(MouseButton::Left) {
        let additive = shift_pressed(&keys);
        overlay
            .controller
            .pointer_down(&document.tree, pointer.page, additive);
    }
    if buttons.just_released(MouseButton::Left) {
        if let Some(id) = overlay.controller.pointer_up(&mut document.tree) {
            debug!("committed layout edit for '{id}'");
        }
    }
}

fn handle_pointer_motion(
    pointer: Res<PointerInfo>,
    document: Res<EditorDocument>,
    mut overlay: ResMut<EditorOverlay>,
) {
    if overlay.controller.is_dragging() {
        overlay.controller.pointer_move(&document.tree, pointer.page);
    }
}

fn handle_keyboard_adjustment(
    keys: Res<ButtonInput<KeyCode>>,
    mut document: ResMut<EditorDocument>,
    mut overlay: ResMut<EditorOverlay>,
) {
    if !overlay.controller.is_active() {
        return;
    }

    let amount = if shift_pressed(&keys) {
        SHIFT_NUDGE_AMOUNT
    } else {
        NUDGE_AMOUNT
    };
    let mut nudge = (0.0, 0.0);
    if keys.just_pressed(KeyCode::ArrowLeft) {
        nudge.0 -= amount;
    }
    if keys.just_pressed(KeyCode::ArrowRight) {
        nudge.0 += amount;
    }
    if keys.just_pressed(KeyCode::ArrowUp) {
        nudge.1 -= amount;
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        nudge.1 += amount;
    }
    if nudge != (0.0, 0.0) {
        overlay
            .controller
            .nudge_selection(&mut document.tree, nudge.0, nudge.1);
    }

    if keys.just_pressed(KeyCode::Delete)
        || keys.just_pressed(KeyCode::Backspace)
    {
        overlay.controller.reset_selected(&mut document.tree);
    }

    if keys.just_pressed(KeyCode::Escape) {
        if overlay.controller.is_dragging() {
            overlay.controller.abort_drag();
        } else {
            overlay.controller.clear_selection();
        }
    }

    if keys.just_pressed(KeyCode::KeyA) && ctrl_pressed(&keys) {
        overlay.controller.select_all();
    }
}

/// Base rects can shift when the window (and with it the document preview)
/// is resized; re-detect without touching the restoration cache
fn refresh_on_resize(
    mut resize_events: EventReader<WindowResized>,
    mut document: ResMut<EditorDocument>,
    mut overlay: ResMut<EditorOverlay>,
) {
    if resize_events.read().next().is_some() {
        overlay.controller.refresh(&mut document.tree);
    }
}

/// A drag must never survive losing the window
fn abort_drag_on_blur(
    mut focus_events: EventReader<WindowFocused>,
    mut overlay: ResMut<EditorOverlay>,
) {
    for event in focus_events.read() {
        if !event.focused && overlay.controller.is_dragging() {
            warn!("window lost focus mid-drag, aborting the drag");
            overlay.controller.abort_drag();
        }
    }
}
