// Settings ///////////////////////////////////////////////////////////////////
// This module contains all the tuning constants for the app.

// Snapping ///////////////////////////////////////////////////////////////////

/// Distance within which an edge or center snaps to a sibling or the page
pub const SNAP_ALIGN_THRESHOLD: f64 = 6.0;
/// Distance for spacing-equalization snaps (wider: the target is inferred,
/// not a fixed edge)
pub const SNAP_SPACING_THRESHOLD: f64 = 8.0;
/// Guides on the same axis closer than this are collapsed into one
pub const GUIDE_MERGE_DISTANCE: f64 = 0.5;

// Region geometry ////////////////////////////////////////////////////////////

/// A region can never be resized below this width
pub const MIN_REGION_WIDTH: f64 = 8.0;
/// A region can never be resized below this height
pub const MIN_REGION_HEIGHT: f64 = 8.0;
/// Delta components with a magnitude above this are treated as corrupt
pub const MAX_DELTA_MAGNITUDE: f64 = 500.0;

// Nudge Settings /////////////////////////////////////////////////////////////

/// The amount arrow keys move the selection (in page units)
pub const NUDGE_AMOUNT: f64 = 1.0;
/// The amount arrow keys move the selection when shift is held
pub const SHIFT_NUDGE_AMOUNT: f64 = 10.0;

// Hit testing ////////////////////////////////////////////////////////////////

/// Half-extent of a resize handle's hit box (in page units)
pub const HANDLE_HIT_RADIUS: f64 = 6.0;
/// Pointer movement below this never counts as a drag (click-to-select)
pub const DRAG_DEAD_ZONE: f64 = 0.01;
