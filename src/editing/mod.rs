//! Layout editing: deltas, dragging, snapping, multi-select operations

pub mod arrange;
pub mod delta;
pub mod drag;
pub mod overlay;
pub mod snap;

pub use overlay::OverlayController;
