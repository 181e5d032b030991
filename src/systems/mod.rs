//! Bevy systems wiring input to the overlay controller

pub mod overlay_input;

pub use overlay_input::OverlayInputPlugin;
