//! Freeplan: a free-form layout override editor.
//!
//! Lets a user nudge, resize, align, and distribute the named regions of a
//! rendered document, with live snapping and keyboard adjustment. Edits are
//! stored as per-region deltas from the base layout, so a re-rendered
//! document keeps its overrides.

pub mod core;
pub mod document;
pub mod editing;
pub mod rendering;
pub mod systems;
pub mod utils;

pub use crate::core::errors::{FreeplanContext, FreeplanResult};
pub use crate::editing::OverlayController;
