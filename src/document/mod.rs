//! The rendered-document abstraction the engine edits

pub mod loader;
pub mod persistence;
pub mod probe;
pub mod registry;
pub mod view_tree;
