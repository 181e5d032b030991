//! Visual presentation: cameras and overlay gizmos

pub mod cameras;
pub mod overlay;
