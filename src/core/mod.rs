//! Application core: construction, configuration, shared state

pub mod app;
pub mod cli;
pub mod errors;
pub mod pointer;
pub mod settings;
pub mod state;
