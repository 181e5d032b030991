//! Error handling
//!
//! This module provides error handling using anyhow.
//! As an application (not a library), we prioritize ease of use over
//! complex error type hierarchies.

#[allow(unused_imports)]
pub use anyhow::{anyhow, bail, ensure, Error};
use anyhow::{Context, Result};

/// Result type alias for convenience throughout the application
pub type FreeplanResult<T> = Result<T>;

/// Helper functions for creating common error contexts
pub trait FreeplanContext<T> {
    /// Add file operation context to an error
    fn with_file_context<P: AsRef<std::path::Path>>(
        self,
        operation: &str,
        path: P,
    ) -> FreeplanResult<T>;

    /// Add region operation context to an error
    #[allow(dead_code)]
    fn with_region_context(
        self,
        operation: &str,
        region_id: &str,
    ) -> FreeplanResult<T>;
}

impl<T, E> FreeplanContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_file_context<P: AsRef<std::path::Path>>(
        self,
        operation: &str,
        path: P,
    ) -> FreeplanResult<T> {
        self.with_context(|| {
            format!("Failed to {} file: {}", operation, path.as_ref().display())
        })
    }

    fn with_region_context(
        self,
        operation: &str,
        region_id: &str,
    ) -> FreeplanResult<T> {
        self.with_context(|| {
            format!("Failed to {operation} region '{region_id}'")
        })
    }
}
