//! Command line arguments for the application

use bevy::prelude::*;
use clap::Parser;
use std::path::PathBuf;

/// command line arguments for document and override-record loading
#[derive(Parser, Debug, Resource)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// path to the document description to edit
    #[arg(long = "document", default_value = "assets/documents/sample.json")]
    pub document_path: PathBuf,

    /// path to the persisted layout-override record
    #[arg(
        long = "overrides",
        default_value = "assets/documents/overrides.json"
    )]
    pub overrides_path: PathBuf,

    /// resolve the effective layout, print it, and exit without a window
    #[arg(long = "print-layout", default_value_t = false)]
    pub print_layout: bool,

    /// display debug information
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl CliArgs {
    /// Basic sanity checks before the app spins up
    pub fn validate(&self) -> Result<(), String> {
        if !self.document_path.exists() {
            return Err(format!(
                "document file not found: {}",
                self.document_path.display()
            ));
        }
        Ok(())
    }
}
