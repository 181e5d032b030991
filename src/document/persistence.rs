//! Override record persistence
//!
//! The persisted layout-override record is an opaque attribute of the
//! owning document: a JSON object mapping region ids to deltas. The engine
//! reads it tolerantly (corrupt components degrade to zero) and on save
//! hands a merged record to an [`OverrideSink`] collaborator. Save failures
//! are the sink's business; the engine keeps its local edits so the user
//! can retry.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::errors::{FreeplanContext, FreeplanResult};
use crate::editing::delta::OverrideRecord;

/// External persistence collaborator the overlay flushes to on save.
///
/// `broadcast` asks the collaborator to also apply the record to sibling
/// documents of the same category; the geometry engine carries the flag
/// through without interpreting it.
pub trait OverrideSink {
    fn flush(
        &mut self,
        record: &OverrideRecord,
        broadcast: bool,
    ) -> FreeplanResult<()>;
}

/// Load a persisted record from disk; a missing file is an empty record
pub fn load_record<P: AsRef<Path>>(path: P) -> FreeplanResult<OverrideRecord> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(OverrideRecord::new());
    }
    let raw = fs::read_to_string(path).with_file_context("read", path)?;
    let record: OverrideRecord =
        serde_json::from_str(&raw).with_file_context("parse", path)?;
    Ok(record)
}

/// Sink that merges flushed records into a JSON blob on disk
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl OverrideSink for JsonFileSink {
    fn flush(
        &mut self,
        record: &OverrideRecord,
        _broadcast: bool,
    ) -> FreeplanResult<()> {
        // Merge with whatever existed before: untouched regions keep their
        // stored deltas.
        let mut merged = load_record(&self.path)?;
        for (id, delta) in record {
            merged.insert(id.clone(), *delta);
        }
        let raw = serde_json::to_string_pretty(&merged)
            .with_file_context("serialize", &self.path)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_file_context("create directory for", &self.path)?;
            }
        }
        fs::write(&self.path, raw).with_file_context("write", &self.path)?;
        Ok(())
    }
}

/// In-memory sink for tests and the headless path
#[derive(Default)]
pub struct MemorySink {
    pub record: OverrideRecord,
    pub flush_count: usize,
    pub last_broadcast: bool,
    /// When set, the next flush fails (save-failure scenarios)
    pub fail_next: bool,
}

impl OverrideSink for MemorySink {
    fn flush(
        &mut self,
        record: &OverrideRecord,
        broadcast: bool,
    ) -> FreeplanResult<()> {
        if self.fail_next {
            self.fail_next = false;
            anyhow::bail!("simulated sink failure");
        }
        for (id, delta) in record {
            self.record.insert(id.clone(), *delta);
        }
        self.flush_count += 1;
        self.last_broadcast = broadcast;
        Ok(())
    }
}
