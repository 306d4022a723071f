//! Write-once/read-back table cache.
//!
//! Extracted tables are cached per (configuration label, sample kind) under
//! `<root>/<label>/<sample>.json` so repeated scans skip extraction. The
//! cache is an explicit `load`/`store` interface decoupled from the numeric
//! core; entries are immutable once written (callers bypass `load` to force
//! re-extraction rather than mutating entries in place).

use std::path::{Path, PathBuf};

use te_core::{Result, SampleKind};

use crate::loader::{load_table_file, write_table_file};
use crate::table::EventTable;

/// Filesystem-backed table cache.
#[derive(Debug, Clone)]
pub struct TableCache {
    root: PathBuf,
}

impl TableCache {
    /// Create a cache rooted at `root` (created lazily on first store).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// On-disk location for one entry.
    pub fn entry_path(&self, label: &str, sample: SampleKind) -> PathBuf {
        self.root.join(label).join(format!("{}.json", sample.as_str()))
    }

    /// Load a cached table; `Ok(None)` on miss.
    ///
    /// A present-but-malformed entry is an error, not a miss: silently
    /// re-extracting would hide cache corruption.
    pub fn load(&self, label: &str, sample: SampleKind) -> Result<Option<EventTable>> {
        let path = self.entry_path(label, sample);
        if !path.exists() {
            return Ok(None);
        }
        load_table_file(&path).map(Some)
    }

    /// Store a table, overwriting any previous entry.
    pub fn store(&self, label: &str, sample: SampleKind, table: &EventTable) -> Result<()> {
        let path = self.entry_path(label, sample);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_table_file(&path, table)
    }
}
