//! Table provider: the seam between file handling and the numeric core.

use std::collections::BTreeSet;

use te_core::{ConfigurationSpec, Error, Result, SampleKind, ScanSpec, SourceKind};

use crate::cache::TableCache;
use crate::discover::discover_files;
use crate::loader::{load_events_file, load_table_file};
use crate::table::EventTable;

/// Supplies one event table per (configuration label, sample kind).
///
/// The scan orchestrator depends on this trait only, so the numeric core
/// never touches the filesystem; tests substitute an in-memory
/// implementation.
pub trait TableProvider {
    /// Produce the table for a configuration's sample.
    fn table(&mut self, label: &str, sample: SampleKind) -> Result<EventTable>;
}

/// Row counts reported by [`FileTableProvider::extract_all`].
#[derive(Debug, Clone)]
pub struct ExtractionSummary {
    /// Configuration label.
    pub label: String,
    /// Sample kind.
    pub sample: SampleKind,
    /// Rows in the extracted table.
    pub n_rows: usize,
    /// Whether the table came from the cache rather than source files.
    pub from_cache: bool,
}

/// File-backed provider: discovery + extraction + concatenation, with an
/// optional write-once cache consulted before extraction.
pub struct FileTableProvider {
    configurations: Vec<ConfigurationSpec>,
    /// Offline reference columns, required in signal tables.
    offline_columns: Vec<String>,
    cache: Option<TableCache>,
    force: bool,
}

impl FileTableProvider {
    /// Build a provider from a validated scan spec.
    pub fn new(spec: &ScanSpec) -> Self {
        Self {
            configurations: spec.configurations.clone(),
            offline_columns: spec.quantities.iter().map(|q| q.offline_column.clone()).collect(),
            cache: spec.cache_dir.as_ref().map(TableCache::new),
            force: false,
        }
    }

    /// Bypass cache reads and re-extract (entries are rewritten).
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Columns a sample table must carry for a configuration: every
    /// quantity's trigger column, plus the offline reference columns for
    /// signal samples.
    fn required_columns(&self, cfg: &ConfigurationSpec, sample: SampleKind) -> Vec<String> {
        let mut cols: BTreeSet<String> = cfg.columns.values().cloned().collect();
        if sample == SampleKind::Signal {
            cols.extend(self.offline_columns.iter().cloned());
        }
        cols.into_iter().collect()
    }

    fn configuration(&self, label: &str) -> Result<&ConfigurationSpec> {
        self.configurations.iter().find(|c| c.label == label).ok_or_else(|| {
            Error::ConfigurationMismatch(format!("unknown configuration '{}'", label))
        })
    }

    fn extract(&self, cfg: &ConfigurationSpec, sample: SampleKind) -> Result<EventTable> {
        let inputs = match sample {
            SampleKind::Signal => &cfg.signal,
            SampleKind::Background => &cfg.background,
        };
        let required = self.required_columns(cfg, sample);

        let files = discover_files(&inputs.dir, &inputs.pattern)?;
        log::debug!(
            "{}/{}: {} source file(s) under {}",
            cfg.label,
            sample,
            files.len(),
            inputs.dir.display()
        );

        let mut parts = Vec::with_capacity(files.len());
        for path in &files {
            let part = match cfg.source {
                SourceKind::Events => load_events_file(path, &required)?,
                SourceKind::Tables => load_table_file(path)?,
            };
            parts.push(part);
        }

        let table = if parts.is_empty() {
            EventTable::empty_with_columns(required.clone())
        } else {
            EventTable::concat(parts)?
        };

        for col in &required {
            if !table.has_column(col) {
                return Err(Error::InvalidArgument(format!(
                    "missing column '{}' in {} tables of configuration '{}' (available: {})",
                    col,
                    sample,
                    cfg.label,
                    table.column_names().collect::<Vec<_>>().join(", ")
                )));
            }
        }
        Ok(table)
    }

    /// Populate every (configuration, sample) table, returning a summary
    /// per entry. Used by the extraction pre-pass.
    pub fn extract_all(&mut self) -> Result<Vec<ExtractionSummary>> {
        let labels: Vec<String> =
            self.configurations.iter().map(|c| c.label.clone()).collect();
        let mut out = Vec::with_capacity(labels.len() * 2);
        for label in labels {
            for sample in [SampleKind::Background, SampleKind::Signal] {
                let cached = !self.force
                    && self
                        .cache
                        .as_ref()
                        .map(|c| c.entry_path(&label, sample).exists())
                        .unwrap_or(false);
                let table = self.table(&label, sample)?;
                out.push(ExtractionSummary {
                    label: label.clone(),
                    sample,
                    n_rows: table.n_rows(),
                    from_cache: cached,
                });
            }
        }
        Ok(out)
    }
}

impl TableProvider for FileTableProvider {
    fn table(&mut self, label: &str, sample: SampleKind) -> Result<EventTable> {
        let cfg = self.configuration(label)?.clone();

        if !self.force
            && let Some(cache) = &self.cache
            && let Some(table) = cache.load(label, sample)?
        {
            log::debug!("{}/{}: cache hit ({} rows)", label, sample, table.n_rows());
            return Ok(table);
        }

        let table = self.extract(&cfg, sample)?;
        if let Some(cache) = &self.cache {
            cache.store(label, sample, &table)?;
        }
        Ok(table)
    }
}
