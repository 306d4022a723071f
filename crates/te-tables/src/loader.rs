//! Reading source files into event tables.
//!
//! Two on-disk layouts are supported:
//!
//! - **event files**: `{"events": [{"l1_met": 42.5, ...}, ...]}` — one JSON
//!   object per event mapping physics-object columns to values. Extraction
//!   selects the requested columns; missing or non-numeric values become NaN.
//! - **table files**: `{"columns": {"l1_met": [42.5, null, ...], ...}}` —
//!   pre-extracted columnar data. `null` entries decode to NaN. This is also
//!   the cache format written back by [`crate::cache::TableCache`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use te_core::{Error, Result};

use crate::table::EventTable;

#[derive(Serialize, Deserialize)]
struct TableFile {
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

#[derive(Deserialize)]
struct EventsFile {
    events: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Load a pre-extracted columnar table file.
pub fn load_table_file(path: &Path) -> Result<EventTable> {
    let bytes = std::fs::read(path)?;
    let file: TableFile = serde_json::from_slice(&bytes).map_err(|e| {
        Error::InvalidArgument(format!("malformed table file {}: {}", path.display(), e))
    })?;

    let columns = file
        .columns
        .into_iter()
        .map(|(name, col)| {
            (name, col.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        })
        .collect();
    EventTable::from_columns(columns)
        .map_err(|e| Error::InvalidArgument(format!("{}: {}", path.display(), e)))
}

/// Load an event-record file, extracting `columns` (missing values -> NaN).
pub fn load_events_file(path: &Path, columns: &[String]) -> Result<EventTable> {
    let bytes = std::fs::read(path)?;
    let file: EventsFile = serde_json::from_slice(&bytes).map_err(|e| {
        Error::InvalidArgument(format!("malformed events file {}: {}", path.display(), e))
    })?;

    let mut out: BTreeMap<String, Vec<f64>> = columns
        .iter()
        .map(|name| (name.clone(), Vec::with_capacity(file.events.len())))
        .collect();

    for event in &file.events {
        for (name, col) in out.iter_mut() {
            let value = event.get(name).and_then(serde_json::Value::as_f64);
            col.push(value.unwrap_or(f64::NAN));
        }
    }

    EventTable::from_columns(out)
}

/// Serialize a table to the columnar on-disk layout.
///
/// Non-finite values are written as `null` (JSON has no NaN literal), which
/// `load_table_file` decodes back to NaN.
pub fn write_table_file(path: &Path, table: &EventTable) -> Result<()> {
    let columns = table
        .columns()
        .map(|(name, col)| {
            let wire = col.iter().map(|&v| v.is_finite().then_some(v)).collect();
            (name.to_string(), wire)
        })
        .collect();
    let file = TableFile { columns };
    std::fs::write(path, serde_json::to_vec(&file)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn tmp_file(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        p.push(format!("te-tables-{}-{}-{}.json", name, std::process::id(), nanos));
        p
    }

    #[test]
    fn events_extraction_fills_missing_with_nan() {
        let path = tmp_file("events");
        std::fs::write(
            &path,
            r#"{"events": [
                {"l1_met": 40.0, "puppi_met_nomu": 55.0},
                {"l1_met": 12.5},
                {"puppi_met_nomu": 30.0, "unrelated": 1.0}
            ]}"#,
        )
        .unwrap();

        let cols = vec!["l1_met".to_string(), "puppi_met_nomu".to_string()];
        let t = load_events_file(&path, &cols).unwrap();
        assert_eq!(t.n_rows(), 3);
        let met = t.column("l1_met").unwrap();
        assert_eq!(met[0], 40.0);
        assert!(met[2].is_nan());
        let offline = t.column("puppi_met_nomu").unwrap();
        assert!(offline[1].is_nan());
        assert!(!t.has_column("unrelated"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn table_file_round_trip_preserves_nan_as_null() {
        let path = tmp_file("table");
        let mut cols = BTreeMap::new();
        cols.insert("l1_met".to_string(), vec![10.0, f64::NAN, 30.0]);
        let table = EventTable::from_columns(cols).unwrap();

        write_table_file(&path, &table).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("null"));

        let back = load_table_file(&path).unwrap();
        let col = back.column("l1_met").unwrap();
        assert_eq!(col[0], 10.0);
        assert!(col[1].is_nan());
        assert_eq!(col[2], 30.0);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_names_the_path() {
        let path = tmp_file("bad");
        std::fs::write(&path, "not json").unwrap();
        let err = load_table_file(&path).unwrap_err();
        assert!(err.to_string().contains(path.file_name().unwrap().to_str().unwrap()));
        let _ = std::fs::remove_file(&path);
    }
}
