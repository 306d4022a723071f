//! Columnar event table.

use std::collections::BTreeMap;

use te_core::{Error, Result};

/// An in-memory event table: one row per event, columns of `f64`.
///
/// All columns have the same length; undefined physics objects are `NaN`.
/// Tables are built once (load + concatenate) and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct EventTable {
    n_rows: usize,
    columns: BTreeMap<String, Vec<f64>>,
}

impl EventTable {
    /// Build a table from named columns.
    ///
    /// Fails with `InvalidArgument` if column lengths differ.
    pub fn from_columns(columns: BTreeMap<String, Vec<f64>>) -> Result<Self> {
        let n_rows = columns.values().next().map(Vec::len).unwrap_or(0);
        for (name, col) in &columns {
            if col.len() != n_rows {
                return Err(Error::InvalidArgument(format!(
                    "column '{}' has {} rows, expected {}",
                    name,
                    col.len(),
                    n_rows
                )));
            }
        }
        Ok(Self { n_rows, columns })
    }

    /// An empty table carrying the expected column names.
    pub fn empty_with_columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = names.into_iter().map(|n| (n.into(), Vec::new())).collect();
        Self { n_rows: 0, columns }
    }

    /// Number of rows (events).
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Column names in stable (sorted) order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Iterate columns as `(name, data)` in stable (sorted) order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns.iter().map(|(name, col)| (name.as_str(), col.as_slice()))
    }

    /// Borrow a column, failing with `InvalidArgument` naming it if absent.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::InvalidArgument(format!("missing column '{}'", name)))
    }

    /// Whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Concatenate tables in order into one logical table.
    ///
    /// All tables must carry identical column sets (extraction produces
    /// aligned schemas); a mismatch fails with `InvalidArgument`.
    pub fn concat(tables: Vec<EventTable>) -> Result<EventTable> {
        let mut iter = tables.into_iter();
        let Some(mut merged) = iter.next() else {
            return Ok(EventTable { n_rows: 0, columns: BTreeMap::new() });
        };

        for table in iter {
            if !table
                .columns
                .keys()
                .eq(merged.columns.keys())
            {
                return Err(Error::InvalidArgument(
                    "cannot concatenate tables with different column sets".to_string(),
                ));
            }
            for (name, mut col) in table.columns {
                merged
                    .columns
                    .get_mut(&name)
                    .expect("column sets checked equal")
                    .append(&mut col);
            }
            merged.n_rows += table.n_rows;
        }
        Ok(merged)
    }

}
