//! Source file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use te_core::{Error, Result};

/// List the files in `dir` whose names match `pattern`, sorted.
///
/// `pattern` is a filename glob with at most one `*` wildcard
/// (e.g. `nano_1*.json`); without a `*` it is an exact name. Discovery is
/// non-recursive; directories and symlinks are skipped. Sorting keeps the
/// concatenation order deterministic across runs.
pub fn discover_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let (prefix, suffix) = split_pattern(pattern)?;

    let rd = fs::read_dir(dir).map_err(|e| {
        Error::InvalidArgument(format!("cannot read input directory {}: {}", dir.display(), e))
    })?;

    let mut out = Vec::new();
    for entry in rd {
        let entry = entry?;
        let ft = entry.file_type()?;
        if ft.is_symlink() || ft.is_dir() {
            continue;
        }
        let path = entry.path();
        if let Some(name) = path.file_name().and_then(|s| s.to_str())
            && matches(name, prefix, suffix)
        {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

fn split_pattern(pattern: &str) -> Result<(&str, Option<&str>)> {
    let mut parts = pattern.split('*');
    let prefix = parts.next().unwrap_or("");
    let suffix = parts.next();
    if parts.next().is_some() {
        return Err(Error::InvalidArgument(format!(
            "pattern '{}' has more than one '*'",
            pattern
        )));
    }
    Ok((prefix, suffix))
}

fn matches(name: &str, prefix: &str, suffix: Option<&str>) -> bool {
    match suffix {
        // No wildcard: exact name.
        None => name == prefix,
        Some(suffix) => {
            name.len() >= prefix.len() + suffix.len()
                && name.starts_with(prefix)
                && name.ends_with(suffix)
        }
    }
}
