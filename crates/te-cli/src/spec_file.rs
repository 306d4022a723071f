//! Scan spec reading + input provenance.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use te_core::ScanSpec;

/// Hex-encoded sha256 digest.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    let out = h.finalize();
    let mut s = String::with_capacity(64);
    for b in out {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

fn resolve_dir(base: &Path, dir: &mut PathBuf) {
    if dir.is_relative() {
        *dir = base.join(&*dir);
    }
}

/// Read and validate a scan spec, returning it with the file's sha256.
///
/// JSON by `.json` extension, YAML otherwise. Relative input and cache
/// directories are resolved against the spec file's parent directory, so a
/// spec can live next to its data.
pub fn read_scan_spec(path: &Path) -> Result<(ScanSpec, String)> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read scan spec {}", path.display()))?;
    let digest = sha256_hex(&bytes);

    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
    let mut spec: ScanSpec = if ext == "json" {
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse scan spec {}", path.display()))?
    } else {
        // Default: YAML (serde_yaml_ng).
        serde_yaml_ng::from_slice(&bytes)
            .with_context(|| format!("parse scan spec {}", path.display()))?
    };

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    for cfg in &mut spec.configurations {
        resolve_dir(base, &mut cfg.signal.dir);
        resolve_dir(base, &mut cfg.background.dir);
    }
    if let Some(cache) = spec.cache_dir.as_mut() {
        resolve_dir(base, cache);
    }

    spec.validate().with_context(|| format!("validate scan spec {}", path.display()))?;
    Ok((spec, digest))
}
