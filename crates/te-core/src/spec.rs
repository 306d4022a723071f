//! Scan spec records + semantic validation.
//!
//! One structured record per configuration replaces the index-aligned
//! label/source/path arrays of older scripts; the reference configuration is
//! named explicitly instead of being "whichever comes first".

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::binning::Binning;
use crate::error::{Error, Result};

/// Schema version accepted by this tool.
pub const SCHEMA_VERSION: &str = "trigeff_scan_v0";

/// Top-level scan specification.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanSpec {
    /// Must equal [`SCHEMA_VERSION`].
    pub schema_version: String,
    /// Analysis metadata (carried into artifact meta).
    pub analysis: AnalysisMeta,
    /// Label of the configuration whose thresholds define the target rates.
    pub reference: String,
    /// Rate normalization constants.
    #[serde(default)]
    pub rate: RateNormalization,
    /// Binning for rate curves (must be integer-GeV-equivalent width).
    pub rate_binning: Binning,
    /// Table cache root. `None` disables caching.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Physical quantities to scan, each with its own threshold list.
    pub quantities: Vec<QuantitySpec>,
    /// Trigger configurations, reference included.
    pub configurations: Vec<ConfigurationSpec>,
}

/// Analysis metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisMeta {
    /// Analysis name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Constants converting a per-event histogram count into a trigger rate.
///
/// `scale = collision_rate_hz * (live_crossings / total_crossings) / n_events`,
/// recomputed per configuration because `n_events` varies per sample.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateNormalization {
    /// Bunch-crossing frequency of the machine, in Hz.
    #[serde(default = "default_collision_rate_hz")]
    pub collision_rate_hz: f64,
    /// Bunch crossings actually colliding.
    #[serde(default = "default_live_crossings")]
    pub live_crossings: f64,
    /// Total bunch-crossing slots.
    #[serde(default = "default_total_crossings")]
    pub total_crossings: f64,
}

fn default_collision_rate_hz() -> f64 {
    40_000_000.0
}

fn default_live_crossings() -> f64 {
    2452.0
}

fn default_total_crossings() -> f64 {
    3564.0
}

impl Default for RateNormalization {
    fn default() -> Self {
        Self {
            collision_rate_hz: default_collision_rate_hz(),
            live_crossings: default_live_crossings(),
            total_crossings: default_total_crossings(),
        }
    }
}

impl RateNormalization {
    /// Events-to-Hz scale factor for a sample of `n_events` events.
    pub fn scale_for(&self, n_events: usize) -> Result<f64> {
        if n_events == 0 {
            return Err(Error::InvalidArgument(
                "rate scale requires a non-empty sample".to_string(),
            ));
        }
        Ok(self.collision_rate_hz * (self.live_crossings / self.total_crossings)
            / n_events as f64)
    }
}

/// One physical quantity (e.g. MET) with its reference thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct QuantitySpec {
    /// Quantity name; configurations map this to a trigger column.
    pub name: String,
    /// Offline reference column expected in signal tables.
    pub offline_column: String,
    /// Reference-configuration thresholds in physical units, one target
    /// rate derived per entry.
    pub thresholds: Vec<f64>,
    /// Binning of the efficiency curve's offline-reference axis.
    pub efficiency_binning: Binning,
}

/// Where a configuration's sample tables come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Per-event JSON records holding physics-object columns; the provider
    /// extracts the configured columns (missing values become NaN).
    Events,
    /// Pre-extracted columnar table files, loaded as-is.
    Tables,
}

/// Input files for one sample of one configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SampleInputs {
    /// Directory holding the source files.
    pub dir: PathBuf,
    /// Filename pattern with at most one `*` wildcard.
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_pattern() -> String {
    "*.json".to_string()
}

/// One trigger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigurationSpec {
    /// Unique label.
    pub label: String,
    /// Source kind for this configuration's files.
    pub source: SourceKind,
    /// Quantity name -> trigger column carrying that quantity's per-event
    /// value for this configuration (e.g. unpacked vs emulated MET branch).
    pub columns: BTreeMap<String, String>,
    /// Signal sample inputs.
    pub signal: SampleInputs,
    /// Background sample inputs.
    pub background: SampleInputs,
}

impl ConfigurationSpec {
    /// Trigger column for a quantity; `validate` guarantees presence.
    pub fn trigger_column(&self, quantity: &str) -> Result<&str> {
        self.columns.get(quantity).map(String::as_str).ok_or_else(|| {
            Error::ConfigurationMismatch(format!(
                "configuration '{}' has no column for quantity '{}'",
                self.label, quantity
            ))
        })
    }
}

impl ScanSpec {
    /// Semantic validation, run before any computation.
    pub fn validate(&self) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(Error::ConfigurationMismatch(format!(
                "unsupported schema_version '{}' (expected '{}')",
                self.schema_version, SCHEMA_VERSION
            )));
        }

        if self.configurations.is_empty() {
            return Err(Error::ConfigurationMismatch(
                "no configurations defined".to_string(),
            ));
        }
        let mut labels = std::collections::HashSet::new();
        for cfg in &self.configurations {
            if !labels.insert(cfg.label.as_str()) {
                return Err(Error::ConfigurationMismatch(format!(
                    "duplicate configuration label '{}'",
                    cfg.label
                )));
            }
        }
        if !labels.contains(self.reference.as_str()) {
            return Err(Error::ConfigurationMismatch(format!(
                "reference '{}' is not a configured label",
                self.reference
            )));
        }

        self.rate_binning.validate()?;
        if !(self.rate.collision_rate_hz > 0.0
            && self.rate.live_crossings > 0.0
            && self.rate.total_crossings > 0.0)
        {
            return Err(Error::ConfigurationMismatch(
                "rate normalization constants must be positive".to_string(),
            ));
        }

        if self.quantities.is_empty() {
            return Err(Error::ConfigurationMismatch("no quantities defined".to_string()));
        }
        let mut names = std::collections::HashSet::new();
        for q in &self.quantities {
            if !names.insert(q.name.as_str()) {
                return Err(Error::ConfigurationMismatch(format!(
                    "duplicate quantity '{}'",
                    q.name
                )));
            }
            if q.thresholds.is_empty() {
                return Err(Error::ConfigurationMismatch(format!(
                    "quantity '{}' has no thresholds",
                    q.name
                )));
            }
            for &t in &q.thresholds {
                if self.rate_binning.bin_index(t).is_none() {
                    return Err(Error::ConfigurationMismatch(format!(
                        "threshold {} of quantity '{}' is outside the rate binning [{}, {})",
                        t, q.name, self.rate_binning.min, self.rate_binning.max
                    )));
                }
            }
            q.efficiency_binning.validate()?;
            for cfg in &self.configurations {
                cfg.trigger_column(&q.name)?;
            }
        }

        Ok(())
    }

    /// The reference configuration record.
    ///
    /// Only meaningful after `validate`; unknown labels fail there.
    pub fn reference_configuration(&self) -> Result<&ConfigurationSpec> {
        self.configurations
            .iter()
            .find(|c| c.label == self.reference)
            .ok_or_else(|| {
                Error::ConfigurationMismatch(format!(
                    "reference '{}' is not a configured label",
                    self.reference
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_spec() -> ScanSpec {
        let yaml = r#"
schema_version: trigeff_scan_v0
analysis:
  name: met-zs-scan
reference: Default
rate_binning: { min: 0.0, max: 200.0, n_bins: 200 }
quantities:
  - name: met
    offline_column: puppi_met_nomu
    thresholds: [50.0, 90.0]
    efficiency_binning: { min: 0.0, max: 400.0, n_bins: 10 }
configurations:
  - label: Default
    source: events
    columns: { met: l1_met }
    signal: { dir: sig }
    background: { dir: bkg }
  - label: BaselineZS
    source: events
    columns: { met: l1_met_emu }
    signal: { dir: sig_zs }
    background: { dir: bkg_zs }
"#;
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    #[test]
    fn minimal_spec_validates() {
        let spec = minimal_spec();
        spec.validate().unwrap();
        assert_eq!(spec.reference_configuration().unwrap().label, "Default");
        assert_eq!(spec.rate.collision_rate_hz, 40_000_000.0);
        assert_eq!(spec.configurations[0].signal.pattern, "*.json");
    }

    #[test]
    fn rejects_unknown_reference() {
        let mut spec = minimal_spec();
        spec.reference = "NoSuch".to_string();
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains("NoSuch"));
    }

    #[test]
    fn rejects_duplicate_labels() {
        let mut spec = minimal_spec();
        spec.configurations[1].label = "Default".to_string();
        assert!(spec.validate().is_err());
    }

    #[test]
    fn rejects_missing_quantity_column() {
        let mut spec = minimal_spec();
        spec.configurations[1].columns.clear();
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains("BaselineZS"));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let mut spec = minimal_spec();
        spec.quantities[0].thresholds.push(500.0);
        assert!(spec.validate().is_err());
    }

    #[test]
    fn scale_factor_matches_reference_constants() {
        let norm = RateNormalization::default();
        let scale = norm.scale_for(1000).unwrap();
        let expected = 40_000_000.0 * (2452.0 / 3564.0) / 1000.0;
        assert!((scale - expected).abs() < 1e-9);
        assert!(norm.scale_for(0).is_err());
    }
}
