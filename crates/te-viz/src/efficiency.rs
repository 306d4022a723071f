use serde::{Deserialize, Serialize};

use te_analysis::QuantityScan;

use crate::meta::ArtifactMeta;

/// Schema tag for [`EfficiencyArtifact`].
pub const EFFICIENCY_SCHEMA: &str = "trigeff_efficiency_v0";

/// One (configuration, threshold) efficiency curve.
///
/// Empty offline-reference bins carry NaN efficiency/uncertainty, which
/// serializes as JSON `null` — renderers should leave those points out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficiencySeries {
    /// Configuration label.
    pub label: String,
    /// Threshold applied to the trigger quantity.
    pub threshold: f64,
    /// Offline-reference bin centers.
    pub bin_centers: Vec<f64>,
    /// Efficiency per bin, [0, 1] or null.
    pub efficiency: Vec<f64>,
    /// Binomial standard error per bin, or null.
    pub uncertainty: Vec<f64>,
    /// Passing counts per bin.
    pub passed: Vec<u64>,
    /// Total counts per bin.
    pub total: Vec<u64>,
}

/// Plot-friendly artifact for the efficiency curves of one quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficiencyArtifact {
    /// Schema tag ([`EFFICIENCY_SCHEMA`]).
    pub schema_version: String,
    /// Tool + provenance metadata.
    pub meta: ArtifactMeta,
    /// Quantity name.
    pub quantity: String,
    /// Offline reference column the curves are binned in (x-axis label).
    pub offline_column: String,
    /// One series per (configuration, threshold), spec order then
    /// threshold order.
    pub series: Vec<EfficiencySeries>,
}

impl EfficiencyArtifact {
    /// Build the artifact from one quantity's scan output.
    pub fn from_scan(scan: &QuantityScan, offline_column: &str, meta: ArtifactMeta) -> Self {
        let mut series = Vec::new();
        for cfg in &scan.configurations {
            for curve in &cfg.efficiencies {
                series.push(EfficiencySeries {
                    label: cfg.label.clone(),
                    threshold: curve.threshold,
                    bin_centers: curve.bin_centers.clone(),
                    efficiency: curve.efficiency.clone(),
                    uncertainty: curve.uncertainty.clone(),
                    passed: curve.passed.clone(),
                    total: curve.total.clone(),
                });
            }
        }

        Self {
            schema_version: EFFICIENCY_SCHEMA.to_string(),
            meta,
            quantity: scan.quantity.clone(),
            offline_column: offline_column.to_string(),
            series,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use te_analysis::ConfigurationScan;
    use te_core::{Binning, EfficiencyCurve, RateCurve};

    #[test]
    fn one_series_per_configuration_threshold_pair() {
        let binning = Binning::new(0.0, 40.0, 4).unwrap();
        let curve = |threshold: f64| EfficiencyCurve {
            binning,
            threshold,
            bin_centers: binning.centers(),
            efficiency: vec![0.0, 0.5, 1.0, f64::NAN],
            uncertainty: vec![0.0, 0.25, 0.0, f64::NAN],
            passed: vec![0, 1, 2, 0],
            total: vec![2, 2, 2, 0],
        };
        let scan = QuantityScan {
            quantity: "met".to_string(),
            target_rates: vec![10.0, 5.0],
            configurations: vec![ConfigurationScan {
                label: "Default".to_string(),
                rate_curve: RateCurve {
                    binning,
                    rates: vec![1.0, 1.0, 1.0, 1.0],
                    scale: 1.0,
                    n_events: 4,
                },
                thresholds: vec![50.0, 90.0],
                efficiencies: vec![curve(50.0), curve(90.0)],
            }],
        };

        let meta = ArtifactMeta::new(None).unwrap();
        let artifact = EfficiencyArtifact::from_scan(&scan, "puppi_met_nomu", meta);
        assert_eq!(artifact.series.len(), 2);
        assert_eq!(artifact.series[1].threshold, 90.0);

        // NaN bins serialize to null so renderers can skip them.
        let json = serde_json::to_value(&artifact).unwrap();
        let eff = &json["series"][0]["efficiency"];
        assert!(eff[3].is_null());
        assert_eq!(eff[2], 1.0);
    }
}
