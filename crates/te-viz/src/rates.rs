use serde::{Deserialize, Serialize};

use te_analysis::{ConfigurationRates, QuantityRates, QuantityScan};
use te_core::RateCurve;

use crate::meta::ArtifactMeta;

/// Schema tag for [`RateCurveArtifact`].
pub const RATES_SCHEMA: &str = "trigeff_rates_v0";

/// One configuration's cumulative rate curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateCurveSeries {
    /// Configuration label.
    pub label: String,
    /// Cumulative rates (Hz), aligned with the artifact's bin edges.
    pub rates: Vec<f64>,
    /// Thresholds solved for this configuration (reference thresholds for
    /// the reference configuration), physical units.
    pub thresholds: Vec<f64>,
    /// Events the curve was built from.
    pub n_events: usize,
    /// Events-to-Hz scale applied.
    pub scale: f64,
}

impl RateCurveSeries {
    fn new(label: &str, curve: &RateCurve, thresholds: &[f64]) -> Self {
        Self {
            label: label.to_string(),
            rates: curve.rates.clone(),
            thresholds: thresholds.to_vec(),
            n_events: curve.n_events,
            scale: curve.scale,
        }
    }
}

/// Plot-friendly artifact for the rate-vs-threshold curves of one quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateCurveArtifact {
    /// Schema tag ([`RATES_SCHEMA`]).
    pub schema_version: String,
    /// Tool + provenance metadata.
    pub meta: ArtifactMeta,
    /// Quantity name.
    pub quantity: String,
    /// Reference configuration label.
    pub reference: String,
    /// Target rates (Hz) the thresholds were matched to.
    pub target_rates: Vec<f64>,
    /// Shared bin edges (length = bins + 1).
    pub bin_edges: Vec<f64>,
    /// Per-configuration curves, spec order.
    pub series: Vec<RateCurveSeries>,
}

impl RateCurveArtifact {
    /// Build the artifact from one quantity's rate-stage output.
    pub fn from_rates(scan: &QuantityRates, reference: &str, meta: ArtifactMeta) -> Self {
        let bin_edges = scan
            .configurations
            .first()
            .map(|c: &ConfigurationRates| c.rate_curve.binning.edges())
            .unwrap_or_default();
        let series = scan
            .configurations
            .iter()
            .map(|c| RateCurveSeries::new(&c.label, &c.rate_curve, &c.thresholds))
            .collect();
        Self::assemble(&scan.quantity, reference, &scan.target_rates, bin_edges, series, meta)
    }

    /// Build the artifact from one quantity's full scan output.
    pub fn from_scan(scan: &QuantityScan, reference: &str, meta: ArtifactMeta) -> Self {
        let bin_edges = scan
            .configurations
            .first()
            .map(|c| c.rate_curve.binning.edges())
            .unwrap_or_default();
        let series = scan
            .configurations
            .iter()
            .map(|c| RateCurveSeries::new(&c.label, &c.rate_curve, &c.thresholds))
            .collect();
        Self::assemble(&scan.quantity, reference, &scan.target_rates, bin_edges, series, meta)
    }

    fn assemble(
        quantity: &str,
        reference: &str,
        target_rates: &[f64],
        bin_edges: Vec<f64>,
        series: Vec<RateCurveSeries>,
        meta: ArtifactMeta,
    ) -> Self {
        Self {
            schema_version: RATES_SCHEMA.to_string(),
            meta,
            quantity: quantity.to_string(),
            reference: reference.to_string(),
            target_rates: target_rates.to_vec(),
            bin_edges,
            series,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use te_core::Binning;

    fn rates() -> QuantityRates {
        QuantityRates {
            quantity: "met".to_string(),
            target_rates: vec![120.0],
            configurations: vec![ConfigurationRates {
                label: "Default".to_string(),
                rate_curve: RateCurve {
                    binning: Binning::new(0.0, 4.0, 4).unwrap(),
                    rates: vec![4.0, 3.0, 2.0, 1.0],
                    scale: 1.0,
                    n_events: 4,
                },
                thresholds: vec![2.0],
            }],
        }
    }

    #[test]
    fn artifact_aligns_edges_and_series() {
        let meta = ArtifactMeta::new(None).unwrap();
        let artifact = RateCurveArtifact::from_rates(&rates(), "Default", meta);
        assert_eq!(artifact.schema_version, RATES_SCHEMA);
        assert_eq!(artifact.bin_edges.len(), artifact.series[0].rates.len() + 1);
        assert_eq!(artifact.series[0].thresholds, vec![2.0]);
        assert_eq!(artifact.target_rates, vec![120.0]);
        assert_eq!(artifact.reference, "Default");
    }
}
