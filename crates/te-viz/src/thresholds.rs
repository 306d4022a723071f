//! Solved fixed-rate threshold sets.

use serde::{Deserialize, Serialize};

use te_analysis::RateScan;

use crate::meta::ArtifactMeta;

/// Schema tag for [`ThresholdsArtifact`].
pub const THRESHOLDS_SCHEMA: &str = "trigeff_thresholds_v0";

/// One configuration's matched threshold set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// Configuration label.
    pub label: String,
    /// Thresholds in physical units, aligned with the quantity's target
    /// rates.
    pub thresholds: Vec<f64>,
}

/// Threshold sets for one quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantityThresholds {
    /// Quantity name.
    pub quantity: String,
    /// Target rates (Hz) derived from the reference configuration.
    pub target_rates: Vec<f64>,
    /// Per-configuration sets, spec order.
    pub sets: Vec<ThresholdSet>,
}

/// Artifact collecting every solved threshold set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdsArtifact {
    /// Schema tag ([`THRESHOLDS_SCHEMA`]).
    pub schema_version: String,
    /// Tool + provenance metadata.
    pub meta: ArtifactMeta,
    /// Reference configuration label.
    pub reference: String,
    /// Per-quantity threshold sets, spec order.
    pub quantities: Vec<QuantityThresholds>,
}

impl ThresholdsArtifact {
    /// Build the artifact from a rate-stage result.
    pub fn from_rates(scan: &RateScan, meta: ArtifactMeta) -> Self {
        let quantities = scan
            .quantities
            .iter()
            .map(|q| QuantityThresholds {
                quantity: q.quantity.clone(),
                target_rates: q.target_rates.clone(),
                sets: q
                    .configurations
                    .iter()
                    .map(|c| ThresholdSet {
                        label: c.label.clone(),
                        thresholds: c.thresholds.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            schema_version: THRESHOLDS_SCHEMA.to_string(),
            meta,
            reference: scan.reference.clone(),
            quantities,
        }
    }
}
