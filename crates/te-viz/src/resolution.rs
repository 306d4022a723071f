//! Trigger-minus-offline resolution artifacts.

use serde::{Deserialize, Serialize};

use te_analysis::resolution_histogram;
use te_core::{Binning, Result};

use crate::meta::ArtifactMeta;

/// Schema tag for [`ResolutionArtifact`].
pub const RESOLUTION_SCHEMA: &str = "trigeff_resolution_v0";

/// One configuration's residual histogram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionSeries {
    /// Configuration label.
    pub label: String,
    /// Residual counts, aligned with the artifact's bin edges.
    pub y: Vec<f64>,
    /// Events entering the histogram (in-range residuals).
    pub entries: f64,
}

/// Plot-friendly artifact for `trigger - offline` residual distributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionArtifact {
    /// Schema tag ([`RESOLUTION_SCHEMA`]).
    pub schema_version: String,
    /// Tool + provenance metadata.
    pub meta: ArtifactMeta,
    /// Quantity name.
    pub quantity: String,
    /// Offline reference column the residual is taken against.
    pub offline_column: String,
    /// Shared bin edges (length = bins + 1).
    pub bin_edges: Vec<f64>,
    /// One series per configuration.
    pub series: Vec<ResolutionSeries>,
}

impl ResolutionArtifact {
    /// Histogram residuals for named (trigger, offline) column pairs over a
    /// shared symmetric binning.
    pub fn from_columns(
        quantity: &str,
        offline_column: &str,
        binning: Binning,
        columns: &[(String, &[f64], &[f64])],
        meta: ArtifactMeta,
    ) -> Result<Self> {
        let mut series = Vec::with_capacity(columns.len());
        for (label, trigger, offline) in columns {
            let y = resolution_histogram(trigger, offline, binning)?;
            let entries = y.iter().sum();
            series.push(ResolutionSeries { label: label.clone(), y, entries });
        }

        Ok(Self {
            schema_version: RESOLUTION_SCHEMA.to_string(),
            meta,
            quantity: quantity.to_string(),
            offline_column: offline_column.to_string(),
            bin_edges: binning.edges(),
            series,
        })
    }
}
