//! Common data types for TrigEff

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::binning::Binning;

/// Sample role within a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleKind {
    /// Signal sample: efficiency measurement.
    Signal,
    /// Background sample: rate calibration.
    Background,
}

impl SampleKind {
    /// Stable lowercase name, used in cache paths and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleKind::Signal => "signal",
            SampleKind::Background => "background",
        }
    }
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cumulative rate-vs-threshold curve for one configuration.
///
/// `rates[i]` is the scaled rate (Hz) of events whose value is at least the
/// lower edge of bin `i`, so the sequence is non-increasing in `i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateCurve {
    /// Binning the curve was filled with (integer-GeV-equivalent bins).
    pub binning: Binning,
    /// Cumulative scaled rates, length `binning.n_bins`.
    pub rates: Vec<f64>,
    /// Events-to-Hz conversion applied per bin count.
    pub scale: f64,
    /// Number of sample events the curve was built from.
    pub n_events: usize,
}

impl RateCurve {
    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.rates.len()
    }

    /// Cumulative rate at the bin containing `value`, if in range.
    pub fn rate_at(&self, value: f64) -> Option<f64> {
        self.binning.bin_index(value).map(|i| self.rates[i])
    }

    /// Total scaled rate (rate of the full sample).
    pub fn total_rate(&self) -> f64 {
        self.rates.first().copied().unwrap_or(0.0)
    }
}

/// Binned efficiency of a thresholded trigger decision versus the offline
/// reference quantity.
///
/// Bins with no events hold `NaN` efficiency and uncertainty (serialized as
/// `null`); consumers see an explicit gap, never a fabricated zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficiencyCurve {
    /// Offline-reference binning.
    pub binning: Binning,
    /// Threshold applied to the trigger quantity (strict `>` pass).
    pub threshold: f64,
    /// Bin centers of the offline-reference binning.
    pub bin_centers: Vec<f64>,
    /// Fraction of events passing the threshold per bin, in [0, 1] or NaN.
    pub efficiency: Vec<f64>,
    /// Binomial standard error per bin, `sqrt(eff * (1 - eff) / total)`.
    pub uncertainty: Vec<f64>,
    /// Passing event count per bin.
    pub passed: Vec<u64>,
    /// Total event count per bin.
    pub total: Vec<u64>,
}

impl EfficiencyCurve {
    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.efficiency.len()
    }
}
