//! Signal spectra artifacts (numbers-first).

use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

use te_analysis::fill_counts;
use te_core::{Binning, Result};

use crate::meta::ArtifactMeta;

/// Schema tag for [`DistributionsArtifact`].
pub const DISTRIBUTIONS_SCHEMA: &str = "trigeff_distributions_v0";

/// One histogrammed column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionSeries {
    /// Series name (configuration label or offline column).
    pub name: String,
    /// Bin contents.
    pub y: Vec<f64>,
    /// Downward data error per bin.
    pub yerr_lo: Vec<f64>,
    /// Upward data error per bin.
    pub yerr_hi: Vec<f64>,
    /// Error model used ("garwood_poisson_68" or "sqrt_y_fallback").
    pub error_model: String,
}

/// Plot-friendly artifact for signal quantity spectra.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionsArtifact {
    /// Schema tag ([`DISTRIBUTIONS_SCHEMA`]).
    pub schema_version: String,
    /// Tool + provenance metadata.
    pub meta: ArtifactMeta,
    /// Quantity name.
    pub quantity: String,
    /// Shared bin edges (length = bins + 1).
    pub bin_edges: Vec<f64>,
    /// One series per column.
    pub series: Vec<DistributionSeries>,
}

fn is_near_integer_nonneg(x: f64) -> Option<u64> {
    if !(x.is_finite() && x >= 0.0) {
        return None;
    }
    let r = x.round();
    if (x - r).abs() <= 1e-9 { Some(r as u64) } else { None }
}

fn garwood_68_interval(n: u64) -> (f64, f64) {
    // Central 68.2689% interval -> alpha = 1 - CL
    let alpha = 0.31731_f64;
    // Chi-square quantiles:
    // lo = n - 0.5 * chi2_{alpha/2, 2n}
    // hi = 0.5 * chi2_{1-alpha/2, 2(n+1)} - n
    let lo = if n == 0 {
        0.0
    } else {
        let dist = ChiSquared::new(2.0 * (n as f64)).unwrap();
        let q = dist.inverse_cdf(alpha / 2.0);
        (n as f64) - 0.5 * q
    };
    let dist_hi = ChiSquared::new(2.0 * ((n + 1) as f64)).unwrap();
    let q_hi = dist_hi.inverse_cdf(1.0 - alpha / 2.0);
    let hi = 0.5 * q_hi - (n as f64);
    (lo, hi)
}

fn data_errors(y: &[f64]) -> (Vec<f64>, Vec<f64>, String) {
    let mut lo = Vec::with_capacity(y.len());
    let mut hi = Vec::with_capacity(y.len());

    let mut all_poisson = true;
    for &v in y {
        if let Some(n) = is_near_integer_nonneg(v) {
            let (dl, dh) = garwood_68_interval(n);
            lo.push(dl);
            hi.push(dh);
        } else {
            all_poisson = false;
            let e = if v.is_finite() && v > 0.0 { v.sqrt() } else { f64::NAN };
            lo.push(e);
            hi.push(e);
        }
    }
    let model = if all_poisson { "garwood_poisson_68" } else { "sqrt_y_fallback" };
    (lo, hi, model.to_string())
}

impl DistributionsArtifact {
    /// Histogram named columns over a shared binning.
    pub fn from_columns(
        quantity: &str,
        binning: Binning,
        columns: &[(String, &[f64])],
        meta: ArtifactMeta,
    ) -> Result<Self> {
        let mut series = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            let y = fill_counts(values, binning)?;
            let (yerr_lo, yerr_hi, error_model) = data_errors(&y);
            series.push(DistributionSeries {
                name: name.clone(),
                y,
                yerr_lo,
                yerr_hi,
                error_model,
            });
        }

        Ok(Self {
            schema_version: DISTRIBUTIONS_SCHEMA.to_string(),
            meta,
            quantity: quantity.to_string(),
            bin_edges: binning.edges(),
            series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garwood_interval_for_zero_counts_has_no_downward_error() {
        let (lo, hi) = garwood_68_interval(0);
        assert_eq!(lo, 0.0);
        assert!(hi > 0.0);
    }

    #[test]
    fn garwood_interval_approaches_sqrt_n() {
        let (lo, hi) = garwood_68_interval(400);
        assert!((lo - 20.0).abs() < 1.0, "lo = {}", lo);
        assert!((hi - 20.0).abs() < 1.0, "hi = {}", hi);
    }

    #[test]
    fn counts_use_the_poisson_model() {
        let binning = Binning::new(0.0, 10.0, 2).unwrap();
        let values = vec![1.0, 2.0, 3.0, 7.0];
        let meta = ArtifactMeta::new(None).unwrap();
        let artifact =
            DistributionsArtifact::from_columns("met", binning, &[("sig".to_string(), &values)], meta)
                .unwrap();
        let s = &artifact.series[0];
        assert_eq!(s.y, vec![3.0, 1.0]);
        assert_eq!(s.error_model, "garwood_poisson_68");
        assert_eq!(artifact.bin_edges, vec![0.0, 5.0, 10.0]);
    }
}
