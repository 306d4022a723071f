//! Equal-width 1-D binning shared by rate, efficiency, and resolution
//! histograms.
//!
//! Rate curves are binned at one physical unit per bin (integer-GeV
//! equivalent), so all binnings in TrigEff are equal-width and can be
//! described by `(min, max, n_bins)` instead of an explicit edge list.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Equal-width binning over `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binning {
    /// Lower edge of the first bin.
    pub min: f64,
    /// Upper edge of the last bin.
    pub max: f64,
    /// Number of bins.
    pub n_bins: usize,
}

impl Binning {
    /// Create a validated binning.
    pub fn new(min: f64, max: f64, n_bins: usize) -> Result<Self> {
        let b = Self { min, max, n_bins };
        b.validate()?;
        Ok(b)
    }

    /// Validate the binning parameters.
    ///
    /// Deserialized binnings bypass `new`, so consumers re-validate before
    /// filling.
    pub fn validate(&self) -> Result<()> {
        if self.n_bins == 0 {
            return Err(Error::InvalidArgument("n_bins must be positive".to_string()));
        }
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(Error::InvalidArgument(format!(
                "binning range must be finite, got [{}, {}]",
                self.min, self.max
            )));
        }
        if self.max <= self.min {
            return Err(Error::InvalidArgument(format!(
                "binning range is inverted or empty: [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Bin width.
    pub fn width(&self) -> f64 {
        (self.max - self.min) / self.n_bins as f64
    }

    /// Bin index for a value.
    ///
    /// Returns `None` for NaN and for values outside `[min, max)` — out of
    /// range entries are excluded, not folded into the edge bins.
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        if !value.is_finite() || value < self.min || value >= self.max {
            return None;
        }
        let bin = ((value - self.min) / self.width()) as usize;
        // value just below max can land on n_bins through rounding
        Some(bin.min(self.n_bins - 1))
    }

    /// Lower edge of bin `i`.
    pub fn low_edge(&self, i: usize) -> f64 {
        self.min + i as f64 * self.width()
    }

    /// Bin edges (length `n_bins + 1`).
    pub fn edges(&self) -> Vec<f64> {
        (0..=self.n_bins).map(|i| self.low_edge(i)).collect()
    }

    /// Bin centers (length `n_bins`).
    pub fn centers(&self) -> Vec<f64> {
        let half = 0.5 * self.width();
        (0..self.n_bins).map(|i| self.low_edge(i) + half).collect()
    }
}
