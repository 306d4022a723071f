//! Rate curve construction.
//!
//! A rate curve is a "greater-or-equal-than" survival histogram of a
//! background trigger-quantity column, scaled from event counts to a
//! physical trigger rate in Hz.

use te_core::{Binning, Error, RateCurve, Result};

use crate::hist::fill_counts;

/// Build a cumulative rate curve from a background column.
///
/// Each in-range value fills a forward histogram bin; every count is
/// multiplied by `scale` (events -> Hz, see
/// [`te_core::RateNormalization::scale_for`]); the per-bin contents are then
/// replaced by a right-to-left cumulative sum, so
/// `rates[i] = sum(scaled[j] for j >= i)` — the rate of events with value at
/// least the lower edge of bin `i`. Non-increasing by construction.
///
/// NaN and out-of-range values are excluded (see [`Binning::bin_index`]).
pub fn build_rate_curve(column: &[f64], binning: Binning, scale: f64) -> Result<RateCurve> {
    binning.validate()?;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "rate scale must be finite and positive, got {}",
            scale
        )));
    }

    let mut rates = fill_counts(column, binning)?;
    for count in rates.iter_mut() {
        *count *= scale;
    }

    // Right-to-left cumulative sum turns counts into the survival curve.
    for i in (0..rates.len().saturating_sub(1)).rev() {
        rates[i] += rates[i + 1];
    }

    Ok(RateCurve { binning, rates, scale, n_events: column.len() })
}
