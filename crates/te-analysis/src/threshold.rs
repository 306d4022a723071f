//! Fixed-rate threshold solving: inverse lookup on a rate curve.

use te_core::RateCurve;

/// Bin index at which a rate curve crosses `target`.
///
/// Returns the largest bin index whose cumulative rate is still at least
/// `target` — the inverse of the non-increasing step function. On a flat
/// region (e.g. zero background over a range of bins) every tied bin
/// matches and the largest index wins; this is the documented tie-break.
///
/// Boundary behavior, by definition rather than error:
/// - `target` above the curve maximum: bin 0 (threshold at range start);
/// - `target` at or below the curve minimum: the last bin (saturation).
pub fn threshold_bin_for_rate(rates: &[f64], target: f64) -> usize {
    for i in (0..rates.len()).rev() {
        if rates[i] >= target {
            return i;
        }
    }
    0
}

/// Physical threshold value (bin lower edge) matching `target` on `curve`.
pub fn threshold_for_rate(curve: &RateCurve, target: f64) -> f64 {
    let bin = threshold_bin_for_rate(&curve.rates, target);
    curve.binning.low_edge(bin)
}
