//! Plain forward histogram filling.

use te_core::{Binning, Result};

/// Count values per bin of `binning`.
///
/// NaN and out-of-range values are excluded (see [`Binning::bin_index`]).
/// This is the substrate under rate curves, resolution histograms, and the
/// distribution artifacts.
pub fn fill_counts(values: &[f64], binning: Binning) -> Result<Vec<f64>> {
    binning.validate()?;
    let mut counts = vec![0.0_f64; binning.n_bins];
    for &value in values {
        if let Some(bin) = binning.bin_index(value) {
            counts[bin] += 1.0;
        }
    }
    Ok(counts)
}
