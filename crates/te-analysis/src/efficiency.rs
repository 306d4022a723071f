//! Efficiency curve construction.

use te_core::{Binning, EfficiencyCurve, Error, Result};

/// Compute the efficiency of a thresholded trigger decision as a function of
/// the binned offline reference quantity.
///
/// `trigger` and `reference` are paired per event. Events are partitioned by
/// `reference` into `binning`'s equal-width bins; per bin the numerator
/// counts events with `trigger > threshold` (strict) and the denominator all
/// events in the bin. Uncertainty is the binomial standard error
/// `sqrt(eff * (1 - eff) / total)`.
///
/// Empty bins yield NaN efficiency and uncertainty — a documented sentinel,
/// never an error. NaN reference values fall outside every bin; a NaN
/// trigger value never passes the strict comparison. Inputs are not mutated.
pub fn efficiency_curve(
    trigger: &[f64],
    reference: &[f64],
    threshold: f64,
    binning: Binning,
) -> Result<EfficiencyCurve> {
    binning.validate()?;
    if trigger.len() != reference.len() {
        return Err(Error::InvalidArgument(format!(
            "paired arrays differ in length: trigger has {}, reference has {}",
            trigger.len(),
            reference.len()
        )));
    }

    let mut passed = vec![0_u64; binning.n_bins];
    let mut total = vec![0_u64; binning.n_bins];
    for (&t, &r) in trigger.iter().zip(reference.iter()) {
        if let Some(bin) = binning.bin_index(r) {
            total[bin] += 1;
            if t > threshold {
                passed[bin] += 1;
            }
        }
    }

    let mut efficiency = Vec::with_capacity(binning.n_bins);
    let mut uncertainty = Vec::with_capacity(binning.n_bins);
    for bin in 0..binning.n_bins {
        if total[bin] == 0 {
            efficiency.push(f64::NAN);
            uncertainty.push(f64::NAN);
        } else {
            let n = total[bin] as f64;
            let eff = passed[bin] as f64 / n;
            efficiency.push(eff);
            uncertainty.push((eff * (1.0 - eff) / n).sqrt());
        }
    }

    Ok(EfficiencyCurve {
        binning,
        threshold,
        bin_centers: binning.centers(),
        efficiency,
        uncertainty,
        passed,
        total,
    })
}
