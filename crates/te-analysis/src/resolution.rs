//! Trigger-vs-offline resolution distributions.

use te_core::{Binning, Error, Result};

use crate::hist::fill_counts;

/// Histogram the per-event residual `trigger - reference` over `binning`
/// (typically a symmetric range around zero).
///
/// Residuals involving NaN fall outside every bin and are excluded, as are
/// out-of-range residuals. Paired-array length mismatch is an
/// `InvalidArgument`.
pub fn resolution_histogram(
    trigger: &[f64],
    reference: &[f64],
    binning: Binning,
) -> Result<Vec<f64>> {
    if trigger.len() != reference.len() {
        return Err(Error::InvalidArgument(format!(
            "paired arrays differ in length: trigger has {}, reference has {}",
            trigger.len(),
            reference.len()
        )));
    }

    let residuals: Vec<f64> =
        trigger.iter().zip(reference.iter()).map(|(&t, &r)| t - r).collect();
    fill_counts(&residuals, binning)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residuals_land_in_expected_bins() {
        let trigger = [50.0, 52.0, 48.0];
        let reference = [50.0, 50.0, 50.0];
        let binning = Binning::new(-10.0, 10.0, 20).unwrap();
        let counts = resolution_histogram(&trigger, &reference, binning).unwrap();
        assert_eq!(counts[10], 1.0); // residual 0
        assert_eq!(counts[12], 1.0); // residual +2
        assert_eq!(counts[8], 1.0); // residual -2
        assert_eq!(counts.iter().sum::<f64>(), 3.0);
    }

    #[test]
    fn nan_residuals_are_excluded() {
        let trigger = [f64::NAN, 1.0];
        let reference = [0.0, f64::NAN];
        let binning = Binning::new(-10.0, 10.0, 20).unwrap();
        let counts = resolution_histogram(&trigger, &reference, binning).unwrap();
        assert_eq!(counts.iter().sum::<f64>(), 0.0);
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let binning = Binning::new(-10.0, 10.0, 20).unwrap();
        assert!(resolution_histogram(&[1.0], &[], binning).is_err());
    }
}
