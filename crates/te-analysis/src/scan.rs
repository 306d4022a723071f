//! Fixed-rate scan orchestration.
//!
//! The reference configuration's rate curve fixes one target rate per
//! reference threshold; every other configuration then gets the thresholds
//! that reproduce those rates on its own curve, and every (configuration,
//! threshold) pair gets an efficiency curve from the configuration's signal
//! table. Tables are obtained through [`TableProvider`], reduced to curves,
//! and released.

use rayon::prelude::*;

use te_core::{
    ConfigurationSpec, EfficiencyCurve, Error, RateCurve, Result, SampleKind, ScanSpec,
};
use te_tables::{EventTable, TableProvider};

use crate::efficiency::efficiency_curve;
use crate::rate::build_rate_curve;
use crate::threshold::threshold_for_rate;

/// Rate curve and matched thresholds for one configuration under one
/// quantity.
#[derive(Debug, Clone)]
pub struct ConfigurationRates {
    /// Configuration label.
    pub label: String,
    /// Background rate curve.
    pub rate_curve: RateCurve,
    /// Thresholds in physical units: the reference thresholds themselves for
    /// the reference configuration, rate-matched thresholds otherwise. Same
    /// length and order as the target rates.
    pub thresholds: Vec<f64>,
}

/// Threshold-solving output for one quantity across all configurations.
#[derive(Debug, Clone)]
pub struct QuantityRates {
    /// Quantity name.
    pub quantity: String,
    /// Target rates read off the reference curve at the reference
    /// thresholds, in threshold order.
    pub target_rates: Vec<f64>,
    /// Per-configuration results, in spec order.
    pub configurations: Vec<ConfigurationRates>,
}

/// Result of the rate stage: curves, targets, and matched threshold sets.
#[derive(Debug, Clone)]
pub struct RateScan {
    /// Reference configuration label.
    pub reference: String,
    /// Per-quantity results, in spec order.
    pub quantities: Vec<QuantityRates>,
}

/// Scan output for one configuration under one quantity.
#[derive(Debug, Clone)]
pub struct ConfigurationScan {
    /// Configuration label.
    pub label: String,
    /// Background rate curve.
    pub rate_curve: RateCurve,
    /// Thresholds, as in [`ConfigurationRates::thresholds`].
    pub thresholds: Vec<f64>,
    /// One efficiency curve per threshold, signal table vs offline
    /// reference.
    pub efficiencies: Vec<EfficiencyCurve>,
}

/// Full scan output for one quantity across all configurations.
#[derive(Debug, Clone)]
pub struct QuantityScan {
    /// Quantity name.
    pub quantity: String,
    /// Target rates, as in [`QuantityRates::target_rates`].
    pub target_rates: Vec<f64>,
    /// Per-configuration results, in spec order.
    pub configurations: Vec<ConfigurationScan>,
}

/// Full fixed-rate scan result.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Reference configuration label.
    pub reference: String,
    /// Per-quantity results, in spec order.
    pub quantities: Vec<QuantityScan>,
}

impl ScanResult {
    /// Rate-stage view of a full scan (curves + thresholds, no
    /// efficiencies).
    pub fn rate_scan(&self) -> RateScan {
        RateScan {
            reference: self.reference.clone(),
            quantities: self
                .quantities
                .iter()
                .map(|q| QuantityRates {
                    quantity: q.quantity.clone(),
                    target_rates: q.target_rates.clone(),
                    configurations: q
                        .configurations
                        .iter()
                        .map(|c| ConfigurationRates {
                            label: c.label.clone(),
                            rate_curve: c.rate_curve.clone(),
                            thresholds: c.thresholds.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

fn non_empty(table: EventTable, cfg: &ConfigurationSpec, sample: SampleKind) -> Result<EventTable> {
    if table.is_empty() {
        return Err(Error::EmptySample {
            label: cfg.label.clone(),
            sample: sample.as_str().to_string(),
        });
    }
    Ok(table)
}

/// One rate curve per quantity from a configuration's background table.
fn background_rate_curves(
    spec: &ScanSpec,
    cfg: &ConfigurationSpec,
    provider: &mut dyn TableProvider,
) -> Result<Vec<RateCurve>> {
    let table = non_empty(
        provider.table(&cfg.label, SampleKind::Background)?,
        cfg,
        SampleKind::Background,
    )?;
    let scale = spec.rate.scale_for(table.n_rows())?;

    let mut curves = Vec::with_capacity(spec.quantities.len());
    for q in &spec.quantities {
        let column = table.column(cfg.trigger_column(&q.name)?)?;
        curves.push(build_rate_curve(column, spec.rate_binning, scale)?);
    }
    Ok(curves)
}

/// Run the rate stage: build every configuration's rate curves and solve the
/// fixed-rate threshold sets against the reference configuration's targets.
///
/// The spec is re-validated first; configuration inconsistencies and empty
/// background samples surface before any curve is reported.
pub fn solve_thresholds(spec: &ScanSpec, provider: &mut dyn TableProvider) -> Result<RateScan> {
    spec.validate()?;
    let reference_cfg = spec.reference_configuration()?;

    // The reference curves fix the target rates; this is a strict sequential
    // dependency of everything below.
    let reference_curves = background_rate_curves(spec, reference_cfg, provider)?;
    let mut target_rates: Vec<Vec<f64>> = Vec::with_capacity(spec.quantities.len());
    for (q, curve) in spec.quantities.iter().zip(&reference_curves) {
        let rates = q
            .thresholds
            .iter()
            .map(|&thr| {
                curve.rate_at(thr).ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "reference threshold {} of quantity '{}' outside the rate binning",
                        thr, q.name
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        log::info!(
            "quantity '{}': target rates {:?} Hz at reference thresholds {:?}",
            q.name,
            rates,
            q.thresholds
        );
        target_rates.push(rates);
    }

    // Per-configuration curves and matched thresholds, spec order. The
    // reference keeps its own thresholds by definition.
    let mut per_config: Vec<(String, Vec<RateCurve>, Vec<Vec<f64>>)> =
        Vec::with_capacity(spec.configurations.len());
    for cfg in &spec.configurations {
        let curves = if cfg.label == spec.reference {
            reference_curves.clone()
        } else {
            background_rate_curves(spec, cfg, provider)?
        };

        let thresholds: Vec<Vec<f64>> = spec
            .quantities
            .iter()
            .enumerate()
            .map(|(qi, q)| {
                if cfg.label == spec.reference {
                    q.thresholds.clone()
                } else {
                    target_rates[qi]
                        .iter()
                        .map(|&rate| threshold_for_rate(&curves[qi], rate))
                        .collect()
                }
            })
            .collect();
        for (q, thr) in spec.quantities.iter().zip(&thresholds) {
            log::debug!("{} / '{}': thresholds {:?}", cfg.label, q.name, thr);
        }
        per_config.push((cfg.label.clone(), curves, thresholds));
    }

    let quantities = spec
        .quantities
        .iter()
        .enumerate()
        .map(|(qi, q)| QuantityRates {
            quantity: q.name.clone(),
            target_rates: target_rates[qi].clone(),
            configurations: per_config
                .iter()
                .map(|(label, curves, thresholds)| ConfigurationRates {
                    label: label.clone(),
                    rate_curve: curves[qi].clone(),
                    thresholds: thresholds[qi].clone(),
                })
                .collect(),
        })
        .collect();

    Ok(RateScan { reference: spec.reference.clone(), quantities })
}

/// Run the full fixed-rate scan: thresholds plus efficiency curves from
/// every configuration's signal table.
pub fn run_scan(spec: &ScanSpec, provider: &mut dyn TableProvider) -> Result<ScanResult> {
    let rate_scan = solve_thresholds(spec, provider)?;

    // Efficiency curves per configuration. Independent across
    // (configuration, threshold) once the targets are fixed.
    let mut efficiencies: Vec<Vec<Vec<EfficiencyCurve>>> =
        Vec::with_capacity(spec.configurations.len());
    for (ci, cfg) in spec.configurations.iter().enumerate() {
        let table =
            non_empty(provider.table(&cfg.label, SampleKind::Signal)?, cfg, SampleKind::Signal)?;

        let mut per_quantity = Vec::with_capacity(spec.quantities.len());
        for (qi, q) in spec.quantities.iter().enumerate() {
            let trigger = table.column(cfg.trigger_column(&q.name)?)?;
            let offline = table.column(&q.offline_column)?;
            let thresholds = &rate_scan.quantities[qi].configurations[ci].thresholds;
            let curves: Vec<EfficiencyCurve> = thresholds
                .par_iter()
                .map(|&thr| efficiency_curve(trigger, offline, thr, q.efficiency_binning))
                .collect::<Result<Vec<_>>>()?;
            per_quantity.push(curves);
        }
        efficiencies.push(per_quantity);
    }

    let quantities = rate_scan
        .quantities
        .into_iter()
        .enumerate()
        .map(|(qi, q)| QuantityScan {
            quantity: q.quantity,
            target_rates: q.target_rates,
            configurations: q
                .configurations
                .into_iter()
                .enumerate()
                .map(|(ci, c)| ConfigurationScan {
                    label: c.label,
                    rate_curve: c.rate_curve,
                    thresholds: c.thresholds,
                    efficiencies: efficiencies[ci][qi].clone(),
                })
                .collect(),
        })
        .collect();

    Ok(ScanResult { reference: rate_scan.reference, quantities })
}
