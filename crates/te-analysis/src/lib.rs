//! # te-analysis
//!
//! The numeric core of TrigEff: rate curve construction, fixed-rate
//! threshold solving, efficiency curves, resolution histograms, and the
//! scan orchestrator tying them together.
//!
//! Everything here is a pure transformation over in-memory arrays; tables
//! arrive through the [`te_tables::TableProvider`] seam and are released
//! once reduced to curves.

pub mod efficiency;
pub mod hist;
pub mod rate;
pub mod resolution;
pub mod scan;
pub mod threshold;

pub use efficiency::efficiency_curve;
pub use hist::fill_counts;
pub use rate::build_rate_curve;
pub use resolution::resolution_histogram;
pub use scan::{
    ConfigurationRates, ConfigurationScan, QuantityRates, QuantityScan, RateScan, ScanResult,
    run_scan, solve_thresholds,
};
pub use threshold::{threshold_bin_for_rate, threshold_for_rate};
