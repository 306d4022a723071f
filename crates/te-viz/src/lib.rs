//! # te-viz
//!
//! Visualization data artifacts for TrigEff.
//!
//! This crate is intentionally dependency-light and focuses on emitting
//! plot-friendly JSON structures (arrays instead of nested objects). All
//! rendering happens outside this repository; these artifacts are the data
//! contract the renderers consume.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Signal spectra artifacts.
pub mod distributions;

/// Efficiency curve artifacts.
pub mod efficiency;

/// Shared artifact metadata.
pub mod meta;

/// Rate curve artifacts.
pub mod rates;

/// Resolution distribution artifacts.
pub mod resolution;

/// Threshold set artifacts.
pub mod thresholds;

pub use distributions::{DistributionSeries, DistributionsArtifact};
pub use efficiency::{EfficiencyArtifact, EfficiencySeries};
pub use meta::{ArtifactInputMeta, ArtifactMeta};
pub use rates::{RateCurveArtifact, RateCurveSeries};
pub use resolution::{ResolutionArtifact, ResolutionSeries};
pub use thresholds::{QuantityThresholds, ThresholdSet, ThresholdsArtifact};
