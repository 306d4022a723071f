//! # te-core
//!
//! Core types for TrigEff: errors, binning, curve types, and the scan spec.
//!
//! Everything here is plain data shared between the table provider
//! (`te-tables`), the numeric core (`te-analysis`), and the artifact layer
//! (`te-viz`); no I/O happens in this crate beyond serde derives.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Equal-width binning.
pub mod binning;

/// Error type and result alias.
pub mod error;

/// Scan specification records and validation.
pub mod spec;

/// Curve and sample types.
pub mod types;

pub use binning::Binning;
pub use error::{Error, Result};
pub use spec::{ConfigurationSpec, QuantitySpec, RateNormalization, ScanSpec, SourceKind};
pub use types::{EfficiencyCurve, RateCurve, SampleKind};

/// Workspace version reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
