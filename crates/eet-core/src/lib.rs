// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod coefficient;
pub mod diagnostics;
pub mod error;
pub mod series;
pub mod stats;

pub use coefficient::{CoefficientKind, CoefficientSet, UtilityKind};
pub use diagnostics::FitDiagnostics;
pub use error::EetError;
pub use series::EnergySignature;
pub use stats::{mean, median, median_absolute_deviation, percentile};

/// Core shared types namespace placeholder.
pub fn crate_name() -> &'static str {
    "eet-core"
}
