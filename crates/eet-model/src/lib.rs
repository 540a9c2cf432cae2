// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod least_squares;
pub mod regression;
pub mod search;
pub mod shape;

pub use regression::{ChangePointRegression, FitConfig, FittedModel};
pub use shape::{piecewise_response, ModelKind};

/// Regression engine namespace placeholder.
pub fn crate_name() -> &'static str {
    let _ = eet_core::crate_name();
    "eet-model"
}
