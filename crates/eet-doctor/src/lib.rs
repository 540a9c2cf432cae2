// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod opportunity;
pub mod recommendation;

pub use opportunity::{CoefficientStat, OpportunityEngine, TargetLevel, TargetPlan};
pub use recommendation::{Measure, RecommendationSet, RuleThresholds};

/// Targeting engine namespace placeholder.
pub fn crate_name() -> &'static str {
    let _ = eet_core::crate_name();
    "eet-doctor"
}
