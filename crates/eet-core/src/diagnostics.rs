// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// Structured diagnostics captured from one regression run.
///
/// Carried on the accepted model so report layers can explain why a shape
/// was (or was not) selected without re-running the fit.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct FitDiagnostics {
    /// Number of billing periods fitted.
    pub n: usize,
    /// Candidate shapes whose profile search converged.
    pub candidates_evaluated: usize,
    /// Candidates discarded by the sign/significance tests.
    pub candidates_rejected: usize,
    /// Refinement iterations spent across all profile searches.
    pub refine_iterations: usize,
    /// Sum of squared residuals of the accepted shape.
    pub sse: f64,
    /// Free-form notes, one per rejected or skipped candidate.
    pub notes: Vec<String>,
    pub engine_version: Option<String>,
}

impl Default for FitDiagnostics {
    fn default() -> Self {
        Self {
            n: 0,
            candidates_evaluated: 0,
            candidates_rejected: 0,
            refine_iterations: 0,
            sse: f64::NAN,
            notes: vec![],
            engine_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }
}
