// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::fmt;

/// Error type shared by every crate in the pipeline.
///
/// Construction-time validation failures are caller bugs and surface
/// immediately; fit non-convergence is *not* an error and is reported as an
/// absent model instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EetError {
    /// Malformed input: mismatched series lengths, empty samples, non-finite
    /// values, out-of-range configuration.
    InvalidInput(String),
    /// A coefficient name outside the five-entry taxonomy.
    UnknownCoefficient(String),
    /// A computation produced no usable number (singular system, degenerate
    /// sample).
    NumericalIssue(String),
}

impl EetError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn unknown_coefficient(name: impl Into<String>) -> Self {
        Self::UnknownCoefficient(name.into())
    }

    pub fn numerical_issue(msg: impl Into<String>) -> Self {
        Self::NumericalIssue(msg.into())
    }
}

impl fmt::Display for EetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::UnknownCoefficient(name) => write!(
                f,
                "unknown model coefficient type {name:?}: expected one of \
                 beta_base, beta_cdd, beta_betc, beta_hdd, beta_beth"
            ),
            Self::NumericalIssue(msg) => write!(f, "numerical issue: {msg}"),
        }
    }
}

impl std::error::Error for EetError {}
