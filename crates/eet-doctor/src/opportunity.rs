// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::recommendation::RuleThresholds;
use eet_core::{CoefficientKind, CoefficientSet, UtilityKind};

/// One coefficient's benchmarked inputs for a single building.
///
/// `site` is `None` when the fitted shape has no such term; absence
/// propagates through targets and savings untouched.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoefficientStat {
    pub site: Option<f64>,
    pub median: f64,
    pub robust_std_dev: f64,
}

/// How far past the population the targets are pushed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetLevel {
    Conservative,
    Nominal,
    Aggressive,
}

impl TargetLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Nominal => "nominal",
            Self::Aggressive => "aggressive",
        }
    }

    /// Population anchor the target is pulled toward, in units of the
    /// robust spread away from the median (toward efficiency).
    fn spread_offset(self) -> f64 {
        match self {
            Self::Conservative => 1.0,
            Self::Nominal => 0.0,
            Self::Aggressive => -0.5,
        }
    }
}

/// Efficiency-targeting engine over one building's benchmarked coefficients.
///
/// The pipeline is immutable: `set_targets` returns a [`TargetPlan`] value,
/// and recommendations and savings are derived from the plan. Nothing is
/// mutated across calls, so the three stages cannot be invoked out of order.
#[derive(Clone, Debug, PartialEq)]
pub struct OpportunityEngine {
    stats: CoefficientSet<CoefficientStat>,
    utility: UtilityKind,
    thresholds: RuleThresholds,
}

impl OpportunityEngine {
    /// Builds the engine, normalizing the degenerate no-deadband fit: when
    /// both change-point site values are equal, a zero cooling slope voids
    /// the cooling pair and a zero heating slope voids the heating pair.
    /// An ill-posed split must not produce confident recommendations.
    pub fn new(
        mut stats: CoefficientSet<CoefficientStat>,
        utility: UtilityKind,
        thresholds: RuleThresholds,
    ) -> Self {
        let cooling_knot = stats.get(CoefficientKind::CoolingChangePoint).site;
        let heating_knot = stats.get(CoefficientKind::HeatingChangePoint).site;
        if let (Some(cooling_knot), Some(heating_knot)) = (cooling_knot, heating_knot) {
            if cooling_knot == heating_knot {
                if stats.get(CoefficientKind::CoolingSlope).site == Some(0.0) {
                    stats.get_mut(CoefficientKind::CoolingChangePoint).site = None;
                    stats.get_mut(CoefficientKind::CoolingSlope).site = None;
                }
                if stats.get(CoefficientKind::HeatingSlope).site == Some(0.0) {
                    stats.get_mut(CoefficientKind::HeatingChangePoint).site = None;
                    stats.get_mut(CoefficientKind::HeatingSlope).site = None;
                }
            }
        }
        Self {
            stats,
            utility,
            thresholds,
        }
    }

    pub fn stats(&self) -> &CoefficientSet<CoefficientStat> {
        &self.stats
    }

    pub fn utility(&self) -> UtilityKind {
        self.utility
    }

    /// Computes per-coefficient targets at the chosen aggressiveness level.
    ///
    /// Every axis but the cooling change point is efficient when low, so its
    /// target is the population anchor clamped from above at the site value.
    /// The cooling change point is efficient when high and gets the mirrored
    /// clamp from below. An absent site value yields an absent target.
    pub fn set_targets(&self, level: TargetLevel) -> TargetPlan {
        let offset = level.spread_offset();
        let targets = self.stats.map(|kind, stat| {
            let site = stat.site?;
            let target = if kind == CoefficientKind::CoolingChangePoint {
                (stat.median - offset * stat.robust_std_dev).max(site)
            } else {
                (stat.median + offset * stat.robust_std_dev).min(site)
            };
            Some(target)
        });
        TargetPlan {
            stats: self.stats.clone(),
            targets,
            utility: self.utility,
            thresholds: self.thresholds.clone(),
            level,
        }
    }
}

/// Targets computed at one aggressiveness level, ready for rule evaluation
/// and savings derivation.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetPlan {
    pub(crate) stats: CoefficientSet<CoefficientStat>,
    pub(crate) targets: CoefficientSet<Option<f64>>,
    pub(crate) utility: UtilityKind,
    pub(crate) thresholds: RuleThresholds,
    pub(crate) level: TargetLevel,
}

impl TargetPlan {
    pub fn level(&self) -> TargetLevel {
        self.level
    }

    pub fn site(&self, kind: CoefficientKind) -> Option<f64> {
        self.stats.get(kind).site
    }

    pub fn target(&self, kind: CoefficientKind) -> Option<f64> {
        *self.targets.get(kind)
    }

    pub fn targets(&self) -> &CoefficientSet<Option<f64>> {
        &self.targets
    }

    /// Per-coefficient value to feed a downstream savings estimate: the
    /// better of site and target on each axis, which is the smaller value
    /// everywhere except the cooling change point.
    pub fn savings_coefficients(&self) -> CoefficientSet<Option<f64>> {
        self.stats.map(|kind, stat| {
            let site = stat.site?;
            let target = (*self.targets.get(kind))?;
            Some(if kind == CoefficientKind::CoolingChangePoint {
                site.max(target)
            } else {
                site.min(target)
            })
        })
    }
}
