// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::opportunity::TargetPlan;
use eet_core::{CoefficientKind, UtilityKind};

/// Relative gap thresholds per recommendation rule, plus the near-zero
/// override reproducing the deployed short-circuit behavior.
///
/// With `override_value` set (the default), every relative rule uses that
/// value instead of its production threshold, so any positive gap triggers.
/// Set it to `None` to evaluate the documented per-rule percentages.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct RuleThresholds {
    pub cooling_setpoint: f64,
    pub heating_setpoint: f64,
    pub schedules_baseload: f64,
    /// Slope-gap term shared by the envelope rules (ventilation,
    /// infiltration, insulation, windows).
    pub envelope_slope: f64,
    /// Change-point-gap term of the envelope rules.
    pub envelope_change_point: f64,
    /// Absolute heating-slope cut separating real electric resistance
    /// heating from fit noise.
    pub electric_heating_slope: f64,
    pub lighting_baseload: f64,
    pub economizer: f64,
    pub cooling_efficiency: f64,
    pub heating_efficiency: f64,
    pub fossil_baseload: f64,
    pub override_value: Option<f64>,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            cooling_setpoint: 0.2,
            heating_setpoint: 0.2,
            schedules_baseload: 0.001,
            envelope_slope: 0.1,
            envelope_change_point: 0.2,
            electric_heating_slope: 0.01,
            lighting_baseload: 0.001,
            economizer: 0.2,
            cooling_efficiency: 0.1,
            heating_efficiency: 0.1,
            fossil_baseload: 0.001,
            override_value: Some(0.001),
        }
    }
}

impl RuleThresholds {
    fn effective(&self, production: f64) -> f64 {
        self.override_value.unwrap_or(production)
    }
}

/// The fourteen efficiency measures, in the fixed evaluation order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Measure {
    IncreaseCoolingSetpoints,
    DecreaseHeatingSetpoints,
    ReduceEquipmentSchedules,
    DecreaseVentilation,
    EliminateElectricHeating,
    DecreaseInfiltration,
    ReduceLightingLoad,
    ReducePlugLoads,
    AddFixEconomizers,
    IncreaseCoolingSystemEfficiency,
    IncreaseHeatingSystemEfficiency,
    AddWallCeilingInsulation,
    UpgradeWindows,
    CheckFossilBaseload,
}

impl Measure {
    pub const ALL: [Self; 14] = [
        Self::IncreaseCoolingSetpoints,
        Self::DecreaseHeatingSetpoints,
        Self::ReduceEquipmentSchedules,
        Self::DecreaseVentilation,
        Self::EliminateElectricHeating,
        Self::DecreaseInfiltration,
        Self::ReduceLightingLoad,
        Self::ReducePlugLoads,
        Self::AddFixEconomizers,
        Self::IncreaseCoolingSystemEfficiency,
        Self::IncreaseHeatingSystemEfficiency,
        Self::AddWallCeilingInsulation,
        Self::UpgradeWindows,
        Self::CheckFossilBaseload,
    ];

    /// Report label fixed by contract.
    pub fn label(self) -> &'static str {
        match self {
            Self::IncreaseCoolingSetpoints => "Increase Cooling Setpoints",
            Self::DecreaseHeatingSetpoints => "Decrease Heating Setpoints",
            Self::ReduceEquipmentSchedules => "Reduce Equipment Schedules",
            Self::DecreaseVentilation => "Decrease Ventilation",
            Self::EliminateElectricHeating => "Eliminate Electric Heating",
            Self::DecreaseInfiltration => "Decrease Infiltration",
            Self::ReduceLightingLoad => "Reduce Lighting Load",
            Self::ReducePlugLoads => "Reduce Plug Loads",
            Self::AddFixEconomizers => "Add/Fix Economizers",
            Self::IncreaseCoolingSystemEfficiency => "Increase Cooling System Efficiency",
            Self::IncreaseHeatingSystemEfficiency => "Increase Heating System Efficiency",
            Self::AddWallCeilingInsulation => "Add Wall/Ceiling Insulation",
            Self::UpgradeWindows => "Upgrade Windows",
            Self::CheckFossilBaseload => "Check Fossil Baseload",
        }
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|measure| *measure == self)
            .unwrap_or(0)
    }
}

/// The fourteen rule outcomes in evaluation order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecommendationSet {
    flags: [bool; 14],
}

impl RecommendationSet {
    pub fn is_recommended(&self, measure: Measure) -> bool {
        self.flags[measure.index()]
    }

    /// All measures with their outcomes, in the fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (Measure, bool)> + '_ {
        Measure::ALL
            .iter()
            .map(move |measure| (*measure, self.flags[measure.index()]))
    }

    /// Only the recommended measures, in the fixed order.
    pub fn recommended(&self) -> impl Iterator<Item = Measure> + '_ {
        self.iter()
            .filter(|(_, flagged)| *flagged)
            .map(|(measure, _)| measure)
    }

    /// `(label, outcome)` pairs for report layers.
    pub fn labeled(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.iter().map(|(measure, flagged)| (measure.label(), flagged))
    }
}

impl TargetPlan {
    /// True when the site value sits above its target by at least the
    /// relative threshold. Rules gated on a physically-positive coefficient
    /// also require `site > 0`. Absent values never trigger.
    fn gap_above_target(
        &self,
        kind: CoefficientKind,
        threshold: f64,
        require_positive_site: bool,
    ) -> bool {
        let (Some(site), Some(target)) = (self.site(kind), self.target(kind)) else {
            return false;
        };
        if require_positive_site && site <= 0.0 {
            return false;
        }
        site - target >= threshold * target
    }

    /// The cooling change point is efficient when high, so its gap points
    /// the other way.
    fn cooling_knot_below_target(&self, threshold: f64) -> bool {
        let kind = CoefficientKind::CoolingChangePoint;
        let (Some(site), Some(target)) = (self.site(kind), self.target(kind)) else {
            return false;
        };
        target - site >= threshold * target
    }

    /// Count of envelope symptoms: excess cooling slope, excess heating
    /// slope, and an elevated heating change point.
    fn envelope_symptom_count(&self) -> usize {
        let thresholds = &self.thresholds;
        let slope = thresholds.effective(thresholds.envelope_slope);
        let knot = thresholds.effective(thresholds.envelope_change_point);
        [
            self.gap_above_target(CoefficientKind::CoolingSlope, slope, true),
            self.gap_above_target(CoefficientKind::HeatingSlope, slope, true),
            self.gap_above_target(CoefficientKind::HeatingChangePoint, knot, false),
        ]
        .into_iter()
        .filter(|symptom| *symptom)
        .count()
    }

    /// Evaluates the fourteen rules in their fixed order.
    pub fn recommendations(&self) -> RecommendationSet {
        let thresholds = &self.thresholds;
        let electric = self.utility == UtilityKind::Electric;

        let increase_cooling_setpoints =
            self.cooling_knot_below_target(thresholds.effective(thresholds.cooling_setpoint));
        let decrease_heating_setpoints = self.gap_above_target(
            CoefficientKind::HeatingChangePoint,
            thresholds.effective(thresholds.heating_setpoint),
            false,
        );
        // Schedule changes shift the occupied/unoccupied mix, which moves
        // the balance temperatures too, so a setpoint finding also implies
        // a schedule finding.
        let excess_baseload_for_schedules = electric
            && self.gap_above_target(
                CoefficientKind::Baseload,
                thresholds.effective(thresholds.schedules_baseload),
                true,
            );
        let reduce_equipment_schedules = excess_baseload_for_schedules
            || increase_cooling_setpoints
            || decrease_heating_setpoints;

        let envelope_symptoms = self.envelope_symptom_count();
        let decrease_ventilation = envelope_symptoms >= 2;

        let eliminate_electric_heating = electric
            && self
                .site(CoefficientKind::HeatingSlope)
                .is_some_and(|slope| slope > thresholds.electric_heating_slope);

        let decrease_infiltration = envelope_symptoms >= 2;

        let excess_electric_baseload = electric
            && self.gap_above_target(
                CoefficientKind::Baseload,
                thresholds.effective(thresholds.lighting_baseload),
                true,
            );
        let reduce_lighting_load = excess_electric_baseload;
        let reduce_plug_loads = excess_electric_baseload;

        let add_fix_economizers =
            self.cooling_knot_below_target(thresholds.effective(thresholds.economizer));

        let increase_cooling_system_efficiency = self.gap_above_target(
            CoefficientKind::CoolingSlope,
            thresholds.effective(thresholds.cooling_efficiency),
            true,
        );
        let increase_heating_system_efficiency = self.gap_above_target(
            CoefficientKind::HeatingSlope,
            thresholds.effective(thresholds.heating_efficiency),
            true,
        );

        let add_wall_ceiling_insulation = envelope_symptoms >= 2;

        // Windows demand all three symptoms at once, with the cooling knot
        // standing in for the heating knot.
        let window_symptoms = [
            self.gap_above_target(
                CoefficientKind::CoolingSlope,
                thresholds.effective(thresholds.envelope_slope),
                true,
            ),
            self.gap_above_target(
                CoefficientKind::HeatingSlope,
                thresholds.effective(thresholds.envelope_slope),
                true,
            ),
            self.cooling_knot_below_target(thresholds.effective(thresholds.envelope_change_point)),
        ]
        .into_iter()
        .filter(|symptom| *symptom)
        .count();
        let upgrade_windows = window_symptoms == 3;

        let check_fossil_baseload = self.utility == UtilityKind::FossilFuel
            && self.gap_above_target(
                CoefficientKind::Baseload,
                thresholds.effective(thresholds.fossil_baseload),
                true,
            );

        RecommendationSet {
            flags: [
                increase_cooling_setpoints,
                decrease_heating_setpoints,
                reduce_equipment_schedules,
                decrease_ventilation,
                eliminate_electric_heating,
                decrease_infiltration,
                reduce_lighting_load,
                reduce_plug_loads,
                add_fix_economizers,
                increase_cooling_system_efficiency,
                increase_heating_system_efficiency,
                add_wall_ceiling_insulation,
                upgrade_windows,
                check_fossil_baseload,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Measure, RuleThresholds};

    #[test]
    fn measure_labels_are_the_fixed_report_strings() {
        let labels: Vec<&str> = Measure::ALL.iter().map(|measure| measure.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Increase Cooling Setpoints",
                "Decrease Heating Setpoints",
                "Reduce Equipment Schedules",
                "Decrease Ventilation",
                "Eliminate Electric Heating",
                "Decrease Infiltration",
                "Reduce Lighting Load",
                "Reduce Plug Loads",
                "Add/Fix Economizers",
                "Increase Cooling System Efficiency",
                "Increase Heating System Efficiency",
                "Add Wall/Ceiling Insulation",
                "Upgrade Windows",
                "Check Fossil Baseload",
            ]
        );
    }

    #[test]
    fn default_thresholds_carry_the_override() {
        let thresholds = RuleThresholds::default();
        assert_eq!(thresholds.override_value, Some(0.001));
        assert_eq!(thresholds.effective(0.2), 0.001);

        let production = RuleThresholds {
            override_value: None,
            ..RuleThresholds::default()
        };
        assert_eq!(production.effective(0.2), 0.2);
    }
}
