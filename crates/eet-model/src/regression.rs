// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::least_squares::least_squares;
use crate::search::descend_from;
use crate::shape::{piecewise_response, ModelKind};
use eet_core::{stats, CoefficientKind, EetError, EnergySignature, FitDiagnostics};

/// Tuning knobs for the candidate search and the model-selection tests.
///
/// The defaults are calibrated against the reference monthly-billing fits:
/// they reproduce the published 3P-cooling example and select the expected
/// shape on the 3P-heating, 4P, and 5P reference series.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitConfig {
    /// Percentile of the temperature series seeding the heating change point.
    pub heating_seed_percentile: f64,
    /// Percentile of the temperature series seeding the cooling change point.
    pub cooling_seed_percentile: f64,
    /// The initial descent step is the observed temperature range divided by
    /// this count.
    pub coarse_steps: usize,
    /// Change-point resolution at which a descent stops.
    pub descent_tolerance: f64,
    /// Iteration budget per one-dimensional descent.
    pub max_descent_iterations: usize,
    /// Alternation rounds for the two-change-point search.
    pub max_alternation_rounds: usize,
    /// Minimum |t| for a slope to count as statistically significant.
    pub min_slope_t_statistic: f64,
    /// Minimum R² for any sloped shape to beat the constant model.
    pub min_r_squared: f64,
    /// Minimum heating/cooling change-point separation for the 5P shape;
    /// closer knots collapse to the 4P shape.
    pub min_change_point_separation: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            heating_seed_percentile: 45.0,
            cooling_seed_percentile: 55.0,
            coarse_steps: 80,
            descent_tolerance: 1e-9,
            max_descent_iterations: 10_000,
            max_alternation_rounds: 60,
            min_slope_t_statistic: 1.5,
            min_r_squared: 0.1,
            min_change_point_separation: 0.5,
        }
    }
}

impl FitConfig {
    fn validate(&self) -> Result<(), EetError> {
        for (name, value) in [
            ("heating_seed_percentile", self.heating_seed_percentile),
            ("cooling_seed_percentile", self.cooling_seed_percentile),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(EetError::invalid_input(format!(
                    "{name} must be in [0, 100], got {value}"
                )));
            }
        }
        if self.coarse_steps < 2 {
            return Err(EetError::invalid_input("coarse_steps must be >= 2"));
        }
        if self.min_change_point_separation < 0.0 {
            return Err(EetError::invalid_input(
                "min_change_point_separation must be >= 0",
            ));
        }
        Ok(())
    }
}

/// Coefficients of the accepted shape, immutable once fitted.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct FittedModel {
    pub kind: ModelKind,
    /// Temperature-independent energy use intensity.
    pub base: f64,
    /// `<= 0` by convention; exactly `0` when the shape has no heating term.
    pub heating_slope: f64,
    /// `>= 0` by convention; exactly `0` when the shape has no cooling term.
    pub cooling_slope: f64,
    pub heating_change_point: f64,
    pub cooling_change_point: f64,
    pub r_squared: f64,
    pub diagnostics: FitDiagnostics,
}

impl FittedModel {
    /// Evaluates the fitted piecewise response at temperature `t`.
    pub fn predict(&self, t: f64) -> f64 {
        piecewise_response(
            t,
            self.heating_change_point,
            self.cooling_change_point,
            self.base,
            self.heating_slope,
            self.cooling_slope,
        )
    }

    /// Root-mean-square residual of the fitted parameters over a series.
    pub fn rmse(&self, signature: &EnergySignature<'_>) -> f64 {
        let n = signature.len() as f64;
        let sse: f64 = signature
            .points()
            .map(|(t, y)| {
                let residual = y - self.predict(t);
                residual * residual
            })
            .sum();
        (sse / n).sqrt()
    }

    /// Fitted value of one coefficient axis, for population aggregation.
    pub fn coefficient(&self, kind: CoefficientKind) -> f64 {
        match kind {
            CoefficientKind::Baseload => self.base,
            CoefficientKind::CoolingSlope => self.cooling_slope,
            CoefficientKind::CoolingChangePoint => self.cooling_change_point,
            CoefficientKind::HeatingSlope => self.heating_slope,
            CoefficientKind::HeatingChangePoint => self.heating_change_point,
        }
    }

    /// `(change point, base)` pairs rounded to one decimal: one pair for
    /// single-change-point shapes, heating first then cooling for 5P.
    pub fn change_point_summary(&self) -> Vec<(f64, f64)> {
        let round1 = |v: f64| (v * 10.0).round() / 10.0;
        if self.kind == ModelKind::FiveParam {
            vec![
                (round1(self.heating_change_point), round1(self.base)),
                (round1(self.cooling_change_point), round1(self.base)),
            ]
        } else {
            vec![(round1(self.heating_change_point), round1(self.base))]
        }
    }

    /// Display form of [`Self::change_point_summary`], e.g. `(72.9, 0.4)`.
    pub fn summary_text(&self) -> Vec<String> {
        self.change_point_summary()
            .into_iter()
            .map(|(cp, base)| format!("({cp:.1}, {base:.1})"))
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    kind: ModelKind,
    hcp: f64,
    ccp: f64,
    base: f64,
    hsl: f64,
    csl: f64,
    t_hsl: f64,
    t_csl: f64,
    sse: f64,
    iterations: usize,
}

/// Change-point regression over one building's energy signature.
///
/// Fits the five candidate shapes by profiled least squares (the response is
/// linear in base and slopes once the change points are fixed) and accepts
/// the most complex shape whose slopes are significant and correctly signed.
#[derive(Clone, Debug)]
pub struct ChangePointRegression<'a> {
    signature: EnergySignature<'a>,
    config: FitConfig,
    heating_seed: f64,
    cooling_seed: f64,
}

impl<'a> ChangePointRegression<'a> {
    /// Builds the engine from parallel temperature and usage series.
    ///
    /// Mismatched lengths are a fatal construction error.
    pub fn new(temperature: &'a [f64], eui: &'a [f64]) -> Result<Self, EetError> {
        Self::with_config(EnergySignature::new(temperature, eui)?, FitConfig::default())
    }

    pub fn with_config(
        signature: EnergySignature<'a>,
        config: FitConfig,
    ) -> Result<Self, EetError> {
        config.validate()?;
        let heating_seed = stats::percentile(signature.temperature(), config.heating_seed_percentile)?;
        let cooling_seed = stats::percentile(signature.temperature(), config.cooling_seed_percentile)?;
        Ok(Self {
            signature,
            config,
            heating_seed,
            cooling_seed,
        })
    }

    /// Default heating change-point initial guess (45th percentile).
    pub fn heating_seed(&self) -> f64 {
        self.heating_seed
    }

    /// Default cooling change-point initial guess (55th percentile).
    pub fn cooling_seed(&self) -> f64 {
        self.cooling_seed
    }

    pub fn signature(&self) -> &EnergySignature<'a> {
        &self.signature
    }

    /// Fits all candidate shapes and selects one.
    ///
    /// `Ok(None)` means no candidate converged to usable coefficients; this
    /// is an expected outcome for pathological series, not an error.
    pub fn fit(&self) -> Result<Option<FittedModel>, EetError> {
        let t = self.signature.temperature();
        let y = self.signature.eui();
        let n = t.len();

        let y_mean = stats::mean(y)?;
        let sst: f64 = y.iter().map(|v| (v - y_mean) * (v - y_mean)).sum();
        let lo = t.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = t.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut diagnostics = FitDiagnostics {
            n,
            ..FitDiagnostics::default()
        };

        let constant = Candidate {
            kind: ModelKind::Constant,
            hcp: stats::median(t)?,
            ccp: stats::median(t)?,
            base: y_mean,
            hsl: 0.0,
            csl: 0.0,
            t_hsl: 0.0,
            t_csl: 0.0,
            sse: sst,
            iterations: 0,
        };
        diagnostics.candidates_evaluated = 1;

        // A flat series whose mean is inexact leaves rounding dust in SST
        // instead of exact zero, and a slope fitted to that dust would pass
        // the significance tests.
        let sst_floor = f64::EPSILON * n as f64 * y_mean * y_mean;

        // Degenerate series: no temperature spread or flat usage leaves only
        // the constant shape identifiable.
        if hi <= lo || sst <= sst_floor {
            diagnostics
                .notes
                .push("degenerate series: only the constant shape is identifiable".to_string());
            return Ok(self.accept(constant, sst, &mut diagnostics));
        }

        let initial_step = (hi - lo) / self.config.coarse_steps as f64;
        let mut accepted: Option<Candidate> = None;
        let mut valid_three_p: Vec<Candidate> = Vec::new();

        let mut consider = |candidate: Option<Candidate>,
                            diagnostics: &mut FitDiagnostics,
                            label: &str| {
            let Some(candidate) = candidate else {
                diagnostics
                    .notes
                    .push(format!("{label}: profile search did not converge"));
                return None;
            };
            diagnostics.candidates_evaluated += 1;
            diagnostics.refine_iterations += candidate.iterations;
            match self.rejection_reason(&candidate, sst) {
                None => Some(candidate),
                Some(reason) => {
                    diagnostics.candidates_rejected += 1;
                    diagnostics.notes.push(format!("{label}: {reason}"));
                    None
                }
            }
        };

        let heating = consider(
            self.fit_single_knot(ModelKind::ThreeParamHeating, self.heating_seed, lo, hi, initial_step),
            &mut diagnostics,
            ModelKind::ThreeParamHeating.as_str(),
        );
        let cooling = consider(
            self.fit_single_knot(ModelKind::ThreeParamCooling, self.cooling_seed, lo, hi, initial_step),
            &mut diagnostics,
            ModelKind::ThreeParamCooling.as_str(),
        );
        valid_three_p.extend(heating);
        valid_three_p.extend(cooling);

        // A mixed shape can be justified even when one 3P direction is
        // drowned out by the other, so 4P/5P are attempted whenever any
        // sloped shape is plausible.
        if !valid_three_p.is_empty() {
            let five = consider(
                self.fit_double_knot(lo, hi, initial_step),
                &mut diagnostics,
                ModelKind::FiveParam.as_str(),
            );
            let four = consider(
                self.fit_single_knot(ModelKind::FourParam, self.heating_seed, lo, hi, initial_step),
                &mut diagnostics,
                ModelKind::FourParam.as_str(),
            );
            accepted = five.or(four);
        }

        let accepted = accepted.or_else(|| {
            valid_three_p
                .iter()
                .copied()
                .min_by(|a, b| a.sse.total_cmp(&b.sse))
        });

        Ok(self.accept(accepted.unwrap_or(constant), sst, &mut diagnostics))
    }

    fn accept(
        &self,
        candidate: Candidate,
        sst: f64,
        diagnostics: &mut FitDiagnostics,
    ) -> Option<FittedModel> {
        let params = [
            candidate.base,
            candidate.hsl,
            candidate.csl,
            candidate.hcp,
            candidate.ccp,
        ];
        if params.iter().any(|value| !value.is_finite()) {
            return None;
        }
        diagnostics.sse = candidate.sse;
        let r_squared = if sst > 0.0 {
            1.0 - candidate.sse / sst
        } else {
            1.0
        };
        Some(FittedModel {
            kind: candidate.kind,
            base: candidate.base,
            heating_slope: candidate.hsl,
            cooling_slope: candidate.csl,
            heating_change_point: candidate.hcp,
            cooling_change_point: candidate.ccp,
            r_squared,
            diagnostics: diagnostics.clone(),
        })
    }

    /// Why a candidate fails the sign/significance acceptance tests, if it
    /// does.
    fn rejection_reason(&self, candidate: &Candidate, sst: f64) -> Option<String> {
        let config = &self.config;
        let r_squared = 1.0 - candidate.sse / sst;

        let wants_heating = matches!(
            candidate.kind,
            ModelKind::ThreeParamHeating | ModelKind::FourParam | ModelKind::FiveParam
        );
        let wants_cooling = matches!(
            candidate.kind,
            ModelKind::ThreeParamCooling | ModelKind::FourParam | ModelKind::FiveParam
        );

        if wants_heating {
            if candidate.hsl >= 0.0 {
                return Some("heating slope has the wrong sign".to_string());
            }
            if candidate.t_hsl.abs() < config.min_slope_t_statistic {
                return Some(format!(
                    "heating slope not significant (|t| = {:.2})",
                    candidate.t_hsl.abs()
                ));
            }
        }
        if wants_cooling {
            if candidate.csl <= 0.0 {
                return Some("cooling slope has the wrong sign".to_string());
            }
            if candidate.t_csl.abs() < config.min_slope_t_statistic {
                return Some(format!(
                    "cooling slope not significant (|t| = {:.2})",
                    candidate.t_csl.abs()
                ));
            }
        }
        if r_squared < config.min_r_squared {
            return Some(format!("R² = {r_squared:.3} below minimum"));
        }
        if candidate.kind == ModelKind::FiveParam
            && candidate.ccp - candidate.hcp < config.min_change_point_separation
        {
            return Some("change points collapse to a single knot".to_string());
        }
        None
    }

    fn profile_sse(&self, kind: ModelKind, hcp: f64, ccp: f64) -> f64 {
        if hcp > ccp {
            return f64::INFINITY;
        }
        let t = self.signature.temperature();
        let y = self.signature.eui();
        let ones = vec![1.0; t.len()];
        let result = match kind {
            ModelKind::ThreeParamHeating => {
                let heating = hinge_heating(t, hcp);
                least_squares(&[&ones, &heating], y)
            }
            ModelKind::ThreeParamCooling => {
                let cooling = hinge_cooling(t, ccp);
                least_squares(&[&ones, &cooling], y)
            }
            _ => {
                let heating = hinge_heating(t, hcp);
                let cooling = hinge_cooling(t, ccp);
                least_squares(&[&ones, &heating, &cooling], y)
            }
        };
        result.map(|fit| fit.sse).unwrap_or(f64::INFINITY)
    }

    /// Fits a shape with a single change point by seeded descent on the
    /// profile objective.
    fn fit_single_knot(
        &self,
        kind: ModelKind,
        seed: f64,
        lo: f64,
        hi: f64,
        initial_step: f64,
    ) -> Option<Candidate> {
        let outcome = descend_from(
            seed,
            lo,
            hi,
            initial_step,
            self.config.descent_tolerance,
            self.config.max_descent_iterations,
            |cp| self.profile_sse(kind, cp, cp),
        );
        if !outcome.value.is_finite() {
            return None;
        }
        self.solve_at(kind, outcome.x, outcome.x, outcome.iterations)
    }

    /// Fits the 5P shape by alternating bounded descents on each knot,
    /// keeping heating ≤ cooling through the search bounds.
    fn fit_double_knot(&self, lo: f64, hi: f64, initial_step: f64) -> Option<Candidate> {
        let mut hcp = self.heating_seed.min(self.cooling_seed);
        let mut ccp = self.heating_seed.max(self.cooling_seed);
        let mut iterations = 0;

        for _ in 0..self.config.max_alternation_rounds {
            let heating_pass = descend_from(
                hcp,
                lo,
                ccp,
                initial_step,
                self.config.descent_tolerance,
                self.config.max_descent_iterations,
                |cp| self.profile_sse(ModelKind::FiveParam, cp, ccp),
            );
            let cooling_pass = descend_from(
                ccp,
                heating_pass.x,
                hi,
                initial_step,
                self.config.descent_tolerance,
                self.config.max_descent_iterations,
                |cp| self.profile_sse(ModelKind::FiveParam, heating_pass.x, cp),
            );
            iterations += heating_pass.iterations + cooling_pass.iterations;
            let converged = (heating_pass.x - hcp).abs() < self.config.descent_tolerance
                && (cooling_pass.x - ccp).abs() < self.config.descent_tolerance;
            hcp = heating_pass.x;
            ccp = cooling_pass.x;
            if converged {
                break;
            }
        }

        if !self.profile_sse(ModelKind::FiveParam, hcp, ccp).is_finite() {
            return None;
        }
        self.solve_at(ModelKind::FiveParam, hcp, ccp, iterations)
    }

    /// Final least-squares solve at the chosen change points.
    fn solve_at(
        &self,
        kind: ModelKind,
        hcp: f64,
        ccp: f64,
        iterations: usize,
    ) -> Option<Candidate> {
        let t = self.signature.temperature();
        let y = self.signature.eui();
        let ones = vec![1.0; t.len()];

        match kind {
            ModelKind::ThreeParamHeating => {
                let heating = hinge_heating(t, hcp);
                let fit = least_squares(&[&ones, &heating], y).ok()?;
                Some(Candidate {
                    kind,
                    hcp,
                    ccp: hcp,
                    base: fit.params[0],
                    hsl: fit.params[1],
                    csl: 0.0,
                    t_hsl: fit.t_statistic(1),
                    t_csl: 0.0,
                    sse: fit.sse,
                    iterations,
                })
            }
            ModelKind::ThreeParamCooling => {
                let cooling = hinge_cooling(t, ccp);
                let fit = least_squares(&[&ones, &cooling], y).ok()?;
                Some(Candidate {
                    kind,
                    hcp: ccp,
                    ccp,
                    base: fit.params[0],
                    hsl: 0.0,
                    csl: fit.params[1],
                    t_hsl: 0.0,
                    t_csl: fit.t_statistic(1),
                    sse: fit.sse,
                    iterations,
                })
            }
            _ => {
                let heating = hinge_heating(t, hcp);
                let cooling = hinge_cooling(t, ccp);
                let fit = least_squares(&[&ones, &heating, &cooling], y).ok()?;
                Some(Candidate {
                    kind,
                    hcp,
                    ccp,
                    base: fit.params[0],
                    hsl: fit.params[1],
                    csl: fit.params[2],
                    t_hsl: fit.t_statistic(1),
                    t_csl: fit.t_statistic(2),
                    sse: fit.sse,
                    iterations,
                })
            }
        }
    }
}

fn hinge_heating(t: &[f64], cp: f64) -> Vec<f64> {
    t.iter().map(|value| (value - cp).min(0.0)).collect()
}

fn hinge_cooling(t: &[f64], cp: f64) -> Vec<f64> {
    t.iter().map(|value| (value - cp).max(0.0)).collect()
}
