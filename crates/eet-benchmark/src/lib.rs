// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use eet_core::{stats, CoefficientKind, EetError};

/// Consistency constant mapping median absolute deviation to the standard
/// deviation of normally distributed data.
pub const MAD_NORMAL_CONSISTENCY: f64 = 1.4826;

/// Where a coefficient sits relative to its peer population.
///
/// `Good` means the building spends less than its peers on that axis (or,
/// for the cooling change point, tolerates warmer weather before cooling
/// kicks in).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rating {
    Good,
    Typical,
    Poor,
}

impl Rating {
    /// Numeric form: -1 good, 0 typical, 1 poor.
    pub fn score(self) -> i8 {
        match self {
            Self::Good => -1,
            Self::Typical => 0,
            Self::Poor => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Typical => "Typical",
            Self::Poor => "Poor",
        }
    }

    fn from_score(score: i8) -> Self {
        match score {
            -1 => Self::Good,
            1 => Self::Poor,
            _ => Self::Typical,
        }
    }
}

/// Bands a coefficient against the population median and robust spread.
///
/// Lower is better on every axis except the cooling change point, where a
/// higher balance temperature means less cooling; that axis is rated with
/// the band flipped. A population with zero spread rates everything
/// `Typical`, and the flip is applied before that guard.
pub fn rate(kind: CoefficientKind, value: f64, median: f64, robust_std_dev: f64) -> Rating {
    let mut score: i8 = if value < median - robust_std_dev {
        -1
    } else if value > median + robust_std_dev {
        1
    } else {
        0
    };
    if kind == CoefficientKind::CoolingChangePoint {
        score = -score;
    }
    if robust_std_dev == 0.0 {
        score = 0;
    }
    Rating::from_score(score)
}

/// One building's coefficient compared against its peer population.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Benchmark {
    pub kind: CoefficientKind,
    /// Site value; `None` when the fitted shape has no such term.
    pub value: Option<f64>,
    pub median: f64,
    pub robust_std_dev: f64,
    /// `None` exactly when `value` is absent.
    pub rating: Option<Rating>,
}

impl Benchmark {
    pub fn new(
        kind: CoefficientKind,
        value: Option<f64>,
        median: f64,
        robust_std_dev: f64,
    ) -> Self {
        let rating = value.map(|value| rate(kind, value, median, robust_std_dev));
        Self {
            kind,
            value,
            median,
            robust_std_dev,
            rating,
        }
    }

    /// Builds a benchmark from the coefficient's wire name, surfacing the
    /// taxonomy error for anything outside the five-name contract.
    pub fn from_name(
        name: &str,
        value: Option<f64>,
        median: f64,
        robust_std_dev: f64,
    ) -> Result<Self, EetError> {
        let kind: CoefficientKind = name.parse()?;
        Ok(Self::new(kind, value, median, robust_std_dev))
    }
}

/// Robust location and spread of one coefficient across a population.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopulationStats {
    pub median: f64,
    /// `1.4826 × MAD`; zero for a degenerate population.
    pub robust_std_dev: f64,
}

/// Aggregates one coefficient axis over a population of fitted buildings.
///
/// An absent heating slope means the building measurably needs no heating,
/// so it contributes `0.0`; on every other axis an absent coefficient
/// carries no information and the sample is dropped.
pub fn population_stats(
    kind: CoefficientKind,
    samples: &[Option<f64>],
) -> Result<PopulationStats, EetError> {
    let defined: Vec<f64> = match kind {
        CoefficientKind::HeatingSlope => samples
            .iter()
            .map(|sample| sample.unwrap_or(0.0))
            .collect(),
        _ => samples.iter().copied().flatten().collect(),
    };
    if defined.is_empty() {
        return Err(EetError::invalid_input(format!(
            "no defined {} samples to aggregate",
            kind.as_str()
        )));
    }
    let median = stats::median(&defined)?;
    let mad = stats::median_absolute_deviation(&defined)?;
    Ok(PopulationStats {
        median,
        robust_std_dev: MAD_NORMAL_CONSISTENCY * mad,
    })
}

/// Benchmark namespace placeholder.
pub fn crate_name() -> &'static str {
    let _ = eet_core::crate_name();
    "eet-benchmark"
}

#[cfg(test)]
mod tests {
    use super::{population_stats, rate, Benchmark, PopulationStats, Rating};
    use eet_core::CoefficientKind;

    #[test]
    fn heating_slope_inside_the_band_is_typical() {
        let benchmark = Benchmark::new(CoefficientKind::HeatingSlope, Some(4.0), 3.0, 1.0);
        assert_eq!(benchmark.rating, Some(Rating::Typical));
    }

    #[test]
    fn cooling_change_point_band_is_flipped() {
        // A low balance temperature means the chillers start early: poor.
        let benchmark = Benchmark::new(CoefficientKind::CoolingChangePoint, Some(1.0), 3.0, 1.0);
        assert_eq!(benchmark.rating, Some(Rating::Poor));

        let benchmark = Benchmark::new(CoefficientKind::CoolingChangePoint, Some(5.0), 3.0, 1.0);
        assert_eq!(benchmark.rating, Some(Rating::Good));
    }

    #[test]
    fn baseload_below_the_band_is_good() {
        assert_eq!(
            rate(CoefficientKind::Baseload, 1.0, 3.0, 1.0),
            Rating::Good
        );
        assert_eq!(rate(CoefficientKind::Baseload, 5.0, 3.0, 1.0), Rating::Poor);
    }

    #[test]
    fn band_edges_are_inclusive() {
        assert_eq!(rate(CoefficientKind::Baseload, 2.0, 3.0, 1.0), Rating::Typical);
        assert_eq!(rate(CoefficientKind::Baseload, 4.0, 3.0, 1.0), Rating::Typical);
    }

    #[test]
    fn zero_spread_rates_typical_even_after_the_flip() {
        assert_eq!(
            rate(CoefficientKind::CoolingChangePoint, 100.0, 3.0, 0.0),
            Rating::Typical
        );
        assert_eq!(rate(CoefficientKind::Baseload, 100.0, 3.0, 0.0), Rating::Typical);
    }

    #[test]
    fn absent_site_value_has_no_rating() {
        let benchmark = Benchmark::new(CoefficientKind::CoolingSlope, None, 3.0, 1.0);
        assert_eq!(benchmark.rating, None);
    }

    #[test]
    fn from_name_rejects_unknown_coefficients() {
        let err = Benchmark::from_name("beta_unknown", Some(1.0), 3.0, 1.0)
            .expect_err("unknown name must fail");
        assert!(err.to_string().contains("beta_unknown"));

        let ok = Benchmark::from_name("beta_betc", Some(1.0), 3.0, 1.0)
            .expect("known name must parse");
        assert_eq!(ok.kind, CoefficientKind::CoolingChangePoint);
        assert_eq!(ok.rating, Some(Rating::Poor));
    }

    #[test]
    fn rating_scores_match_the_numeric_contract() {
        assert_eq!(Rating::Good.score(), -1);
        assert_eq!(Rating::Typical.score(), 0);
        assert_eq!(Rating::Poor.score(), 1);
        assert_eq!(Rating::Good.as_str(), "Good");
    }

    #[test]
    fn population_stats_computes_robust_spread() {
        let samples: Vec<Option<f64>> = [1.0, 2.0, 3.0, 4.0, 5.0].map(Some).to_vec();
        let stats =
            population_stats(CoefficientKind::Baseload, &samples).expect("defined samples");
        assert!((stats.median - 3.0).abs() < 1e-12);
        // MAD of 1..5 is 1, scaled by the consistency constant.
        assert!((stats.robust_std_dev - 1.4826).abs() < 1e-12);
    }

    #[test]
    fn heating_slope_treats_absence_as_zero() {
        let samples = vec![Some(-2.0), None, Some(-4.0), None, None];
        let stats =
            population_stats(CoefficientKind::HeatingSlope, &samples).expect("defined samples");
        // Sorted samples are [-4, -2, 0, 0, 0].
        assert!((stats.median - 0.0).abs() < 1e-12);
    }

    #[test]
    fn other_kinds_drop_absent_samples() {
        let samples = vec![Some(2.0), None, Some(4.0)];
        let stats =
            population_stats(CoefficientKind::CoolingSlope, &samples).expect("defined samples");
        assert!((stats.median - 3.0).abs() < 1e-12);
    }

    #[test]
    fn all_absent_population_is_an_error() {
        let samples = vec![None, None];
        let err = population_stats(CoefficientKind::Baseload, &samples)
            .expect_err("nothing to aggregate");
        assert!(err.to_string().contains("beta_base"));
    }

    #[test]
    fn degenerate_population_has_zero_spread() {
        let samples = vec![Some(2.0); 6];
        let stats =
            population_stats(CoefficientKind::Baseload, &samples).expect("defined samples");
        assert_eq!(
            stats,
            PopulationStats {
                median: 2.0,
                robust_std_dev: 0.0
            }
        );
    }
}
