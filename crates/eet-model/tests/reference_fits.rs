// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use eet_core::EnergySignature;
use eet_model::{ChangePointRegression, ModelKind};

// Monthly average outdoor temperature (deg F) and per-area usage for the
// reference office building, one calendar year.
const TEMPERATURE_F: [f64; 12] = [
    68.12575107,
    70.38140704,
    71.49038076,
    75.91127527,
    79.23819562,
    80.94022825,
    83.36044143,
    82.32376491,
    81.7343778,
    79.23531421,
    74.43723106,
    68.94813234,
];

const ELECTRIC_EUI: [f64; 12] = [
    0.41082736, 0.41278433, 0.42939531, 0.42957719, 0.4665275, 0.496334, 0.48262927, 0.5129985,
    0.47703349, 0.45208535, 0.43193808, 0.396703,
];

const FOSSIL_EUI: [f64; 12] = [
    0.00418866, 0.00408925, 0.00408699, 0.0037231, 0.00357866, 0.00344965, 0.00323299, 0.00343633,
    0.00347068, 0.00365999, 0.00391241, 0.00396499,
];

// Celsius site whose electric load has distinct heating and cooling
// responses meeting at nearly the same temperature.
const TEMPERATURE_C_MIXED: [f64; 12] = [
    16.49774436,
    19.17597293,
    20.54890511,
    22.68663594,
    24.98291925,
    27.78870968,
    29.52193646,
    28.97226754,
    27.16207455,
    23.29365079,
    20.12974684,
    13.40963855,
];

const EUI_MIXED: [f64; 12] = [
    0.43714513, 0.43216608, 0.42055272, 0.40125029, 0.44447121, 0.49665507, 0.49037908, 0.51118835,
    0.45466266, 0.42066609, 0.40706217, 0.42708896,
];

// Celsius site with a deadband wide enough to keep both change points apart.
const TEMPERATURE_C_DEADBAND: [f64; 12] = [
    10.349928430846305,
    11.973839223839226,
    12.883942949160346,
    18.48328416912488,
    20.052400165528656,
    23.64396135265701,
    25.758709016393443,
    24.970244420828905,
    21.39081375282092,
    18.503562680917394,
    12.435875316310097,
    8.105382716049382,
];

const EUI_DEADBAND: [f64; 12] = [
    0.4365708589244377,
    0.4134988047159823,
    0.3927128726414183,
    0.3742807152082102,
    0.3959484654258048,
    0.4403108014723988,
    0.43429237715898233,
    0.46001543271825485,
    0.4185359650470618,
    0.3747953826734285,
    0.38644086357394014,
    0.4122658144475816,
];

#[test]
fn electric_reference_series_selects_three_param_cooling() {
    let engine =
        ChangePointRegression::new(&TEMPERATURE_F, &ELECTRIC_EUI).expect("valid reference input");
    let model = engine
        .fit()
        .expect("fit should not error")
        .expect("reference series has a model");

    assert_eq!(model.kind, ModelKind::ThreeParamCooling);
    assert!(
        (model.cooling_change_point - 72.8865).abs() < 0.01,
        "ccp = {}",
        model.cooling_change_point
    );
    assert!((model.base - 0.412428).abs() < 5e-4, "base = {}", model.base);
    assert!(
        (model.cooling_slope - 0.0083141).abs() < 5e-5,
        "csl = {}",
        model.cooling_slope
    );
    assert_eq!(model.heating_slope, 0.0);
    assert_eq!(model.heating_change_point, model.cooling_change_point);
    assert!((model.r_squared - 0.8703).abs() < 2e-3);

    let signature =
        EnergySignature::new(&TEMPERATURE_F, &ELECTRIC_EUI).expect("valid reference input");
    assert!((model.rmse(&signature) - 0.0127826).abs() < 5e-5);

    assert_eq!(model.summary_text(), vec!["(72.9, 0.4)".to_string()]);
}

#[test]
fn electric_reference_diagnostics_explain_the_rejections() {
    let engine =
        ChangePointRegression::new(&TEMPERATURE_F, &ELECTRIC_EUI).expect("valid reference input");
    let model = engine
        .fit()
        .expect("fit should not error")
        .expect("reference series has a model");

    let diagnostics = &model.diagnostics;
    assert_eq!(diagnostics.n, 12);
    // 3P Heating, 4P, and 5P all fail on heating-slope sign.
    assert_eq!(diagnostics.candidates_rejected, 3);
    assert!(diagnostics
        .notes
        .iter()
        .any(|note| note.starts_with("3P Heating:") && note.contains("sign")));
    assert!(diagnostics.sse.is_finite());
    assert!(diagnostics.refine_iterations > 0);
}

#[test]
fn fossil_reference_series_selects_three_param_heating() {
    let engine =
        ChangePointRegression::new(&TEMPERATURE_F, &FOSSIL_EUI).expect("valid reference input");
    let model = engine
        .fit()
        .expect("fit should not error")
        .expect("reference series has a model");

    assert_eq!(model.kind, ModelKind::ThreeParamHeating);
    // The profile objective decreases monotonically from the 70.1 basin all
    // the way to the warmest observation, so the converged knot is the
    // temperature maximum.
    assert!(
        (model.heating_change_point - 83.3604).abs() < 0.01,
        "hcp = {}",
        model.heating_change_point
    );
    assert!((model.base - 0.0033519).abs() < 1e-5, "base = {}", model.base);
    assert!(
        (model.heating_slope + 5.43e-5).abs() < 2e-6,
        "hsl = {}",
        model.heating_slope
    );
    assert_eq!(model.cooling_slope, 0.0);
    assert!((model.r_squared - 0.9350).abs() < 2e-3);
}

#[test]
fn mixed_load_series_selects_the_four_param_shape() {
    let engine = ChangePointRegression::new(&TEMPERATURE_C_MIXED, &EUI_MIXED)
        .expect("valid reference input");
    let model = engine
        .fit()
        .expect("fit should not error")
        .expect("reference series has a model");

    assert_eq!(model.kind, ModelKind::FourParam);
    assert_eq!(model.heating_change_point, model.cooling_change_point);
    // 22.686 is the only interior local minimum of the profile objective
    // for this series.
    assert!(
        (model.heating_change_point - 22.6866).abs() < 0.01,
        "cp = {}",
        model.heating_change_point
    );
    assert!((model.base - 0.41030).abs() < 1e-3, "base = {}", model.base);
    assert!(
        (model.heating_slope + 0.00279).abs() < 2e-4,
        "hsl = {}",
        model.heating_slope
    );
    assert!(
        (model.cooling_slope - 0.0138145).abs() < 2e-4,
        "csl = {}",
        model.cooling_slope
    );
    assert!((model.r_squared - 0.8952).abs() < 2e-3);
}

#[test]
fn deadband_series_selects_the_five_param_shape() {
    let engine = ChangePointRegression::new(&TEMPERATURE_C_DEADBAND, &EUI_DEADBAND)
        .expect("valid reference input");
    let model = engine
        .fit()
        .expect("fit should not error")
        .expect("reference series has a model");

    assert_eq!(model.kind, ModelKind::FiveParam);
    assert!(model.heating_change_point < model.cooling_change_point);
    assert!(model.cooling_change_point - model.heating_change_point >= 0.5);
    // The heating knot sits on a flat stretch of the profile objective (no
    // observations between roughly 12.9 and 18.5 degrees), so only its range
    // is pinned down; the cooling knot lands on a data point.
    assert!(
        model.heating_change_point > 12.0 && model.heating_change_point < 18.6,
        "hcp = {}",
        model.heating_change_point
    );
    assert!(
        (model.cooling_change_point - 18.483).abs() < 0.05,
        "ccp = {}",
        model.cooling_change_point
    );
    // The slopes and R² are pinned by the data even though the knots are
    // not; they hold to six decimals anywhere on the ridge.
    assert!(
        (model.heating_slope + 0.005610069).abs() < 1e-6,
        "hsl = {}",
        model.heating_slope
    );
    assert!(
        (model.cooling_slope - 0.010430569).abs() < 1e-6,
        "csl = {}",
        model.cooling_slope
    );
    assert!((model.r_squared - 0.7760372).abs() < 1e-6);

    let summary = model.change_point_summary();
    assert_eq!(summary.len(), 2);
    assert!(summary[0].0 < summary[1].0, "heating pair comes first");
    assert_eq!(summary[0].1, summary[1].1, "both pairs carry the base load");
}

#[test]
fn predictions_are_continuous_at_the_change_points() {
    let engine = ChangePointRegression::new(&TEMPERATURE_C_DEADBAND, &EUI_DEADBAND)
        .expect("valid reference input");
    let model = engine
        .fit()
        .expect("fit should not error")
        .expect("reference series has a model");

    for knot in [model.heating_change_point, model.cooling_change_point] {
        let below = model.predict(knot - 1e-9);
        let at = model.predict(knot);
        let above = model.predict(knot + 1e-9);
        assert!((below - at).abs() < 1e-7);
        assert!((above - at).abs() < 1e-7);
    }
}

#[test]
fn seeds_come_from_the_temperature_distribution() {
    let engine =
        ChangePointRegression::new(&TEMPERATURE_F, &ELECTRIC_EUI).expect("valid reference input");
    let lo = TEMPERATURE_F.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = TEMPERATURE_F
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    assert!(engine.heating_seed() >= lo && engine.heating_seed() <= hi);
    assert!(engine.cooling_seed() >= lo && engine.cooling_seed() <= hi);
    assert!(engine.heating_seed() <= engine.cooling_seed());
}
