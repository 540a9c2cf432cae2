// SPDX-License-Identifier: MIT OR Apache-2.0

#![no_main]

use eet_model::{ChangePointRegression, FitConfig};
use libfuzzer_sys::fuzz_target;

const MAX_PERIODS: usize = 64;

fn decode_f64_pairs(data: &[u8]) -> (Vec<f64>, Vec<f64>) {
    let mut temperature = Vec::new();
    let mut eui = Vec::new();
    for chunk in data.chunks_exact(16).take(MAX_PERIODS) {
        let mut t_bytes = [0u8; 8];
        let mut y_bytes = [0u8; 8];
        t_bytes.copy_from_slice(&chunk[..8]);
        y_bytes.copy_from_slice(&chunk[8..]);
        temperature.push(f64::from_le_bytes(t_bytes));
        eui.push(f64::from_le_bytes(y_bytes));
    }
    (temperature, eui)
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let (seed, payload) = data.split_at(2);
    let (temperature, eui) = decode_f64_pairs(payload);

    // Raw bytes produce NaN and infinity inputs too; those must be rejected
    // at construction, never reach the solver.
    let Ok(signature) = eet_core::EnergySignature::new(&temperature, &eui) else {
        return;
    };

    let config = FitConfig {
        heating_seed_percentile: f64::from(seed[0]) / 255.0 * 100.0,
        cooling_seed_percentile: f64::from(seed[1]) / 255.0 * 100.0,
        max_descent_iterations: 512,
        max_alternation_rounds: 8,
        ..FitConfig::default()
    };
    let Ok(engine) = ChangePointRegression::with_config(signature, config) else {
        return;
    };

    if let Ok(Some(model)) = engine.fit() {
        assert!(model.heating_slope <= 0.0);
        assert!(model.cooling_slope >= 0.0);
        assert!(model.heating_change_point <= model.cooling_change_point);
        assert!(model.base.is_finite());
        let _ = model.predict(model.heating_change_point);
    }
});
