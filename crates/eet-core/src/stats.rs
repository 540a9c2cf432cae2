// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::EetError;

/// Arithmetic mean of a non-empty sample.
pub fn mean(sample: &[f64]) -> Result<f64, EetError> {
    if sample.is_empty() {
        return Err(EetError::invalid_input("mean of an empty sample"));
    }
    Ok(sample.iter().sum::<f64>() / sample.len() as f64)
}

/// Standard median of a non-empty sample.
pub fn median(sample: &[f64]) -> Result<f64, EetError> {
    if sample.is_empty() {
        return Err(EetError::invalid_input("median of an empty sample"));
    }
    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        Ok(sorted[n / 2])
    } else {
        Ok((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Percentile with linear interpolation between closest ranks.
///
/// Matches the convention of the reference population tooling: rank
/// `p/100 * (n-1)` interpolated between its floor and ceiling neighbors.
pub fn percentile(sample: &[f64], p: f64) -> Result<f64, EetError> {
    if sample.is_empty() {
        return Err(EetError::invalid_input("percentile of an empty sample"));
    }
    if !(0.0..=100.0).contains(&p) {
        return Err(EetError::invalid_input(format!(
            "percentile must be in [0, 100], got {p}"
        )));
    }
    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return Ok(sorted[lower]);
    }
    let fraction = rank - lower as f64;
    Ok(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

/// Median absolute deviation around the sample median.
pub fn median_absolute_deviation(sample: &[f64]) -> Result<f64, EetError> {
    let center = median(sample)?;
    let deviations: Vec<f64> = sample.iter().map(|value| (value - center).abs()).collect();
    median(&deviations)
}
