// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::EetError;

/// Zero-copy view over one building's paired billing-period series:
/// outdoor temperature and energy-use intensity, one entry per period,
/// already unit-normalized by the ingestion layer.
///
/// The regression is order-independent, so no time ordering is required.
#[derive(Clone, Copy, Debug)]
pub struct EnergySignature<'a> {
    temperature: &'a [f64],
    eui: &'a [f64],
}

impl<'a> EnergySignature<'a> {
    /// Constructs a validated signature.
    ///
    /// Mismatched lengths are a fatal caller bug, per the ingestion
    /// contract; empty and non-finite series are rejected for the same
    /// reason.
    pub fn new(temperature: &'a [f64], eui: &'a [f64]) -> Result<Self, EetError> {
        if temperature.len() != eui.len() {
            return Err(EetError::invalid_input(format!(
                "series length mismatch: {} temperature points vs {} usage points",
                temperature.len(),
                eui.len()
            )));
        }
        if temperature.is_empty() {
            return Err(EetError::invalid_input(
                "at least one billing period is required",
            ));
        }
        if let Some(idx) = temperature.iter().position(|value| !value.is_finite()) {
            return Err(EetError::invalid_input(format!(
                "temperature[{idx}] is not finite"
            )));
        }
        if let Some(idx) = eui.iter().position(|value| !value.is_finite()) {
            return Err(EetError::invalid_input(format!("eui[{idx}] is not finite")));
        }

        Ok(Self { temperature, eui })
    }

    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }

    pub fn temperature(&self) -> &'a [f64] {
        self.temperature
    }

    pub fn eui(&self) -> &'a [f64] {
        self.eui
    }

    /// Paired iteration over `(temperature, eui)`.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + 'a {
        self.temperature
            .iter()
            .copied()
            .zip(self.eui.iter().copied())
    }
}
