// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// The five candidate model shapes, in increasing order of complexity.
///
/// Three- and four-parameter shapes collapse both change points to a single
/// value; `FiveParam` keeps them distinct with heating ≤ cooling.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Constant,
    ThreeParamHeating,
    ThreeParamCooling,
    FourParam,
    FiveParam,
}

impl ModelKind {
    /// Display name matching the reference tool's model labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Constant => "Constant",
            Self::ThreeParamHeating => "3P Heating",
            Self::ThreeParamCooling => "3P Cooling",
            Self::FourParam => "4P",
            Self::FiveParam => "5P",
        }
    }

    /// Number of free parameters the shape fits.
    pub fn parameter_count(self) -> usize {
        match self {
            Self::Constant => 1,
            Self::ThreeParamHeating | Self::ThreeParamCooling => 3,
            Self::FourParam => 4,
            Self::FiveParam => 5,
        }
    }
}

/// Piecewise-linear energy response to outdoor temperature.
///
/// ```text
/// t < hcp         -> base + hsl * (t - hcp)
/// hcp <= t <= ccp -> base
/// t > ccp         -> base + csl * (t - ccp)
/// ```
///
/// Continuous at both knots by construction. Physically meaningful fits have
/// `hsl <= 0` and `csl >= 0`.
pub fn piecewise_response(t: f64, hcp: f64, ccp: f64, base: f64, hsl: f64, csl: f64) -> f64 {
    if t < hcp {
        base + hsl * (t - hcp)
    } else if t > ccp {
        base + csl * (t - ccp)
    } else {
        base
    }
}
