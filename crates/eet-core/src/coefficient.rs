// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::EetError;
use std::str::FromStr;

/// The five named axes shared by the regression engine, the benchmark, and
/// the opportunity engine.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoefficientKind {
    Baseload,
    CoolingSlope,
    CoolingChangePoint,
    HeatingSlope,
    HeatingChangePoint,
}

impl CoefficientKind {
    /// All kinds in the fixed contract order.
    pub const ALL: [Self; 5] = [
        Self::Baseload,
        Self::CoolingSlope,
        Self::CoolingChangePoint,
        Self::HeatingSlope,
        Self::HeatingChangePoint,
    ];

    /// Wire name fixed by contract with the population-aggregation layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Baseload => "beta_base",
            Self::CoolingSlope => "beta_cdd",
            Self::CoolingChangePoint => "beta_betc",
            Self::HeatingSlope => "beta_hdd",
            Self::HeatingChangePoint => "beta_beth",
        }
    }

    /// Human-readable name for report layers.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Baseload => "Baseload",
            Self::CoolingSlope => "Cooling Sensitivity",
            Self::CoolingChangePoint => "Cooling Change-point",
            Self::HeatingSlope => "Heating Sensitivity",
            Self::HeatingChangePoint => "Heating Change-point",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Baseload => 0,
            Self::CoolingSlope => 1,
            Self::CoolingChangePoint => 2,
            Self::HeatingSlope => 3,
            Self::HeatingChangePoint => 4,
        }
    }
}

impl FromStr for CoefficientKind {
    type Err = EetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beta_base" => Ok(Self::Baseload),
            "beta_cdd" => Ok(Self::CoolingSlope),
            "beta_betc" => Ok(Self::CoolingChangePoint),
            "beta_hdd" => Ok(Self::HeatingSlope),
            "beta_beth" => Ok(Self::HeatingChangePoint),
            other => Err(EetError::unknown_coefficient(other)),
        }
    }
}

/// Which utility the billed energy came from. Several recommendation rules
/// are gated on this.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UtilityKind {
    Electric,
    FossilFuel,
}

impl UtilityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Electric => "electric",
            Self::FossilFuel => "fossil_fuel",
        }
    }
}

/// Fixed-size container with one slot per [`CoefficientKind`].
///
/// Iteration order is the contract order of [`CoefficientKind::ALL`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct CoefficientSet<T> {
    slots: [T; 5],
}

impl<T> CoefficientSet<T> {
    /// Builds a set by evaluating `f` once per kind, in contract order.
    pub fn from_fn(mut f: impl FnMut(CoefficientKind) -> T) -> Self {
        Self {
            slots: CoefficientKind::ALL.map(&mut f),
        }
    }

    pub fn get(&self, kind: CoefficientKind) -> &T {
        &self.slots[kind.index()]
    }

    pub fn get_mut(&mut self, kind: CoefficientKind) -> &mut T {
        &mut self.slots[kind.index()]
    }

    /// Per-slot transform preserving the kind layout.
    pub fn map<U>(&self, mut f: impl FnMut(CoefficientKind, &T) -> U) -> CoefficientSet<U> {
        CoefficientSet {
            slots: CoefficientKind::ALL.map(|kind| f(kind, self.get(kind))),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CoefficientKind, &T)> {
        CoefficientKind::ALL.iter().map(move |kind| (*kind, self.get(*kind)))
    }
}

impl<T: Default> Default for CoefficientSet<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}
