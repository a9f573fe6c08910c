//! A currency and its integer conversion rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::unit::{CurrencyUnit, UnitKind};

/// Short currency identifier, globally unique within a registry (e.g. "USD").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Currency-layer error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// The registry has no currency under this code.
    #[error("unknown currency: {0}")]
    UnknownCurrency(CurrencyCode),

    /// The currency's ladder has no entry for this unit kind.
    #[error("currency {code} does not define the {kind} unit")]
    UnknownUnit { code: CurrencyCode, kind: UnitKind },

    /// A ladder handed to `Currency::new` was missing a rung.
    #[error("currency {code} is missing the {kind} rung of its unit ladder")]
    IncompleteLadder { code: CurrencyCode, kind: UnitKind },

    /// A ladder ratio was out of range (every ratio is >= 1; minor is exactly 1).
    #[error("currency {code} has an invalid {kind} minor ratio: {ratio}")]
    InvalidRatio {
        code: CurrencyCode,
        kind: UnitKind,
        ratio: i64,
    },

    /// The converted amount does not fit in an i64.
    #[error("conversion result does not fit in the amount range")]
    AmountOverflow,
}

/// A currency code plus its complete unit ladder.
///
/// Invariants (enforced by [`Currency::new`]): all six [`UnitKind`]s are
/// present, the minor rung has ratio exactly 1, and every ratio is positive.
/// The minor unit is the canonical storage denomination; all conversions pass
/// through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    name: String,
    code: CurrencyCode,
    units: BTreeMap<UnitKind, CurrencyUnit>,
}

impl Currency {
    /// Build a currency, validating the ladder invariants.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<CurrencyCode>,
        units: impl IntoIterator<Item = CurrencyUnit>,
    ) -> Result<Self, CurrencyError> {
        let code = code.into();
        let units: BTreeMap<UnitKind, CurrencyUnit> =
            units.into_iter().map(|u| (u.kind, u)).collect();

        for kind in UnitKind::ALL {
            let Some(unit) = units.get(&kind) else {
                return Err(CurrencyError::IncompleteLadder { code, kind });
            };
            if unit.minor_ratio < 1 || (kind == UnitKind::Minor && unit.minor_ratio != 1) {
                return Err(CurrencyError::InvalidRatio {
                    code,
                    kind,
                    ratio: unit.minor_ratio,
                });
            }
        }

        Ok(Self {
            name: name.into(),
            code,
            units,
        })
    }

    /// Ladder constructor for the builtin catalog, whose literals are known
    /// valid (and revalidated by test). External callers go through `new`.
    pub(crate) fn from_ladder(name: &str, code: &str, units: [CurrencyUnit; 6]) -> Self {
        Self {
            name: name.to_string(),
            code: CurrencyCode::new(code),
            units: units.into_iter().map(|u| (u.kind, u)).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &CurrencyCode {
        &self.code
    }

    pub fn unit(&self, kind: UnitKind) -> Result<&CurrencyUnit, CurrencyError> {
        self.units.get(&kind).ok_or_else(|| CurrencyError::UnknownUnit {
            code: self.code.clone(),
            kind,
        })
    }

    /// Convert `amount` of `from` units into minor units.
    ///
    /// Micro amounts divide by the micro ratio (truncating toward zero);
    /// every other rung multiplies by its ratio.
    pub fn to_minor(&self, from: UnitKind, amount: i64) -> Result<i64, CurrencyError> {
        let unit = self.unit(from)?;
        if from == UnitKind::Micro {
            return Ok(amount / unit.minor_ratio);
        }
        amount
            .checked_mul(unit.minor_ratio)
            .ok_or(CurrencyError::AmountOverflow)
    }

    /// Convert a minor-unit amount into `to` units.
    ///
    /// Micro amounts multiply by the micro ratio; every other rung divides by
    /// its ratio, truncating toward zero. An amount smaller than one coarse
    /// unit therefore converts to zero, by design.
    pub fn from_minor(&self, to: UnitKind, minor: i64) -> Result<i64, CurrencyError> {
        let unit = self.unit(to)?;
        if to == UnitKind::Micro {
            return minor
                .checked_mul(unit.minor_ratio)
                .ok_or(CurrencyError::AmountOverflow);
        }
        Ok(minor / unit.minor_ratio)
    }

    /// Convert between any two rungs of this currency's ladder.
    pub fn convert(&self, from: UnitKind, to: UnitKind, amount: i64) -> Result<i64, CurrencyError> {
        let minor = self.to_minor(from, amount)?;
        self.from_minor(to, minor)
    }
}
