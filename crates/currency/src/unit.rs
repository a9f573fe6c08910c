//! Denomination units and their ladder positions.

use serde::{Deserialize, Serialize};

/// Closed set of denomination rungs every currency defines.
///
/// `Micro` sits below the minor unit (its ratio says how many micro units fit
/// in one minor unit); every other rung's ratio says how many minor units fit
/// in one unit of that rung.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Micro,
    Minor,
    Major,
    Millions,
    Billions,
    Trillions,
}

impl UnitKind {
    /// All rungs, from finest to coarsest.
    pub const ALL: [UnitKind; 6] = [
        UnitKind::Micro,
        UnitKind::Minor,
        UnitKind::Major,
        UnitKind::Millions,
        UnitKind::Billions,
        UnitKind::Trillions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Micro => "micro",
            UnitKind::Minor => "minor",
            UnitKind::Major => "major",
            UnitKind::Millions => "millions",
            UnitKind::Billions => "billions",
            UnitKind::Trillions => "trillions",
        }
    }
}

impl core::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rung of a currency's unit ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyUnit {
    pub kind: UnitKind,
    pub name_singular: String,
    pub name_plural: String,
    pub symbol: String,
    /// Number of minor units equal to one unit of this kind. For `Micro` this
    /// is instead the number of micro units in one minor unit.
    pub minor_ratio: i64,
}

impl CurrencyUnit {
    pub fn new(
        kind: UnitKind,
        name_singular: impl Into<String>,
        name_plural: impl Into<String>,
        symbol: impl Into<String>,
        minor_ratio: i64,
    ) -> Self {
        Self {
            kind,
            name_singular: name_singular.into(),
            name_plural: name_plural.into(),
            symbol: symbol.into(),
            minor_ratio,
        }
    }
}
