//! Immutable catalog of supported currencies with lookup and conversion.

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::currency::{Currency, CurrencyCode, CurrencyError};
use crate::unit::UnitKind;

/// The set of currencies a ledger supports.
///
/// Built once at startup and passed explicitly to whoever needs it; never a
/// process-wide singleton, so tests can run against custom currency sets.
/// Iteration order is construction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyRegistry {
    currencies: Vec<Currency>,
}

impl CurrencyRegistry {
    pub fn new(currencies: impl IntoIterator<Item = Currency>) -> Self {
        Self {
            currencies: currencies.into_iter().collect(),
        }
    }

    /// The registry every simulation bank ships with (CAD, USD, GBP, EUR, JPY).
    pub fn builtin() -> Self {
        Self::new(catalog::currencies())
    }

    pub fn lookup(&self, code: &CurrencyCode) -> Result<&Currency, CurrencyError> {
        self.currencies
            .iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| CurrencyError::UnknownCurrency(code.clone()))
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.lookup(code).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.iter()
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    /// Convert between two rungs of one currency's ladder, routed through the
    /// minor unit.
    pub fn convert(
        &self,
        code: &CurrencyCode,
        from: UnitKind,
        to: UnitKind,
        amount: i64,
    ) -> Result<i64, CurrencyError> {
        self.lookup(code)?.convert(from, to, amount)
    }
}
