//! Read-only account snapshots.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use simbank_core::AccountId;
use simbank_currency::CurrencyCode;

/// One currency's funds within an account snapshot.
///
/// Minor-unit figures are exact; major-unit figures are integer-truncated
/// equivalents for display and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funds {
    pub currency: CurrencyCode,
    pub available_minor: i64,
    pub on_hold_minor: i64,
    pub total_minor: i64,
    pub available_major: i64,
    pub on_hold_major: i64,
    pub total_major: i64,
}

/// Point-in-time aggregate of an account's balances across every registry
/// currency. Purely a read model; mutating it changes nothing in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub id: AccountId,
    pub as_of: DateTime<Utc>,
    pub funds: BTreeMap<CurrencyCode, Funds>,
}

impl AccountSnapshot {
    /// Funds in one currency, if the registry knows it.
    pub fn currency(&self, code: &CurrencyCode) -> Option<&Funds> {
        self.funds.get(code)
    }

    /// Sum of available + on-hold minor amounts across all currencies.
    ///
    /// Only meaningful as a conservation check in tests and simulations;
    /// currencies are not interchangeable.
    pub fn grand_total_minor(&self) -> i64 {
        self.funds.values().map(|f| f.total_minor).sum()
    }
}
