//! Composite keys for persisted balance entries.

use serde::{Deserialize, Serialize};

use simbank_core::{AccountId, BalanceState};
use simbank_currency::CurrencyCode;

/// Key of one persisted balance entry.
///
/// An account holds exactly one entry per (currency, state) pair; the value
/// under the key is a non-negative amount in the currency's minor unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BalanceKey {
    pub account: AccountId,
    pub currency: CurrencyCode,
    pub state: BalanceState,
}

impl BalanceKey {
    pub fn new(account: AccountId, currency: CurrencyCode, state: BalanceState) -> Self {
        Self {
            account,
            currency,
            state,
        }
    }

    /// Dotted string form used by string-keyed backends:
    /// `<account-uuid>.<CODE>.<state>`.
    pub fn render(&self) -> String {
        format!("{}.{}.{}", self.account, self.currency, self.state.as_str())
    }
}

impl core::fmt::Display for BalanceKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.render())
    }
}
