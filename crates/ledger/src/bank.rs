//! Issuing-institution identity.

use serde::{Deserialize, Serialize};

use simbank_currency::CurrencyCode;

/// Identity of one issuing institution.
///
/// Each bank's ledger lives in its own store bucket, so balances of different
/// institutions never share keys even on a shared medium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankProfile {
    pub id: u16,
    pub name: String,
    pub code: String,
    pub country_code: String,
    pub home_currencies: Vec<CurrencyCode>,
}

impl BankProfile {
    /// Store bucket holding this bank's ledger entries.
    pub fn bucket(&self) -> String {
        format!("bank-{}-{}", self.country_code, self.id)
    }

    /// Human-readable service description.
    pub fn description(&self) -> String {
        format!("Banking service for {}.", self.name)
    }
}
