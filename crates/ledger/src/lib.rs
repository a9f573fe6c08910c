//! `simbank-ledger` — account lifecycle and balance operations.
//!
//! The domain-facing API of the ledger engine: account creation, snapshots,
//! deposits, transfers and holds, built on the currency registry and the
//! balance store. Every mutation flows through one revision-checked
//! read-modify-write primitive, so concurrent operations on the same balance
//! never lose updates.

pub mod account;
pub mod bank;
pub mod error;
pub mod ledger;

pub use account::{AccountSnapshot, Funds};
pub use bank::BankProfile;
pub use error::{LedgerError, LedgerResult};
pub use ledger::Ledger;
