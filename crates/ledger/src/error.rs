//! Ledger operation errors.

use thiserror::Error;

use simbank_core::AccountId;
use simbank_currency::CurrencyError;
use simbank_store::StoreError;

/// Result type of every ledger operation.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failure of a ledger operation.
///
/// Every failure short-circuits before (or instead of) a write; no operation
/// partially applies on its own key. A multi-key operation that fails between
/// legs surfaces the error to the caller rather than swallowing it.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The nil UUID can never hold balances.
    #[error("invalid account: the nil id cannot hold balances")]
    InvalidAccount,

    /// The account has no ledger entries; it was never created here.
    #[error("unknown account: {0}")]
    UnknownAccount(AccountId),

    /// `create_account` found existing entries; balances are never reset.
    #[error("account already exists: {0}")]
    AccountExists(AccountId),

    /// A negative amount was supplied where only non-negative amounts are valid.
    #[error("invalid amount: {0}")]
    InvalidAmount(i64),

    /// The debit leg would drive the balance below zero; nothing was written.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: i64, available: i64 },

    /// The credited balance would exceed the representable range.
    #[error("balance overflow")]
    BalanceOverflow,

    /// Retries against concurrent writers were exhausted; the operation did
    /// not apply and is safe to retry whole.
    #[error("concurrent modification: balance update retries exhausted")]
    ConcurrentModification,

    #[error(transparent)]
    Currency(#[from] CurrencyError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
