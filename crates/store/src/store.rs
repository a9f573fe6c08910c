//! The `BalanceStore` trait and its supporting types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::key::BalanceKey;

/// A stored amount together with the revision the store assigned to it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedAmount {
    /// Amount in the currency's minor unit.
    pub amount: i64,
    /// Store-assigned revision: 1 for the first put of a key, +1 per put after.
    pub revision: u64,
}

/// Optimistic concurrency expectation for a put.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedRevision {
    /// Skip the revision check (blind write).
    Any,
    /// Require that no entry exists under the key yet.
    NoEntry,
    /// Require the entry to be at an exact revision.
    Exact(u64),
}

impl ExpectedRevision {
    pub fn matches(self, current: Option<u64>) -> bool {
        match self {
            ExpectedRevision::Any => true,
            ExpectedRevision::NoEntry => current.is_none(),
            ExpectedRevision::Exact(revision) => current == Some(revision),
        }
    }
}

/// Store operation error.
///
/// These are **persistence errors** (revision conflicts, backend failures) as
/// opposed to domain errors (insufficient funds, unknown currencies), which
/// live in the ledger layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The revision check of a put failed; nothing was written.
    #[error("revision check failed: expected {expected:?}, found {found:?}")]
    RevisionMismatch {
        expected: ExpectedRevision,
        found: Option<u64>,
    },

    /// The underlying medium failed (IO, poisoned lock, SQL error).
    #[error("storage backend failure: {0}")]
    Backend(String),

    /// A stored value could not be decoded.
    #[error("stored value is corrupt: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn is_revision_mismatch(&self) -> bool {
        matches!(self, StoreError::RevisionMismatch { .. })
    }
}

/// Durable key-value persistence for ledger balances.
///
/// ## Contract
///
/// - `get` returns the current amount and revision, or `None` for a key that
///   was never written.
/// - `put` writes `amount` under `key` iff the key's current revision matches
///   `expected`, then returns the new revision. On a mismatch it writes
///   nothing and fails with [`StoreError::RevisionMismatch`]. Each put is
///   all-or-nothing per key.
/// - Implementations must make the check-and-write of `put` atomic with
///   respect to concurrent puts on the same key; this is the only
///   synchronization point the ledger layer relies on.
pub trait BalanceStore: Send + Sync {
    fn get(&self, key: &BalanceKey) -> Result<Option<VersionedAmount>, StoreError>;

    fn put(
        &self,
        key: &BalanceKey,
        amount: i64,
        expected: ExpectedRevision,
    ) -> Result<u64, StoreError>;
}

impl<S> BalanceStore for Arc<S>
where
    S: BalanceStore + ?Sized,
{
    fn get(&self, key: &BalanceKey) -> Result<Option<VersionedAmount>, StoreError> {
        (**self).get(key)
    }

    fn put(
        &self,
        key: &BalanceKey,
        amount: i64,
        expected: ExpectedRevision,
    ) -> Result<u64, StoreError> {
        (**self).put(key, amount, expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_revision_matching() {
        assert!(ExpectedRevision::Any.matches(None));
        assert!(ExpectedRevision::Any.matches(Some(7)));
        assert!(ExpectedRevision::NoEntry.matches(None));
        assert!(!ExpectedRevision::NoEntry.matches(Some(1)));
        assert!(ExpectedRevision::Exact(3).matches(Some(3)));
        assert!(!ExpectedRevision::Exact(3).matches(Some(4)));
        assert!(!ExpectedRevision::Exact(3).matches(None));
    }
}
