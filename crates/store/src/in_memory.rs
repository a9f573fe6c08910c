//! In-memory balance store for tests and development.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::key::BalanceKey;
use crate::store::{BalanceStore, ExpectedRevision, StoreError, VersionedAmount};

/// In-memory [`BalanceStore`].
///
/// Intended for tests/dev. The revision check runs under the same write lock
/// as the insert, so the CAS contract holds under concurrent callers.
#[derive(Debug, Default)]
pub struct InMemoryBalanceStore {
    entries: RwLock<HashMap<BalanceKey, VersionedAmount>>,
}

impl InMemoryBalanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys ever written. Test helper.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BalanceStore for InMemoryBalanceStore {
    fn get(&self, key: &BalanceKey) -> Result<Option<VersionedAmount>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        Ok(entries.get(key).copied())
    }

    fn put(
        &self,
        key: &BalanceKey,
        amount: i64,
        expected: ExpectedRevision,
    ) -> Result<u64, StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        let current = entries.get(key).map(|v| v.revision);
        if !expected.matches(current) {
            return Err(StoreError::RevisionMismatch {
                expected,
                found: current,
            });
        }

        let revision = current.unwrap_or(0) + 1;
        entries.insert(key.clone(), VersionedAmount { amount, revision });
        Ok(revision)
    }
}
