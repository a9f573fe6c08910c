//! `simbank-store` — durable key-value persistence for ledger balances.
//!
//! One integer amount lives under each (account, currency, state) key. The
//! store offers no multi-key transactions; its single atomicity primitive is
//! the revision-checked put, which the ledger layer builds its
//! read-modify-write loop on.

pub mod in_memory;
pub mod key;
#[cfg(feature = "sqlite")]
pub mod sqlite;
mod store;

pub use in_memory::InMemoryBalanceStore;
pub use key::BalanceKey;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBalanceStore;
pub use store::{BalanceStore, ExpectedRevision, StoreError, VersionedAmount};
