//! `simbank-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers and the balance-state vocabulary shared by the
//! currency, store and ledger layers.

pub mod error;
pub mod id;
pub mod state;

pub use error::{DomainError, DomainResult};
pub use id::AccountId;
pub use state::BalanceState;
