//! Demo driver for the ledger engine.
//!
//! Runs a short deposit/hold/transfer scenario against one bank and prints
//! the resulting account snapshots as JSON. With a path argument the balances
//! persist to SQLite; without one they live in memory.

use std::sync::Arc;

use anyhow::Result;

use simbank_core::AccountId;
use simbank_currency::{CurrencyCode, CurrencyRegistry, UnitKind};
use simbank_ledger::{BankProfile, Ledger};
use simbank_store::{BalanceStore, InMemoryBalanceStore, SqliteBalanceStore};

fn main() -> Result<()> {
    simbank_observability::init();

    let bank = BankProfile {
        id: 1,
        name: "First Island Bank".to_string(),
        code: "FIB".to_string(),
        country_code: "CA".to_string(),
        home_currencies: vec!["CAD".into()],
    };

    tracing::info!(bucket = %bank.bucket(), "{}", bank.description());

    let store: Arc<dyn BalanceStore> = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(path = %path, "opening sqlite store");
            Arc::new(SqliteBalanceStore::open(&path, bank.bucket())?)
        }
        None => {
            tracing::info!("using in-memory store");
            Arc::new(InMemoryBalanceStore::new())
        }
    };

    let ledger = Ledger::new(CurrencyRegistry::builtin(), store);
    let usd = CurrencyCode::from("USD");

    let alice = AccountId::new();
    let bob = AccountId::new();
    ledger.create_account(alice)?;
    ledger.create_account(bob)?;

    // Seed alice with $1,000, earmark $200, and send bob $50.
    ledger.deposit(alice, &usd, UnitKind::Major, 1_000)?;
    ledger.hold(alice, &usd, 20_000)?;
    ledger.transfer(alice, bob, &usd, 5_000, false)?;

    for id in [alice, bob] {
        let snapshot = ledger.account(id)?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    Ok(())
}
