//! The domain-facing ledger API.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use simbank_core::{AccountId, BalanceState};
use simbank_currency::{CurrencyCode, CurrencyRegistry, UnitKind};
use simbank_store::{BalanceKey, BalanceStore, ExpectedRevision, StoreError};

use crate::account::{AccountSnapshot, Funds};
use crate::error::{LedgerError, LedgerResult};

/// How many times a balance mutation retries against concurrent writers
/// before giving up with `ConcurrentModification`.
const MAX_UPDATE_RETRIES: u32 = 32;

/// Account ledger of one issuing institution.
///
/// Holds the currency registry (immutable after startup) and the balance
/// store, which is already scoped to the institution's bucket. The store's
/// revision-checked put is the only synchronization point: every mutation
/// goes through [`Ledger::update_balance`], a bounded compare-and-set loop,
/// so no sequence of operations can lose an update or drive a balance
/// negative.
pub struct Ledger {
    registry: CurrencyRegistry,
    store: Arc<dyn BalanceStore>,
}

impl Ledger {
    pub fn new(registry: CurrencyRegistry, store: Arc<dyn BalanceStore>) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &CurrencyRegistry {
        &self.registry
    }

    /// Open an account: one zeroed entry per (currency, state) pair.
    ///
    /// Creation is not idempotent by design: if any entry already exists the
    /// whole operation fails with [`LedgerError::AccountExists`] and no
    /// balance is ever reset. A creation aborted mid-way by a store failure
    /// leaves a partially-initialized account; retrying surfaces
    /// `AccountExists`, so callers should treat that as "already mine" only
    /// when they know they created it.
    pub fn create_account(&self, id: AccountId) -> LedgerResult<AccountSnapshot> {
        if id.is_nil() {
            return Err(LedgerError::InvalidAccount);
        }

        for currency in self.registry.iter() {
            for state in BalanceState::ALL {
                let key = BalanceKey::new(id, currency.code().clone(), state);
                match self.store.put(&key, 0, ExpectedRevision::NoEntry) {
                    Ok(_) => {}
                    Err(StoreError::RevisionMismatch { .. }) => {
                        return Err(LedgerError::AccountExists(id));
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }

        debug!(account = %id, "account created");
        self.account(id)
    }

    /// Point-in-time snapshot of every currency's balances.
    ///
    /// Any failing per-currency read aborts the whole snapshot.
    pub fn account(&self, id: AccountId) -> LedgerResult<AccountSnapshot> {
        if id.is_nil() {
            return Err(LedgerError::InvalidAccount);
        }

        let mut funds = BTreeMap::new();
        for currency in self.registry.iter() {
            let code = currency.code().clone();
            let available = self.read(id, &code, BalanceState::Available)?;
            let on_hold = self.read(id, &code, BalanceState::OnHold)?;
            let major_ratio = currency.unit(UnitKind::Major)?.minor_ratio;

            funds.insert(
                code.clone(),
                Funds {
                    currency: code,
                    available_minor: available,
                    on_hold_minor: on_hold,
                    total_minor: available + on_hold,
                    available_major: available / major_ratio,
                    on_hold_major: on_hold / major_ratio,
                    total_major: (available + on_hold) / major_ratio,
                },
            );
        }

        Ok(AccountSnapshot {
            id,
            as_of: Utc::now(),
            funds,
        })
    }

    /// Credit `amount` of `kind` units to the account's available balance.
    ///
    /// This is the only operation that brings funds into the system; it is
    /// administrative and does not debit anyone. Returns the refreshed
    /// snapshot.
    pub fn deposit(
        &self,
        id: AccountId,
        code: &CurrencyCode,
        kind: UnitKind,
        amount: i64,
    ) -> LedgerResult<AccountSnapshot> {
        if id.is_nil() {
            return Err(LedgerError::InvalidAccount);
        }
        if amount < 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let minor = self.registry.lookup(code)?.to_minor(kind, amount)?;
        let key = BalanceKey::new(id, code.clone(), BalanceState::Available);
        self.update_balance(&key, |current| {
            let current = current.ok_or(LedgerError::UnknownAccount(id))?;
            current.checked_add(minor).ok_or(LedgerError::BalanceOverflow)
        })?;

        debug!(account = %id, currency = %code, minor, "deposit applied");
        self.account(id)
    }

    /// Move `amount_minor` from one account to another.
    ///
    /// The debit leg comes out of `from`'s available or on-hold balance
    /// (chosen by `from_on_hold`); the credit leg always lands in `to`'s
    /// available balance. Fails with `InsufficientFunds` before any write if
    /// the source balance is too small.
    pub fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        code: &CurrencyCode,
        amount_minor: i64,
        from_on_hold: bool,
    ) -> LedgerResult<()> {
        if from.is_nil() || to.is_nil() {
            return Err(LedgerError::InvalidAccount);
        }
        if amount_minor < 0 {
            return Err(LedgerError::InvalidAmount(amount_minor));
        }
        self.registry.lookup(code)?;

        let source_state = if from_on_hold {
            BalanceState::OnHold
        } else {
            BalanceState::Available
        };
        let debit_key = BalanceKey::new(from, code.clone(), source_state);
        let credit_key = BalanceKey::new(to, code.clone(), BalanceState::Available);

        // The store has no multi-key transactions, so make sure the credit
        // leg can land before debiting anyone.
        if self.store.get(&credit_key)?.is_none() {
            return Err(LedgerError::UnknownAccount(to));
        }

        self.update_balance(&debit_key, |current| {
            let available = current.ok_or(LedgerError::UnknownAccount(from))?;
            let remainder = available - amount_minor;
            if remainder < 0 {
                return Err(LedgerError::InsufficientFunds {
                    requested: amount_minor,
                    available,
                });
            }
            Ok(remainder)
        })?;

        self.update_balance(&credit_key, |current| {
            let current = current.ok_or(LedgerError::UnknownAccount(to))?;
            current
                .checked_add(amount_minor)
                .ok_or(LedgerError::BalanceOverflow)
        })?;

        debug!(
            from = %from,
            to = %to,
            currency = %code,
            amount_minor,
            from_on_hold,
            "transfer applied"
        );
        Ok(())
    }

    /// Earmark `amount_minor` of the account's available balance.
    ///
    /// A self-transfer between states: available shrinks, on-hold grows by
    /// the same amount, and the account total is unchanged.
    pub fn hold(
        &self,
        id: AccountId,
        code: &CurrencyCode,
        amount_minor: i64,
    ) -> LedgerResult<()> {
        if id.is_nil() {
            return Err(LedgerError::InvalidAccount);
        }
        if amount_minor < 0 {
            return Err(LedgerError::InvalidAmount(amount_minor));
        }
        self.registry.lookup(code)?;

        let available_key = BalanceKey::new(id, code.clone(), BalanceState::Available);
        let on_hold_key = BalanceKey::new(id, code.clone(), BalanceState::OnHold);

        self.update_balance(&available_key, |current| {
            let available = current.ok_or(LedgerError::UnknownAccount(id))?;
            let remainder = available - amount_minor;
            if remainder < 0 {
                return Err(LedgerError::InsufficientFunds {
                    requested: amount_minor,
                    available,
                });
            }
            Ok(remainder)
        })?;

        self.update_balance(&on_hold_key, |current| {
            let current = current.ok_or(LedgerError::UnknownAccount(id))?;
            current
                .checked_add(amount_minor)
                .ok_or(LedgerError::BalanceOverflow)
        })?;

        debug!(account = %id, currency = %code, amount_minor, "hold applied");
        Ok(())
    }

    fn read(&self, id: AccountId, code: &CurrencyCode, state: BalanceState) -> LedgerResult<i64> {
        let key = BalanceKey::new(id, code.clone(), state);
        self.store
            .get(&key)?
            .map(|v| v.amount)
            .ok_or(LedgerError::UnknownAccount(id))
    }

    /// The single primitive every balance mutation flows through.
    ///
    /// Reads the current amount, computes the next one, and writes it with
    /// the revision observed by the read. A concurrent writer invalidates the
    /// revision and the whole read-modify-write repeats; exhaustion surfaces
    /// `ConcurrentModification` with nothing written. A closure error aborts
    /// before any write.
    fn update_balance<F>(&self, key: &BalanceKey, f: F) -> LedgerResult<i64>
    where
        F: Fn(Option<i64>) -> LedgerResult<i64>,
    {
        for _ in 0..MAX_UPDATE_RETRIES {
            let current = self.store.get(key)?;
            let next = f(current.map(|v| v.amount))?;
            let expected = match current {
                Some(v) => ExpectedRevision::Exact(v.revision),
                None => ExpectedRevision::NoEntry,
            };
            match self.store.put(key, next, expected) {
                Ok(_) => return Ok(next),
                Err(StoreError::RevisionMismatch { .. }) => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Err(LedgerError::ConcurrentModification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use simbank_store::InMemoryBalanceStore;
    use uuid::Uuid;

    fn test_ledger() -> Ledger {
        Ledger::new(
            CurrencyRegistry::builtin(),
            Arc::new(InMemoryBalanceStore::new()),
        )
    }

    fn usd() -> CurrencyCode {
        "USD".into()
    }

    fn funded_account(ledger: &Ledger, minor: i64) -> AccountId {
        let id = AccountId::new();
        ledger.create_account(id).unwrap();
        ledger.deposit(id, &usd(), UnitKind::Minor, minor).unwrap();
        id
    }

    #[test]
    fn create_account_zeroes_every_currency() {
        let ledger = test_ledger();
        let snapshot = ledger.create_account(AccountId::new()).unwrap();

        assert_eq!(snapshot.funds.len(), 5);
        for funds in snapshot.funds.values() {
            assert_eq!(funds.available_minor, 0);
            assert_eq!(funds.on_hold_minor, 0);
            assert_eq!(funds.total_minor, 0);
        }
    }

    #[test]
    fn create_account_rejects_the_nil_id() {
        let ledger = test_ledger();
        let err = ledger
            .create_account(AccountId::from_uuid(Uuid::nil()))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAccount));
    }

    #[test]
    fn recreating_an_account_never_resets_balances() {
        let ledger = test_ledger();
        let id = funded_account(&ledger, 500);

        let err = ledger.create_account(id).unwrap_err();
        assert!(matches!(err, LedgerError::AccountExists(existing) if existing == id));

        let snapshot = ledger.account(id).unwrap();
        assert_eq!(snapshot.currency(&usd()).unwrap().available_minor, 500);
    }

    #[test]
    fn snapshot_of_an_unknown_account_fails() {
        let ledger = test_ledger();
        let err = ledger.account(AccountId::new()).unwrap_err();
        assert!(matches!(err, LedgerError::UnknownAccount(_)));
    }

    #[test]
    fn deposit_accumulates_and_reports_major_equivalents() {
        let ledger = test_ledger();
        let id = AccountId::new();
        ledger.create_account(id).unwrap();

        let snapshot = ledger.deposit(id, &usd(), UnitKind::Major, 1_000).unwrap();
        let funds = snapshot.currency(&usd()).unwrap();
        assert_eq!(funds.available_minor, 100_000);
        assert_eq!(funds.available_major, 1_000);

        // A second deposit adds; it never overwrites.
        let snapshot = ledger.deposit(id, &usd(), UnitKind::Major, 50).unwrap();
        let funds = snapshot.currency(&usd()).unwrap();
        assert_eq!(funds.available_minor, 105_000);
        assert_eq!(funds.total_major, 1_050);
    }

    #[test]
    fn jpy_major_figures_use_the_thousand_yen_ratio() {
        let ledger = test_ledger();
        let id = AccountId::new();
        ledger.create_account(id).unwrap();

        let snapshot = ledger
            .deposit(id, &"JPY".into(), UnitKind::Major, 2)
            .unwrap();
        let funds = snapshot.currency(&"JPY".into()).unwrap();
        assert_eq!(funds.available_minor, 200_000);
        assert_eq!(funds.total_major, 2);
    }

    #[test]
    fn deposit_validates_its_inputs() {
        let ledger = test_ledger();
        let id = AccountId::new();
        ledger.create_account(id).unwrap();

        assert!(matches!(
            ledger.deposit(id, &"XAU".into(), UnitKind::Minor, 1).unwrap_err(),
            LedgerError::Currency(_)
        ));
        assert!(matches!(
            ledger.deposit(id, &usd(), UnitKind::Minor, -1).unwrap_err(),
            LedgerError::InvalidAmount(-1)
        ));
        assert!(matches!(
            ledger
                .deposit(AccountId::new(), &usd(), UnitKind::Minor, 1)
                .unwrap_err(),
            LedgerError::UnknownAccount(_)
        ));
    }

    #[test]
    fn hold_moves_available_to_on_hold() {
        let ledger = test_ledger();
        let id = funded_account(&ledger, 100);

        ledger.hold(id, &usd(), 50).unwrap();
        let funds = ledger.account(id).unwrap();
        let funds = funds.currency(&usd()).unwrap();
        assert_eq!(funds.available_minor, 50);
        assert_eq!(funds.on_hold_minor, 50);
        assert_eq!(funds.total_minor, 100);

        // Holding more than remains available fails and touches nothing.
        let err = ledger.hold(id, &usd(), 60).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientFunds {
                requested: 60,
                available: 50
            }
        ));
        let funds = ledger.account(id).unwrap();
        let funds = funds.currency(&usd()).unwrap();
        assert_eq!(funds.available_minor, 50);
        assert_eq!(funds.on_hold_minor, 50);
    }

    #[test]
    fn holds_accumulate_on_hold() {
        let ledger = test_ledger();
        let id = funded_account(&ledger, 100);

        ledger.hold(id, &usd(), 30).unwrap();
        ledger.hold(id, &usd(), 20).unwrap();

        let snapshot = ledger.account(id).unwrap();
        let funds = snapshot.currency(&usd()).unwrap();
        assert_eq!(funds.available_minor, 50);
        assert_eq!(funds.on_hold_minor, 50);
    }

    #[test]
    fn transfer_debits_available_and_credits_available() {
        let ledger = test_ledger();
        let giver = funded_account(&ledger, 100);
        let receiver = funded_account(&ledger, 10);

        ledger.transfer(giver, receiver, &usd(), 40, false).unwrap();

        let giver_funds = ledger.account(giver).unwrap();
        let receiver_funds = ledger.account(receiver).unwrap();
        assert_eq!(giver_funds.currency(&usd()).unwrap().available_minor, 60);
        assert_eq!(receiver_funds.currency(&usd()).unwrap().available_minor, 50);
    }

    #[test]
    fn transfer_from_on_hold_still_credits_available() {
        let ledger = test_ledger();
        let giver = funded_account(&ledger, 100);
        let receiver = funded_account(&ledger, 0);
        ledger.hold(giver, &usd(), 70).unwrap();

        ledger.transfer(giver, receiver, &usd(), 70, true).unwrap();

        let giver_funds = ledger.account(giver).unwrap();
        let giver_funds = giver_funds.currency(&usd()).unwrap();
        assert_eq!(giver_funds.on_hold_minor, 0);
        assert_eq!(giver_funds.available_minor, 30);

        let receiver_funds = ledger.account(receiver).unwrap();
        assert_eq!(
            receiver_funds.currency(&usd()).unwrap().available_minor,
            70
        );
    }

    #[test]
    fn insufficient_transfer_writes_nothing() {
        let ledger = test_ledger();
        let giver = funded_account(&ledger, 30);
        let receiver = funded_account(&ledger, 0);

        let err = ledger
            .transfer(giver, receiver, &usd(), 31, false)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));

        assert_eq!(
            ledger
                .account(giver)
                .unwrap()
                .currency(&usd())
                .unwrap()
                .available_minor,
            30
        );
        assert_eq!(
            ledger
                .account(receiver)
                .unwrap()
                .currency(&usd())
                .unwrap()
                .available_minor,
            0
        );
    }

    #[test]
    fn transfer_to_an_unknown_account_leaves_the_source_untouched() {
        let ledger = test_ledger();
        let giver = funded_account(&ledger, 30);

        let err = ledger
            .transfer(giver, AccountId::new(), &usd(), 10, false)
            .unwrap_err();
        assert!(matches!(err, LedgerError::UnknownAccount(_)));

        assert_eq!(
            ledger
                .account(giver)
                .unwrap()
                .currency(&usd())
                .unwrap()
                .available_minor,
            30
        );
    }

    #[test]
    fn concurrent_deposits_never_lose_updates() {
        let ledger = Arc::new(test_ledger());
        let id = AccountId::new();
        ledger.create_account(id).unwrap();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let ledger = Arc::clone(&ledger);
            handles.push(std::thread::spawn(move || {
                for _ in 0..25 {
                    ledger.deposit(id, &"USD".into(), UnitKind::Minor, 1).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = ledger.account(id).unwrap();
        assert_eq!(snapshot.currency(&usd()).unwrap().available_minor, 100);
    }

    #[test]
    fn concurrent_holds_conserve_the_account_total() {
        let ledger = Arc::new(test_ledger());
        let id = funded_account(&ledger, 100);

        let mut handles = Vec::new();
        for _ in 0..4 {
            let ledger = Arc::clone(&ledger);
            handles.push(std::thread::spawn(move || {
                for _ in 0..25 {
                    ledger.hold(id, &"USD".into(), 1).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = ledger.account(id).unwrap();
        let funds = snapshot.currency(&usd()).unwrap();
        assert_eq!(funds.available_minor, 0);
        assert_eq!(funds.on_hold_minor, 100);
    }

    proptest! {
        /// Conservation: only deposits change the global total; every balance
        /// stays non-negative no matter which operations fail along the way.
        #[test]
        fn random_operation_sequences_conserve_funds(
            ops in prop::collection::vec((0u8..4, 0i64..500, any::<bool>()), 1..40)
        ) {
            let ledger = test_ledger();
            let a = AccountId::new();
            let b = AccountId::new();
            ledger.create_account(a).unwrap();
            ledger.create_account(b).unwrap();

            let mut minted: i64 = 0;
            for (op, amount, flag) in ops {
                let result = match op {
                    0 => ledger.deposit(a, &usd(), UnitKind::Minor, amount).map(|_| ()),
                    1 => ledger.hold(a, &usd(), amount),
                    2 => ledger.transfer(a, b, &usd(), amount, flag),
                    _ => ledger.transfer(b, a, &usd(), amount, false),
                };
                match result {
                    Ok(()) => {
                        if op == 0 {
                            minted += amount;
                        }
                    }
                    Err(LedgerError::InsufficientFunds { .. }) => {}
                    Err(err) => prop_assert!(false, "unexpected error: {err}"),
                }
            }

            let snap_a = ledger.account(a).unwrap();
            let snap_b = ledger.account(b).unwrap();
            let fa = snap_a.currency(&usd()).unwrap();
            let fb = snap_b.currency(&usd()).unwrap();

            prop_assert!(fa.available_minor >= 0 && fa.on_hold_minor >= 0);
            prop_assert!(fb.available_minor >= 0 && fb.on_hold_minor >= 0);
            prop_assert_eq!(fa.total_minor + fb.total_minor, minted);
            // Deposits were USD-only, so the cross-currency totals agree too.
            prop_assert_eq!(snap_a.grand_total_minor() + snap_b.grand_total_minor(), minted);
        }
    }
}
