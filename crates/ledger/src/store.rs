//! Account store: the transactional core.
//!
//! Locking discipline:
//! - the account directory is an `RwLock`, written only by account creation;
//! - each balance has its own `Mutex`, held across check + mutate + append;
//! - transfers take both balance locks in ascending account-name order, so two
//!   opposite transfers can never wait on each other;
//! - a transfer to oneself takes that account's lock once;
//! - records are appended while the balance locks are still held.

use std::collections::BTreeMap;
use std::sync::{Arc, MutexGuard, PoisonError, RwLock};

use bankledger_auth::{CredentialLookup, CredentialVerifier, Pin, PlaintextPinVerifier, StoredCredential};
use bankledger_core::{AccountName, LedgerError, LedgerResult, Money};

use crate::account::{Account, AccountCell};
use crate::record::{NewRecord, TransactionRecord};
use crate::recorder::TransactionRecorder;

/// Balances after a successful transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    pub sender_balance: Money,
    pub recipient_balance: Money,
}

/// In-memory ledger: accounts plus the transaction log.
///
/// Share it as `Arc<LedgerStore>`; every operation takes `&self`.
pub struct LedgerStore {
    accounts: RwLock<BTreeMap<AccountName, Arc<AccountCell>>>,
    recorder: TransactionRecorder,
    verifier: Arc<dyn CredentialVerifier>,
}

impl LedgerStore {
    /// Accounts present at process start: `(name, pin, balance in cents)`.
    pub const SEED_ACCOUNTS: [(&'static str, &'static str, i64); 2] =
        [("alice", "1234", 100_000), ("bob", "5678", 50_000)];

    /// Empty store with plaintext PIN comparison.
    pub fn new() -> Self {
        Self::with_verifier(Arc::new(PlaintextPinVerifier))
    }

    pub fn with_verifier(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            accounts: RwLock::new(BTreeMap::new()),
            recorder: TransactionRecorder::new(),
            verifier,
        }
    }

    /// Store holding the bootstrap accounts.
    pub fn seeded() -> LedgerResult<Self> {
        let store = Self::new();
        store.seed_defaults()?;
        Ok(store)
    }

    /// Create the bootstrap accounts; ones that already exist are left alone.
    pub fn seed_defaults(&self) -> LedgerResult<()> {
        for (name, pin, cents) in Self::SEED_ACCOUNTS {
            match self.create_account(name, pin, Money::from_cents(cents)) {
                Ok(_) | Err(LedgerError::Conflict(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    pub fn create_account(&self, name: &str, pin: &str, initial_balance: Money) -> LedgerResult<Account> {
        let name = AccountName::parse(name)?;
        let pin = Pin::parse(pin)?;
        if initial_balance.is_negative() {
            return Err(LedgerError::validation("initial balance must not be negative"));
        }

        let cell = Arc::new(AccountCell::new(
            name.clone(),
            self.verifier.enroll(&pin),
            initial_balance,
        ));

        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        if accounts.contains_key(&name) {
            tracing::debug!(account = %name, "account creation rejected: name taken");
            return Err(LedgerError::conflict(format!(
                "account with name '{name}' already exists"
            )));
        }
        accounts.insert(name.clone(), cell.clone());
        drop(accounts);

        tracing::info!(account = %name, balance = %initial_balance, "account created");
        Ok(cell.view(initial_balance))
    }

    pub fn get_account(&self, name: &str) -> LedgerResult<Account> {
        let cell = self.require(name)?;
        let balance = *cell.lock();
        Ok(cell.view(balance))
    }

    /// Credit `amount`; returns the new balance.
    pub fn deposit(&self, name: &str, amount: Money) -> LedgerResult<Money> {
        ensure_positive(amount)?;
        let cell = self.require(name)?;

        let mut balance = cell.lock();
        let updated = balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::validation("deposit would overflow the balance"))?;
        *balance = updated;
        self.recorder.append(NewRecord::deposit(cell.name.clone(), amount));
        drop(balance);

        tracing::info!(account = %cell.name, amount = %amount, balance = %updated, "deposit");
        Ok(updated)
    }

    /// Debit `amount`; returns the new balance.
    pub fn withdraw(&self, name: &str, amount: Money) -> LedgerResult<Money> {
        ensure_positive(amount)?;
        let cell = self.require(name)?;

        let mut balance = cell.lock();
        let updated = debit(*balance, amount)?;
        *balance = updated;
        self.recorder.append(NewRecord::withdraw(cell.name.clone(), amount));
        drop(balance);

        tracing::info!(account = %cell.name, amount = %amount, balance = %updated, "withdraw");
        Ok(updated)
    }

    /// Move `amount` from `sender` to `recipient`, appending the linked
    /// `transfer_out`/`transfer_in` pair. All-or-nothing.
    ///
    /// Sending to oneself needs the same funds, leaves the balance as it was
    /// and still records the pair.
    pub fn transfer(
        &self,
        sender: &str,
        sender_pin: &str,
        recipient: &str,
        amount: Money,
    ) -> LedgerResult<TransferReceipt> {
        ensure_positive(amount)?;

        let from = self.lookup(sender).ok_or(LedgerError::Unauthorized)?;
        if !self.verifier.verify(&from.credential, sender_pin) {
            tracing::debug!(account = %from.name, "transfer rejected: bad credentials");
            return Err(LedgerError::Unauthorized);
        }
        let to = self.require(recipient)?;
        if Arc::ptr_eq(&from, &to) {
            return self.transfer_to_self(&from, amount);
        }

        let (mut from_balance, mut to_balance) = lock_pair(&from, &to);

        let from_updated = debit(*from_balance, amount)?;
        let to_updated = to_balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::validation("transfer would overflow the recipient balance"))?;

        *from_balance = from_updated;
        *to_balance = to_updated;
        let (out, incoming) = NewRecord::transfer_pair(from.name.clone(), to.name.clone(), amount);
        self.recorder.append_pair(out, incoming);
        drop(to_balance);
        drop(from_balance);

        tracing::info!(
            sender = %from.name,
            recipient = %to.name,
            amount = %amount,
            "transfer"
        );
        Ok(TransferReceipt {
            sender_balance: from_updated,
            recipient_balance: to_updated,
        })
    }

    fn transfer_to_self(&self, cell: &AccountCell, amount: Money) -> LedgerResult<TransferReceipt> {
        let balance = cell.lock();
        debit(*balance, amount)?;
        let (out, incoming) = NewRecord::transfer_pair(cell.name.clone(), cell.name.clone(), amount);
        self.recorder.append_pair(out, incoming);
        let unchanged = *balance;
        drop(balance);

        tracing::info!(sender = %cell.name, recipient = %cell.name, amount = %amount, "transfer");
        Ok(TransferReceipt {
            sender_balance: unchanged,
            recipient_balance: unchanged,
        })
    }

    /// Records owned by or linked to `name`, in append order.
    pub fn history(&self, name: &str) -> LedgerResult<Vec<TransactionRecord>> {
        self.require(name)?;
        Ok(self.recorder.history(name))
    }

    /// Every account, ordered by name, read under all balance locks at once.
    pub fn snapshot(&self) -> Vec<Account> {
        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        let guards: Vec<(&Arc<AccountCell>, MutexGuard<'_, Money>)> =
            accounts.values().map(|cell| (cell, cell.lock())).collect();
        guards
            .iter()
            .map(|(cell, balance)| cell.view(**balance))
            .collect()
    }

    /// The whole log, in append order.
    pub fn transactions(&self) -> Vec<TransactionRecord> {
        self.recorder.all()
    }

    pub fn transaction_count(&self) -> usize {
        self.recorder.len()
    }

    fn lookup(&self, name: &str) -> Option<Arc<AccountCell>> {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn require(&self, name: &str) -> LedgerResult<Arc<AccountCell>> {
        self.lookup(name).ok_or_else(|| LedgerError::not_found(name))
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LedgerStore")
            .field("recorder", &self.recorder)
            .finish_non_exhaustive()
    }
}

impl CredentialLookup for LedgerStore {
    fn stored_credential(&self, name: &str) -> Option<StoredCredential> {
        self.lookup(name).map(|cell| cell.credential.clone())
    }
}

fn ensure_positive(amount: Money) -> LedgerResult<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(LedgerError::validation("amount must be greater than zero"))
    }
}

fn debit(balance: Money, amount: Money) -> LedgerResult<Money> {
    if balance < amount {
        return Err(LedgerError::insufficient_funds(balance, amount));
    }
    balance
        .checked_sub(amount)
        .ok_or_else(|| LedgerError::insufficient_funds(balance, amount))
}

/// Lock two distinct accounts in name order; returns `(a, b)` guards in
/// argument order.
fn lock_pair<'a>(
    a: &'a AccountCell,
    b: &'a AccountCell,
) -> (MutexGuard<'a, Money>, MutexGuard<'a, Money>) {
    if a.name < b.name {
        let first = a.lock();
        let second = b.lock();
        (first, second)
    } else {
        let first = b.lock();
        let second = a.lock();
        (second, first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransactionKind;
    use proptest::prelude::*;

    fn cents(v: i64) -> Money {
        Money::from_cents(v)
    }

    fn seeded() -> LedgerStore {
        LedgerStore::seeded().unwrap()
    }

    #[test]
    fn seeded_store_has_alice_and_bob() {
        let store = seeded();
        assert_eq!(store.get_account("alice").unwrap().balance, cents(100_000));
        assert_eq!(store.get_account("bob").unwrap().balance, cents(50_000));
        assert_eq!(store.transaction_count(), 0);

        // Seeding again is a no-op.
        store.seed_defaults().unwrap();
        assert_eq!(store.snapshot().len(), 2);
    }

    #[test]
    fn create_account_validates_and_rejects_duplicates() {
        let store = seeded();

        let carol = store.create_account("carol", "0042", cents(2_500)).unwrap();
        assert_eq!(carol.balance, cents(2_500));
        assert_eq!(store.get_account("carol").unwrap(), carol);

        assert!(matches!(
            store.create_account("alice", "9999", Money::ZERO),
            Err(LedgerError::Conflict(_))
        ));
        assert!(matches!(
            store.create_account("dave", "12a4", Money::ZERO),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            store.create_account("dave", "1234", cents(-1)),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            store.create_account("  ", "1234", Money::ZERO),
            Err(LedgerError::Validation(_))
        ));
        assert!(store.get_account("dave").is_err());
    }

    #[test]
    fn unknown_account_is_not_found() {
        let store = seeded();
        assert!(matches!(store.get_account("zed"), Err(LedgerError::NotFound(n)) if n == "zed"));
        assert!(matches!(store.deposit("zed", cents(1)), Err(LedgerError::NotFound(_))));
        assert!(matches!(store.withdraw("zed", cents(1)), Err(LedgerError::NotFound(_))));
        assert!(matches!(store.history("zed"), Err(LedgerError::NotFound(_))));
        assert!(matches!(store.get_account(""), Err(LedgerError::NotFound(_))));
    }

    #[test]
    fn deposit_credits_and_records() {
        let store = seeded();
        let balance = store.deposit("alice", cents(20_000)).unwrap();

        assert_eq!(balance, cents(120_000));
        assert_eq!(store.get_account("alice").unwrap().balance, cents(120_000));

        let history = store.history("alice").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, TransactionKind::Deposit);
        assert_eq!(history[0].amount, cents(20_000));
        assert_eq!(history[0].linked_account, None);
    }

    #[test]
    fn non_positive_amounts_are_rejected_without_records() {
        let store = seeded();
        for amount in [Money::ZERO, cents(-100)] {
            assert!(matches!(store.deposit("alice", amount), Err(LedgerError::Validation(_))));
            assert!(matches!(store.withdraw("alice", amount), Err(LedgerError::Validation(_))));
            assert!(matches!(
                store.transfer("alice", "1234", "bob", amount),
                Err(LedgerError::Validation(_))
            ));
        }
        assert_eq!(store.transaction_count(), 0);
        assert_eq!(store.get_account("alice").unwrap().balance, cents(100_000));
    }

    #[test]
    fn overdraft_is_rejected_and_leaves_no_trace() {
        let store = seeded();
        store.deposit("alice", cents(20_000)).unwrap();

        let err = store.withdraw("alice", cents(130_000)).unwrap_err();
        assert_eq!(err, LedgerError::insufficient_funds(cents(120_000), cents(130_000)));
        assert_eq!(store.get_account("alice").unwrap().balance, cents(120_000));
        assert_eq!(store.transaction_count(), 1);

        // Withdrawing the whole balance is allowed.
        assert_eq!(store.withdraw("alice", cents(120_000)).unwrap(), Money::ZERO);
    }

    #[test]
    fn transfer_moves_funds_and_records_linked_pair() {
        let store = seeded();
        store.deposit("alice", cents(20_000)).unwrap();

        let receipt = store.transfer("alice", "1234", "bob", cents(30_000)).unwrap();
        assert_eq!(receipt.sender_balance, cents(90_000));
        assert_eq!(receipt.recipient_balance, cents(80_000));

        let log = store.transactions();
        assert_eq!(log.len(), 3);
        let out = &log[1];
        let incoming = &log[2];
        assert_eq!(out.kind, TransactionKind::TransferOut);
        assert_eq!(out.account_name, "alice");
        assert_eq!(out.linked_account.as_ref().unwrap(), "bob");
        assert_eq!(incoming.kind, TransactionKind::TransferIn);
        assert_eq!(incoming.account_name, "bob");
        assert_eq!(incoming.linked_account.as_ref().unwrap(), "alice");
        assert!(out.mirrors(incoming));

        // Bob sees the transfer but not Alice's deposit.
        let bob = store.history("bob").unwrap();
        assert!(bob.iter().any(|r| r.kind == TransactionKind::TransferIn && r.account_name == "bob"));
        assert!(bob.iter().all(|r| r.kind != TransactionKind::Deposit));
    }

    #[test]
    fn rejected_transfers_change_nothing() {
        let store = seeded();
        let before = store.snapshot();

        assert_eq!(
            store.transfer("alice", "0000", "bob", cents(100)),
            Err(LedgerError::Unauthorized)
        );
        assert_eq!(
            store.transfer("mallory", "1234", "bob", cents(100)),
            Err(LedgerError::Unauthorized)
        );
        assert!(matches!(
            store.transfer("alice", "1234", "nobody", cents(100)),
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            store.transfer("alice", "1234", "bob", cents(100_001)),
            Err(LedgerError::InsufficientFunds { .. })
        ));
        assert!(matches!(
            store.transfer("alice", "1234", "alice", cents(100_001)),
            Err(LedgerError::InsufficientFunds { .. })
        ));
        assert_eq!(
            store.transfer("alice", "0000", "alice", cents(100)),
            Err(LedgerError::Unauthorized)
        );

        assert_eq!(store.snapshot(), before);
        assert_eq!(store.transaction_count(), 0);
    }

    #[test]
    fn self_transfer_records_pair_without_moving_funds() {
        let store = seeded();

        let receipt = store.transfer("alice", "1234", "alice", cents(100_000)).unwrap();
        assert_eq!(receipt.sender_balance, cents(100_000));
        assert_eq!(receipt.recipient_balance, cents(100_000));
        assert_eq!(store.get_account("alice").unwrap().balance, cents(100_000));

        let log = store.history("alice").unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].kind, TransactionKind::TransferOut);
        assert_eq!(log[1].kind, TransactionKind::TransferIn);
        assert!(log.iter().all(|r| r.account_name == "alice"));
        assert!(log.iter().all(|r| r.linked_account.as_ref().unwrap() == "alice"));
        assert!(log[0].mirrors(&log[1]));
    }

    #[test]
    fn transfer_checks_credentials_before_recipient() {
        let store = seeded();
        assert_eq!(
            store.transfer("alice", "0000", "nobody", cents(100)),
            Err(LedgerError::Unauthorized)
        );
    }

    #[test]
    fn reads_are_idempotent() {
        let store = seeded();
        store.transfer("bob", "5678", "alice", cents(1_234)).unwrap();

        assert_eq!(store.get_account("bob").unwrap(), store.get_account("bob").unwrap());
        assert_eq!(store.history("bob").unwrap(), store.history("bob").unwrap());
    }

    #[test]
    fn credential_lookup_exposes_enrolled_pin_only_to_verifier() {
        let store = seeded();
        let stored = store.stored_credential("alice").unwrap();
        assert!(PlaintextPinVerifier.verify(&stored, "1234"));
        assert!(store.stored_credential("zed").is_none());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Deposit(usize, i64),
        Withdraw(usize, i64),
        Transfer(usize, usize, i64, bool),
    }

    const NAMES: [&str; 3] = ["alice", "bob", "carol"];
    const PINS: [&str; 3] = ["1234", "5678", "0000"];

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..3usize, -50i64..50_000).prop_map(|(a, v)| Op::Deposit(a, v)),
            (0..3usize, -50i64..200_000).prop_map(|(a, v)| Op::Withdraw(a, v)),
            (0..3usize, 0..3usize, -50i64..200_000, any::<bool>())
                .prop_map(|(a, b, v, pin_ok)| Op::Transfer(a, b, v, pin_ok)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: no sequence of operations drives a balance negative,
        /// failures append nothing, and transfer halves always pair up.
        /// Transfers may name the same account on both sides.
        #[test]
        fn balances_stay_non_negative_and_transfers_pair_up(
            ops in prop::collection::vec(op_strategy(), 1..60)
        ) {
            let store = seeded();
            store.create_account("carol", "0000", Money::ZERO).unwrap();

            for op in ops {
                let before = store.transaction_count();
                let (result, expected_records) = match op {
                    Op::Deposit(a, v) => (store.deposit(NAMES[a], cents(v)).map(|_| ()), 1),
                    Op::Withdraw(a, v) => (store.withdraw(NAMES[a], cents(v)).map(|_| ()), 1),
                    Op::Transfer(a, b, v, pin_ok) => {
                        let pin = if pin_ok { PINS[a] } else { "9999" };
                        (store.transfer(NAMES[a], pin, NAMES[b], cents(v)).map(|_| ()), 2)
                    }
                };
                let appended = store.transaction_count() - before;
                if result.is_ok() {
                    prop_assert_eq!(appended, expected_records);
                } else {
                    prop_assert_eq!(appended, 0);
                }

                for account in store.snapshot() {
                    prop_assert!(!account.balance.is_negative());
                }
            }

            let log = store.transactions();
            prop_assert!(log.iter().all(|r| r.amount.is_positive()));
            for (idx, record) in log.iter().enumerate() {
                match record.kind {
                    TransactionKind::TransferOut => {
                        prop_assert!(log.get(idx + 1).is_some_and(|next| record.mirrors(next)));
                    }
                    TransactionKind::TransferIn => {
                        prop_assert!(idx > 0 && record.mirrors(&log[idx - 1]));
                    }
                    _ => {
                        prop_assert!(record.linked_account.is_none());
                    }
                }
            }

            // Replaying the log from the seed balances reproduces every balance.
            let mut replayed: BTreeMap<String, i64> = BTreeMap::from([
                ("alice".to_string(), 100_000),
                ("bob".to_string(), 50_000),
                ("carol".to_string(), 0),
            ]);
            for record in &log {
                let entry = replayed.get_mut(record.account_name.as_str()).unwrap();
                match record.kind {
                    TransactionKind::Deposit | TransactionKind::TransferIn => *entry += record.amount.cents(),
                    TransactionKind::Withdraw | TransactionKind::TransferOut => *entry -= record.amount.cents(),
                }
            }
            for account in store.snapshot() {
                prop_assert_eq!(replayed[account.name.as_str()], account.balance.cents());
            }
        }
    }
}
