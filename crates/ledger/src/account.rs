use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

use bankledger_auth::StoredCredential;
use bankledger_core::{AccountName, Money};

/// Point-in-time view of an account. Never exposes the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub name: AccountName,
    pub balance: Money,
    pub created_at: DateTime<Utc>,
}

/// Store-owned account state.
///
/// Name, credential and creation time never change; the balance is the only
/// mutable part and lives behind its own lock.
#[derive(Debug)]
pub(crate) struct AccountCell {
    pub(crate) name: AccountName,
    pub(crate) credential: StoredCredential,
    pub(crate) created_at: DateTime<Utc>,
    balance: Mutex<Money>,
}

impl AccountCell {
    pub(crate) fn new(name: AccountName, credential: StoredCredential, balance: Money) -> Self {
        Self {
            name,
            credential,
            created_at: Utc::now(),
            balance: Mutex::new(balance),
        }
    }

    /// Exclusive access to the balance.
    ///
    /// Critical sections run every check before the first write, so a
    /// poisoned lock still guards a consistent value.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Money> {
        self.balance.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn view(&self, balance: Money) -> Account {
        Account {
            name: self.name.clone(),
            balance,
            created_at: self.created_at,
        }
    }
}
