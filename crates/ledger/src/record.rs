use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bankledger_core::{AccountName, Money, TransactionId};

/// Kind of balance-affecting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    TransferOut,
    TransferIn,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
            TransactionKind::TransferOut => "transfer_out",
            TransactionKind::TransferIn => "transfer_in",
        }
    }

    pub fn is_transfer(self) -> bool {
        matches!(self, TransactionKind::TransferOut | TransactionKind::TransferIn)
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record status. Only `Completed` is produced today: rejected operations
/// leave no record at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Completed,
    Pending,
    Failed,
}

/// Immutable log entry (one per affected account).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: TransactionId,
    pub account_name: AccountName,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Always positive.
    pub amount: Money,
    pub timestamp: DateTime<Utc>,
    /// Counterparty; set only for transfer kinds.
    pub linked_account: Option<AccountName>,
    pub status: TransactionStatus,
}

impl TransactionRecord {
    /// True if `name` owns the record or is its counterparty.
    pub fn involves(&self, name: &str) -> bool {
        self.account_name == name
            || self
                .linked_account
                .as_ref()
                .is_some_and(|linked| linked == name)
    }

    /// True if `other` is the mirrored half of the same transfer.
    pub fn mirrors(&self, other: &TransactionRecord) -> bool {
        let kinds_pair = matches!(
            (self.kind, other.kind),
            (TransactionKind::TransferOut, TransactionKind::TransferIn)
                | (TransactionKind::TransferIn, TransactionKind::TransferOut)
        );
        kinds_pair
            && self.amount == other.amount
            && self.linked_account.as_ref() == Some(&other.account_name)
            && other.linked_account.as_ref() == Some(&self.account_name)
    }
}

/// A record that has not been appended yet.
///
/// The recorder fills in `transaction_id` and `timestamp` when they are unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub transaction_id: Option<TransactionId>,
    pub account_name: AccountName,
    pub kind: TransactionKind,
    pub amount: Money,
    pub timestamp: Option<DateTime<Utc>>,
    pub linked_account: Option<AccountName>,
}

impl NewRecord {
    fn new(account_name: AccountName, kind: TransactionKind, amount: Money) -> Self {
        Self {
            transaction_id: None,
            account_name,
            kind,
            amount,
            timestamp: None,
            linked_account: None,
        }
    }

    pub fn deposit(account_name: AccountName, amount: Money) -> Self {
        Self::new(account_name, TransactionKind::Deposit, amount)
    }

    pub fn withdraw(account_name: AccountName, amount: Money) -> Self {
        Self::new(account_name, TransactionKind::Withdraw, amount)
    }

    /// Both halves of a transfer: `(transfer_out on sender, transfer_in on recipient)`.
    pub fn transfer_pair(sender: AccountName, recipient: AccountName, amount: Money) -> (Self, Self) {
        let mut out = Self::new(sender.clone(), TransactionKind::TransferOut, amount);
        out.linked_account = Some(recipient.clone());

        let mut incoming = Self::new(recipient, TransactionKind::TransferIn, amount);
        incoming.linked_account = Some(sender);

        (out, incoming)
    }

    pub(crate) fn into_record(self, now: DateTime<Utc>) -> TransactionRecord {
        TransactionRecord {
            transaction_id: self.transaction_id.unwrap_or_default(),
            account_name: self.account_name,
            kind: self.kind,
            amount: self.amount,
            timestamp: self.timestamp.unwrap_or(now),
            linked_account: self.linked_account,
            status: TransactionStatus::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> AccountName {
        AccountName::parse(s).unwrap()
    }

    #[test]
    fn transfer_pair_mirrors_accounts() {
        let (out, incoming) = NewRecord::transfer_pair(name("alice"), name("bob"), Money::from_cents(300));
        let now = Utc::now();
        let out = out.into_record(now);
        let incoming = incoming.into_record(now);

        assert_eq!(out.kind, TransactionKind::TransferOut);
        assert_eq!(out.linked_account, Some(name("bob")));
        assert_eq!(incoming.kind, TransactionKind::TransferIn);
        assert_eq!(incoming.linked_account, Some(name("alice")));
        assert!(out.mirrors(&incoming));
        assert!(incoming.mirrors(&out));
        assert_ne!(out.transaction_id, incoming.transaction_id);
    }

    #[test]
    fn involves_matches_owner_or_counterparty() {
        let (out, _) = NewRecord::transfer_pair(name("alice"), name("bob"), Money::from_cents(1));
        let out = out.into_record(Utc::now());
        assert!(out.involves("alice"));
        assert!(out.involves("bob"));
        assert!(!out.involves("carol"));

        let deposit = NewRecord::deposit(name("alice"), Money::from_cents(1)).into_record(Utc::now());
        assert!(!deposit.involves("bob"));
    }

    #[test]
    fn preset_id_and_timestamp_are_kept() {
        let id = TransactionId::new();
        let at = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut new = NewRecord::withdraw(name("bob"), Money::from_cents(10));
        new.transaction_id = Some(id);
        new.timestamp = Some(at);

        let record = new.into_record(Utc::now());
        assert_eq!(record.transaction_id, id);
        assert_eq!(record.timestamp, at);
        assert_eq!(record.status, TransactionStatus::Completed);
    }

    #[test]
    fn record_json_uses_wire_names() {
        let record = NewRecord::deposit(name("alice"), Money::from_cents(20_000)).into_record(Utc::now());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["type"], "deposit");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["account_name"], "alice");
        assert_eq!(json["amount"], 200.0);
        assert!(json["linked_account"].is_null());
    }
}
