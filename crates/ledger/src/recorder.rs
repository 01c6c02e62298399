use std::sync::{PoisonError, RwLock};

use chrono::Utc;

use crate::record::{NewRecord, TransactionRecord};

/// Append-only, ordered transaction log.
///
/// Log position is the chronological order: history never re-sorts by
/// timestamp, so clock resolution cannot reorder entries.
#[derive(Debug, Default)]
pub struct TransactionRecorder {
    log: RwLock<Vec<TransactionRecord>>,
}

impl TransactionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record, assigning id and timestamp if unset.
    pub fn append(&self, record: NewRecord) -> TransactionRecord {
        debug_assert!(record.amount.is_positive(), "records carry positive amounts");

        let record = record.into_record(Utc::now());
        let mut log = self.log.write().unwrap_or_else(PoisonError::into_inner);
        log.push(record.clone());
        record
    }

    /// Append both halves of a transfer under a single write lock, so readers
    /// observe either neither or both.
    pub fn append_pair(&self, first: NewRecord, second: NewRecord) -> (TransactionRecord, TransactionRecord) {
        debug_assert!(first.amount.is_positive() && second.amount.is_positive());

        let now = Utc::now();
        let first = first.into_record(now);
        let second = second.into_record(now);

        let mut log = self.log.write().unwrap_or_else(PoisonError::into_inner);
        log.reserve(2);
        log.push(first.clone());
        log.push(second.clone());
        (first, second)
    }

    /// Records owned by, or linked to, `account_name`, in append order.
    pub fn history(&self, account_name: &str) -> Vec<TransactionRecord> {
        let log = self.log.read().unwrap_or_else(PoisonError::into_inner);
        log.iter()
            .filter(|r| r.involves(account_name))
            .cloned()
            .collect()
    }

    /// Full log, in append order.
    pub fn all(&self) -> Vec<TransactionRecord> {
        self.log.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn len(&self) -> usize {
        self.log.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
