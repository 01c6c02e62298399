//! Ledger module: account store and append-only transaction log.
//!
//! Pure in-memory logic only: no IO, no HTTP. Every mutating operation either
//! fully applies (balances + records) or leaves no trace.

pub mod account;
pub mod record;
pub mod recorder;
pub mod store;

pub use account::Account;
pub use record::{NewRecord, TransactionKind, TransactionRecord, TransactionStatus};
pub use recorder::TransactionRecorder;
pub use store::{LedgerStore, TransferReceipt};
