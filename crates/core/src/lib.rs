//! `bankledger-core` — primitives shared by the ledger, auth and API crates.
//!
//! Pure values only: no locking, no IO.

pub mod error;
pub mod id;
pub mod money;

pub use error::{LedgerError, LedgerResult};
pub use id::{AccountName, TransactionId};
pub use money::Money;
