//! Ledger error model.

use thiserror::Error;

use crate::Money;

/// Result type used across the ledger layer.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Every variant is a synchronous, caller-visible rejection. A failed operation
/// never leaves partial state behind, so none of these are retried internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Malformed input (bad PIN format, non-positive amount, blank name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The referenced account does not exist.
    #[error("account not found: {0}")]
    NotFound(String),

    /// An account with this name already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Credentials did not match (or the account to authenticate is absent).
    #[error("unauthorized")]
    Unauthorized,

    /// Balance is lower than the amount requested.
    #[error("insufficient funds: balance {available}, requested {requested}")]
    InsufficientFunds { available: Money, requested: Money },
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn insufficient_funds(available: Money, requested: Money) -> Self {
        Self::InsufficientFunds {
            available,
            requested,
        }
    }

    /// Stable machine-readable code, used in HTTP error bodies and logs.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) => "validation_error",
            LedgerError::NotFound(_) => "not_found",
            LedgerError::Conflict(_) => "conflict",
            LedgerError::Unauthorized => "unauthorized",
            LedgerError::InsufficientFunds { .. } => "insufficient_funds",
        }
    }
}
