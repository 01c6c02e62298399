use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use bankledger_core::{LedgerResult, Money};
use bankledger_ledger::Account;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub name: String,
    pub pin: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    pub pin: String,
    #[serde(default)]
    pub initial_balance: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub account_name: String,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub account_name: String,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub sender_name: String,
    pub sender_pin: String,
    pub recipient_name: String,
    pub amount: Decimal,
}

// -------------------------
// Mapping helpers
// -------------------------

/// Decimal wire amount -> cents, exactly. Sign checks stay with the ledger.
pub fn to_money(amount: Decimal) -> LedgerResult<Money> {
    Money::try_from_decimal(amount)
}

pub fn account_to_json(account: &Account) -> Value {
    json!({
        "name": account.name,
        "balance": account.balance,
        "created_at": account.created_at,
    })
}
