use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::json;

use crate::app::{dto, errors, extract::ApiJson, AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/deposit", post(deposit))
        .route("/withdraw", post(withdraw))
        .route("/transfer", post(transfer))
}

pub async fn deposit(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::DepositRequest>,
) -> axum::response::Response {
    let result = dto::to_money(body.amount).and_then(|amount| {
        let balance = services.ledger().deposit(&body.account_name, amount)?;
        Ok((amount, balance))
    });

    match result {
        Ok((amount, balance)) => (
            StatusCode::OK,
            Json(json!({
                "message": format!("Successfully deposited {amount} into {}", body.account_name),
                "new_balance": balance,
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn withdraw(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::WithdrawRequest>,
) -> axum::response::Response {
    let result = dto::to_money(body.amount).and_then(|amount| {
        let balance = services.ledger().withdraw(&body.account_name, amount)?;
        Ok((amount, balance))
    });

    match result {
        Ok((amount, balance)) => (
            StatusCode::OK,
            Json(json!({
                "message": format!("Successfully withdrew {amount} from {}", body.account_name),
                "new_balance": balance,
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn transfer(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::TransferRequest>,
) -> axum::response::Response {
    let result = dto::to_money(body.amount).and_then(|amount| {
        services.ledger().transfer(
            &body.sender_name,
            &body.sender_pin,
            &body.recipient_name,
            amount,
        )
    });

    match result {
        Ok(receipt) => (
            StatusCode::OK,
            Json(json!({
                "message": "Transfer successful",
                "sender_new_balance": receipt.sender_balance,
                "recipient_new_balance": receipt.recipient_balance,
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
