use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::{dto, errors, extract::ApiJson, AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/:name", get(get_account))
        .route("/:name/transactions", get(list_transactions))
}

pub async fn create_account(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::CreateAccountRequest>,
) -> axum::response::Response {
    let created = dto::to_money(body.initial_balance).and_then(|initial| {
        services
            .ledger()
            .create_account(&body.name, &body.pin, initial)
    });

    match created {
        Ok(account) => (StatusCode::CREATED, Json(dto::account_to_json(&account))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.ledger().get_account(&name) {
        Ok(account) => (StatusCode::OK, Json(dto::account_to_json(&account))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn list_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.ledger().history(&name) {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
