use axum::{routing::post, Router};

pub mod accounts;
pub mod auth;
pub mod system;
pub mod transactions;

/// Router for all ledger endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/auth", post(auth::authenticate))
        .route("/accounts", post(accounts::create_account))
        .nest("/accounts", accounts::router())
        .nest("/transactions", transactions::router())
}
