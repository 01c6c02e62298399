use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::{dto, errors, extract::ApiJson, AppServices};

pub async fn authenticate(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::AuthRequest>,
) -> axum::response::Response {
    match services.authenticate(&body.name, &body.pin) {
        Ok(token) => (StatusCode::OK, Json(token)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
