use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;

use bankledger_core::LedgerError;

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    let status = match &err {
        LedgerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::Conflict(_) => StatusCode::CONFLICT,
        LedgerError::Unauthorized => StatusCode::UNAUTHORIZED,
        LedgerError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
    };
    tracing::debug!(status = status.as_u16(), error = %err, "request rejected");

    let mut response = json_error(status, err.code(), err.to_string());
    if status == StatusCode::UNAUTHORIZED {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    response
}

/// Malformed or mistyped request bodies. Keeps axum's status (400, 415 or
/// 422) but answers with the ledger's error body.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    let status = rejection.status();
    let code = if status == StatusCode::UNPROCESSABLE_ENTITY {
        "validation_error"
    } else {
        "bad_request"
    };
    tracing::debug!(status = status.as_u16(), error = %rejection, "request body rejected");
    json_error(status, code, rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
