//! Success-envelope builders. Every endpoint answers
//! `{"success": true, ...}` with `data` and/or `message`; failures go
//! through [`crate::error::ApiError`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(json!({ "success": true, "data": data }))).into_response()
}

pub fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(json!({ "success": true, "data": data }))).into_response()
}

pub fn ok_message(message: impl Into<String>) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": message.into() })),
    )
        .into_response()
}

pub fn with_message<T: Serialize>(status: StatusCode, data: T, message: &str) -> Response {
    (
        status,
        Json(json!({ "success": true, "data": data, "message": message })),
    )
        .into_response()
}

/// Escape hatch for the few endpoints with extra top-level fields.
pub fn payload(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}
