//! Standard response envelope helpers.
//!
//! Every endpoint answers with the same shape: a `success` flag, an
//! optional user-facing `message`, `count`/`filiere` metadata on list
//! responses, and the payload under `data`.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

#[derive(Serialize)]
pub struct SuccessMany<T> {
    pub success: bool,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filiere: Option<String>,
    pub data: Vec<T>,
}

/// 201 with a message and the created record.
pub fn created<T: Serialize>(message: &str, data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (
        StatusCode::CREATED,
        Json(SuccessOne {
            success: true,
            message: Some(message.to_string()),
            data,
        }),
    )
}

/// 200 with the record alone.
pub fn success_one<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (
        StatusCode::OK,
        Json(SuccessOne {
            success: true,
            message: None,
            data,
        }),
    )
}

/// 200 with a message (update, delete).
pub fn success_one_with_message<T: Serialize>(
    message: &str,
    data: T,
) -> (StatusCode, Json<SuccessOne<T>>) {
    (
        StatusCode::OK,
        Json(SuccessOne {
            success: true,
            message: Some(message.to_string()),
            data,
        }),
    )
}

/// 200 with the collection and its count.
pub fn success_many<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<SuccessMany<T>>) {
    let count = data.len() as u64;
    (
        StatusCode::OK,
        Json(SuccessMany {
            success: true,
            count,
            filiere: None,
            data,
        }),
    )
}

/// 200 with the collection, its count, and the echoed filière filter.
pub fn success_many_filiere<T: Serialize>(
    filiere: &str,
    data: Vec<T>,
) -> (StatusCode, Json<SuccessMany<T>>) {
    let count = data.len() as u64;
    (
        StatusCode::OK,
        Json(SuccessMany {
            success: true,
            count,
            filiere: Some(filiere.to_string()),
            data,
        }),
    )
}
