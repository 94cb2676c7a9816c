//! Response envelopes for write operations.

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// `{"Message": ..., "data": ...}`; `data` is omitted for deletes.
#[derive(Serialize)]
pub struct MessageBody<T> {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn created<T: Serialize>(message: String, data: T) -> (StatusCode, Json<MessageBody<T>>) {
    (
        StatusCode::CREATED,
        Json(MessageBody {
            message,
            data: Some(data),
        }),
    )
}

pub fn updated<T: Serialize>(message: String, data: T) -> (StatusCode, Json<MessageBody<T>>) {
    (
        StatusCode::OK,
        Json(MessageBody {
            message,
            data: Some(data),
        }),
    )
}

pub fn removed(message: String) -> (StatusCode, Json<MessageBody<()>>) {
    (StatusCode::OK, Json(MessageBody { message, data: None }))
}
