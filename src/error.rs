//! Typed errors and HTTP mapping.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::error::ErrorKind;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name -> messages. Ordered so responses are stable.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("config load: {0}")]
    Load(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Refused before reaching a handler body: extractor rejections, wrong method,
    /// oversized body, timeout. Keeps the status the rejecting layer chose.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("internal: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Machine-readable code for a client-error status.
pub fn status_code_name(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::METHOD_NOT_ALLOWED => "method_not_allowed",
        StatusCode::REQUEST_TIMEOUT => "timeout",
        StatusCode::PAYLOAD_TOO_LARGE => "payload_too_large",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "unsupported_media_type",
        s if s.is_server_error() => "internal_error",
        _ => "bad_request",
    }
}

/// SQLSTATEs for values the column cannot hold: numeric out of range, string too long.
const OUT_OF_RANGE_CODES: &[&str] = &["22003", "22001"];

fn classify_db(
    kind: ErrorKind,
    code: Option<&str>,
    details: Option<serde_json::Value>,
) -> (StatusCode, &'static str, String, Option<serde_json::Value>) {
    match kind {
        ErrorKind::UniqueViolation => (
            StatusCode::CONFLICT,
            "conflict",
            "a record with the same unique value already exists".into(),
            details,
        ),
        ErrorKind::ForeignKeyViolation => (
            StatusCode::CONFLICT,
            "conflict",
            "referenced record is missing or still in use".into(),
            details,
        ),
        ErrorKind::NotNullViolation | ErrorKind::CheckViolation => (
            StatusCode::BAD_REQUEST,
            "constraint_violation",
            "value violates a table constraint".into(),
            details,
        ),
        _ if code.is_some_and(|c| OUT_OF_RANGE_CODES.contains(&c)) => (
            StatusCode::BAD_REQUEST,
            "constraint_violation",
            "value is out of range for its column".into(),
            details,
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            INTERNAL_MESSAGE.into(),
            None,
        ),
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

const INTERNAL_MESSAGE: &str = "internal server error";

impl AppError {
    /// Status, code, client-facing message and optional details. Store and internal
    /// failures are reduced to a generic message; the full error goes to the log.
    fn classify(&self) -> (StatusCode, &'static str, String, Option<serde_json::Value>) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string(), None),
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                self.to_string(),
                serde_json::to_value(fields).ok(),
            ),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request", self.to_string(), None),
            AppError::Rejected { status, message } if !status.is_server_error() => {
                (*status, status_code_name(*status), message.clone(), None)
            }
            AppError::Db(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, "not_found", "not found".into(), None)
            }
            AppError::Db(sqlx::Error::Database(db)) => {
                let details = db
                    .constraint()
                    .map(|c| serde_json::json!({ "constraint": c }));
                classify_db(db.kind(), db.code().as_deref(), details)
            }
            AppError::Db(_) | AppError::Config(_) | AppError::Internal(_) | AppError::Rejected { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                INTERNAL_MESSAGE.into(),
                None,
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = self.classify();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn validation_maps_to_bad_request_with_field_details() {
        let mut fields = FieldErrors::new();
        fields.insert("email".into(), vec!["Missing data for required field.".into()]);
        let (status, code, _, details) = AppError::Validation(fields).classify();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "validation_error");
        assert_eq!(
            details,
            Some(serde_json::json!({ "email": ["Missing data for required field."] }))
        );
    }

    #[test]
    fn not_found_variants_map_to_404() {
        assert_eq!(status_of(AppError::NotFound("customer 7".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AppError::Db(sqlx::Error::RowNotFound)), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_failures_are_sanitised() {
        let err = AppError::Db(sqlx::Error::Protocol("password authentication failed for user root".into()));
        let (status, code, message, details) = err.classify();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "internal_error");
        assert_eq!(message, INTERNAL_MESSAGE);
        assert!(details.is_none());
    }

    #[test]
    fn config_and_internal_errors_are_500() {
        let err = AppError::Config(ConfigError::Load("missing".into()));
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_of(AppError::Internal("hash".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn out_of_range_values_are_client_errors() {
        let details = Some(serde_json::json!({ "constraint": "products_price_check" }));
        let (status, code, _, _) = classify_db(ErrorKind::Other, Some("22003"), None);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "constraint_violation");
        let (status, _, _, kept) = classify_db(ErrorKind::Other, Some("22001"), details.clone());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(kept, details);

        let (status, code, message, details) = classify_db(ErrorKind::Other, Some("40001"), details);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "internal_error");
        assert_eq!(message, INTERNAL_MESSAGE);
        assert!(details.is_none());
    }

    #[test]
    fn rejections_keep_their_status() {
        let err = AppError::Rejected {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "length limit exceeded".into(),
        };
        let (status, code, message, _) = err.classify();
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(code, "payload_too_large");
        assert_eq!(message, "length limit exceeded");

        assert_eq!(status_code_name(StatusCode::METHOD_NOT_ALLOWED), "method_not_allowed");
        assert_eq!(status_code_name(StatusCode::REQUEST_TIMEOUT), "timeout");
        assert_eq!(status_code_name(StatusCode::BAD_REQUEST), "bad_request");
    }

    #[test]
    fn bad_request_keeps_its_message() {
        let (status, _, message, _) = AppError::BadRequest("body must be a JSON object".into()).classify();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "bad request: body must be a JSON object");
    }
}
