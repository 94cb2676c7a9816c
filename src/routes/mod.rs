//! Router assembly: common and entity routes behind tracing, CORS, timeout and body-limit layers.

mod common;
mod entity;

pub use common::common_routes;
pub use entity::entity_routes;

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    http::header,
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

async fn fallback() -> AppError {
    AppError::NotFound("route".into())
}

/// Error responses built by routing or by the tower layers (405, 408, 413) carry no body or
/// plain text. Rewrite them into the JSON error envelope; JSON responses pass through.
async fn error_envelope(response: Response) -> Response {
    let status = response.status();
    if !status.is_client_error() {
        return response;
    }
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if is_json {
        return response;
    }
    let message = match status.as_u16() {
        405 => "method not allowed",
        408 => "request timed out",
        413 => "request body too large",
        _ => status.canonical_reason().unwrap_or("request rejected"),
    };
    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rewritten = AppError::Rejected {
        status,
        message: message.into(),
    }
    .into_response();
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(header::ALLOW, allow);
    }
    rewritten
}

/// Apply the request limits, error envelope, CORS and tracing to `router`.
pub fn with_layers(router: Router, config: &ServerConfig) -> Router {
    router
        .layer(RequestBodyLimitLayer::new(config.body_limit))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(middleware::map_response(error_envelope))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// The full application router.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .merge(common_routes(state.clone()))
        .merge(entity_routes(state))
        .fallback(fallback);
    with_layers(router, config)
}
