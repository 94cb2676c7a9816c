//! Entity CRUD handlers: list, read, create, update, delete. Generic over `Entity`; the
//! router instantiates them once per entity.

use crate::error::AppError;
use crate::model::Entity;
use crate::response::{created, removed, updated};
use crate::service::CrudService;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn list<E: Entity>(State(state): State<AppState>) -> Result<Json<Vec<E>>, AppError> {
    let rows = CrudService::list::<E>(&state.pool).await?;
    Ok(Json(rows))
}

pub async fn read<E: Entity>(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<E>, AppError> {
    let Path(id) = id?;
    let row = CrudService::require::<E>(&state.pool, id).await?;
    Ok(Json(row))
}

pub async fn create<E: Entity>(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body?;
    let row = CrudService::create::<E>(&state.pool, body).await?;
    Ok(created(format!("New {} added successfully", E::NAME), row))
}

pub async fn update<E: Entity>(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let Json(body) = body?;
    let row = CrudService::update::<E>(&state.pool, id, body).await?;
    Ok(updated(format!("{} updated successfully", E::LABEL), row))
}

pub async fn delete<E: Entity>(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    CrudService::delete::<E>(&state.pool, id).await?;
    Ok(removed(format!("{} removed successfully", E::LABEL)))
}
