//! Read-only relationship lookups, resolved by foreign-key queries.

use crate::error::AppError;
use crate::model::{Customer, CustomerAccount, Order, Product, ORDER_PRODUCT_TABLE};
use crate::service::CrudService;
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};

/// GET /customers/:id/account
pub async fn customer_account(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<CustomerAccount>, AppError> {
    let Path(id) = id?;
    CrudService::require::<Customer>(&state.pool, id).await?;
    let account = CrudService::find_where::<CustomerAccount>(&state.pool, "customer_id", id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("account for customer {}", id)))?;
    Ok(Json(account))
}

/// GET /customers/:id/orders
pub async fn customer_orders(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<Order>>, AppError> {
    let Path(id) = id?;
    CrudService::require::<Customer>(&state.pool, id).await?;
    let orders = CrudService::list_where::<Order>(&state.pool, "customer_id", id).await?;
    Ok(Json(orders))
}

/// GET /orders/:id/products
pub async fn order_products(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<Product>>, AppError> {
    let Path(id) = id?;
    CrudService::require::<Order>(&state.pool, id).await?;
    let products =
        CrudService::list_through::<Product>(&state.pool, ORDER_PRODUCT_TABLE, "order_id", id).await?;
    Ok(Json(products))
}
