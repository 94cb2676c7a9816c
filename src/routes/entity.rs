//! Entity CRUD routes: one collection and one item route per entity, plus relationship lookups.

use crate::handlers::entity::{create, delete as delete_handler, list, read, update};
use crate::handlers::{customer_account, customer_orders, order_products};
use crate::model::{Customer, CustomerAccount, Entity, Order, Product};
use crate::state::AppState;
use axum::{routing::get, Router};

/// `/{path}` (GET list, POST create) and `/{path}/:id` (GET, PUT, DELETE) for `E`.
fn resource<E: Entity>() -> Router<AppState> {
    let collection = format!("/{}", E::PATH);
    let item = format!("/{}/:id", E::PATH);
    Router::new()
        .route(&collection, get(list::<E>).post(create::<E>))
        .route(&item, get(read::<E>).put(update::<E>).delete(delete_handler::<E>))
}

pub fn entity_routes(state: AppState) -> Router {
    Router::new()
        .merge(resource::<Customer>())
        .merge(resource::<CustomerAccount>())
        .merge(resource::<Product>())
        .merge(resource::<Order>())
        .route("/customers/:id/account", get(customer_account))
        .route("/customers/:id/orders", get(customer_orders))
        .route("/orders/:id/products", get(order_products))
        .with_state(state)
}
