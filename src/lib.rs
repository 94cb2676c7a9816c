//! E-commerce REST backend: customers, customer accounts, products and orders over PostgreSQL.

pub mod config;
pub mod credentials;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::ServerConfig;
pub use error::{AppError, ConfigError, FieldErrors};
pub use model::{Customer, CustomerAccount, Entity, Order, Product};
pub use routes::{app, common_routes, entity_routes, with_layers};
pub use service::CrudService;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_schema};
