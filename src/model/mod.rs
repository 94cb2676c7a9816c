//! Entity records, their write payloads, and the table metadata the SQL builder and
//! CRUD service work from. Relationships are plain foreign-key ids resolved by query.

mod account;
mod customer;
mod order;
mod product;

pub use account::{AccountPayload, CustomerAccount};
pub use customer::{Customer, CustomerPayload};
pub use order::{Order, OrderPayload, ORDER_PRODUCT_TABLE};
pub use product::{Product, ProductPayload};

use crate::error::AppError;
use crate::service::FieldRule;
use crate::sql::PgBindValue;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection};

/// A row-backed business object exposed through the generic CRUD routes.
#[async_trait]
pub trait Entity: for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static {
    const TABLE: &'static str;
    const PRIMARY_KEY: &'static str;
    /// Columns returned to clients, primary key first. Credential columns are never listed.
    const SELECT_COLUMNS: &'static [&'static str];
    /// Columns written from a payload, in the order `values` returns them.
    const WRITE_COLUMNS: &'static [&'static str];
    /// Lower-case noun for messages ("customer").
    const NAME: &'static str;
    /// Capitalised noun for messages ("Customer").
    const LABEL: &'static str;
    /// Collection path segment ("customers").
    const PATH: &'static str;
    const RULES: &'static [FieldRule];

    type Payload: DeserializeOwned + Send + Sync;

    fn id(&self) -> i32;

    /// Bind values for `WRITE_COLUMNS`. Computed before the write's transaction opens.
    async fn values(payload: &Self::Payload) -> Result<Vec<PgBindValue>, AppError>;

    /// Rows in other tables owned by this one (join tables). Runs in the write's transaction.
    async fn write_associations(
        _conn: &mut PgConnection,
        _id: i32,
        _payload: &Self::Payload,
    ) -> Result<(), AppError> {
        Ok(())
    }
}
