use super::Entity;
use crate::error::AppError;
use crate::service::FieldRule;
use crate::sql::PgBindValue;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};
use std::collections::BTreeSet;

/// Join table between orders and products, keyed by (order_id, product_id).
pub const ORDER_PRODUCT_TABLE: &str = "order_product";

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct Order {
    pub order_id: i32,
    pub date: NaiveDate,
    pub customer_id: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OrderPayload {
    pub date: NaiveDate,
    pub customer_id: i32,
    /// Full product set of the order; an update replaces it.
    #[serde(default)]
    pub product_ids: Vec<i32>,
}

impl OrderPayload {
    fn distinct_products(&self) -> BTreeSet<i32> {
        self.product_ids.iter().copied().collect()
    }
}

#[async_trait]
impl Entity for Order {
    const TABLE: &'static str = "orders";
    const PRIMARY_KEY: &'static str = "order_id";
    const SELECT_COLUMNS: &'static [&'static str] = &["order_id", "date", "customer_id"];
    const WRITE_COLUMNS: &'static [&'static str] = &["date", "customer_id"];
    const NAME: &'static str = "order";
    const LABEL: &'static str = "Order";
    const PATH: &'static str = "orders";
    const RULES: &'static [FieldRule] = &[
        FieldRule::date("date"),
        FieldRule::integer("customer_id"),
        FieldRule::integer_list("product_ids").optional(),
    ];

    type Payload = OrderPayload;

    fn id(&self) -> i32 {
        self.order_id
    }

    async fn values(payload: &OrderPayload) -> Result<Vec<PgBindValue>, AppError> {
        Ok(vec![
            PgBindValue::Date(payload.date),
            PgBindValue::Int(payload.customer_id),
        ])
    }

    async fn write_associations(
        conn: &mut PgConnection,
        id: i32,
        payload: &OrderPayload,
    ) -> Result<(), AppError> {
        let clear = format!("DELETE FROM {} WHERE order_id = $1", ORDER_PRODUCT_TABLE);
        sqlx::query(&clear).bind(id).execute(&mut *conn).await?;
        let link = format!(
            "INSERT INTO {} (order_id, product_id) VALUES ($1, $2)",
            ORDER_PRODUCT_TABLE
        );
        for product_id in payload.distinct_products() {
            tracing::debug!(order_id = id, product_id, "link product");
            sqlx::query(&link).bind(id).bind(product_id).execute(&mut *conn).await?;
        }
        Ok(())
    }
}
