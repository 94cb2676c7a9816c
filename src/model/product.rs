use super::Entity;
use crate::error::AppError;
use crate::service::FieldRule;
use crate::sql::PgBindValue;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Largest value a `NUMERIC(10, 2)` price column holds.
pub const MAX_PRICE: f64 = 99_999_999.99;

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct Product {
    pub product_id: i32,
    pub name: String,
    pub price: Decimal,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub price: Decimal,
}

#[async_trait]
impl Entity for Product {
    const TABLE: &'static str = "products";
    const PRIMARY_KEY: &'static str = "product_id";
    const SELECT_COLUMNS: &'static [&'static str] = &["product_id", "name", "price"];
    const WRITE_COLUMNS: &'static [&'static str] = &["name", "price"];
    const NAME: &'static str = "product";
    const LABEL: &'static str = "Product";
    const PATH: &'static str = "products";
    const RULES: &'static [FieldRule] = &[
        FieldRule::string("name").max_length(255),
        FieldRule::number("price").minimum(0.0).maximum(MAX_PRICE),
    ];

    type Payload = ProductPayload;

    fn id(&self) -> i32 {
        self.product_id
    }

    async fn values(payload: &ProductPayload) -> Result<Vec<PgBindValue>, AppError> {
        Ok(vec![
            PgBindValue::Text(payload.name.clone()),
            PgBindValue::Decimal(payload.price.round_dp(2)),
        ])
    }
}
