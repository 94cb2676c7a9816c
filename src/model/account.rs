use super::Entity;
use crate::credentials::hash_password;
use crate::error::AppError;
use crate::service::FieldRule;
use crate::sql::PgBindValue;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Login account owned by exactly one customer. The password hash is not part of the record.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct CustomerAccount {
    pub account_id: i32,
    pub username: String,
    pub customer_id: i32,
}

#[derive(Clone, Deserialize)]
pub struct AccountPayload {
    pub username: String,
    pub password: String,
    pub customer_id: i32,
}

#[async_trait]
impl Entity for CustomerAccount {
    const TABLE: &'static str = "customer_accounts";
    const PRIMARY_KEY: &'static str = "account_id";
    const SELECT_COLUMNS: &'static [&'static str] = &["account_id", "username", "customer_id"];
    const WRITE_COLUMNS: &'static [&'static str] = &["username", "password", "customer_id"];
    const NAME: &'static str = "account";
    const LABEL: &'static str = "Account";
    const PATH: &'static str = "accounts";
    const RULES: &'static [FieldRule] = &[
        FieldRule::string("username").min_length(1).max_length(255),
        FieldRule::string("password").min_length(8).max_length(255),
        FieldRule::integer("customer_id"),
    ];

    type Payload = AccountPayload;

    fn id(&self) -> i32 {
        self.account_id
    }

    /// Hashing runs on the blocking pool.
    async fn values(payload: &AccountPayload) -> Result<Vec<PgBindValue>, AppError> {
        let password = payload.password.clone();
        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("password hashing task: {}", e)))??;
        Ok(vec![
            PgBindValue::Text(payload.username.clone()),
            PgBindValue::Text(hash),
            PgBindValue::Int(payload.customer_id),
        ])
    }
}
