use super::Entity;
use crate::error::AppError;
use crate::service::FieldRule;
use crate::sql::PgBindValue;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct Customer {
    pub customer_id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CustomerPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[async_trait]
impl Entity for Customer {
    const TABLE: &'static str = "customers";
    const PRIMARY_KEY: &'static str = "customer_id";
    const SELECT_COLUMNS: &'static [&'static str] = &["customer_id", "name", "email", "phone"];
    const WRITE_COLUMNS: &'static [&'static str] = &["name", "email", "phone"];
    const NAME: &'static str = "customer";
    const LABEL: &'static str = "Customer";
    const PATH: &'static str = "customers";
    const RULES: &'static [FieldRule] = &[
        FieldRule::string("name").max_length(255),
        FieldRule::string("email").max_length(255).email(),
        FieldRule::string("phone").max_length(15),
    ];

    type Payload = CustomerPayload;

    fn id(&self) -> i32 {
        self.customer_id
    }

    async fn values(payload: &CustomerPayload) -> Result<Vec<PgBindValue>, AppError> {
        Ok(vec![
            PgBindValue::Text(payload.name.clone()),
            PgBindValue::Text(payload.email.clone()),
            PgBindValue::Text(payload.phone.clone()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::RequestValidator;
    use serde_json::json;

    #[test]
    fn serializes_with_store_column_names() {
        let c = Customer {
            customer_id: 3,
            name: "Ann".into(),
            email: "ann@x.com".into(),
            phone: "555-0100".into(),
        };
        assert_eq!(
            serde_json::to_value(c).unwrap(),
            json!({ "customer_id": 3, "name": "Ann", "email": "ann@x.com", "phone": "555-0100" })
        );
    }

    #[test]
    fn phone_longer_than_column_is_rejected() {
        let err = RequestValidator::parse::<CustomerPayload>(
            json!({ "name": "Ann", "email": "ann@x.com", "phone": "+1 (555) 010-0000 ext 9" }),
            Customer::RULES,
        )
        .unwrap_err();
        let AppError::Validation(fields) = err else { panic!("expected validation error") };
        assert_eq!(fields["phone"], vec!["Longer than maximum length 15."]);
    }

    #[tokio::test]
    async fn values_follow_write_column_order() {
        let payload = CustomerPayload {
            name: "Ann".into(),
            email: "ann@x.com".into(),
            phone: "555-0100".into(),
        };
        let values = Customer::values(&payload).await.unwrap();
        assert_eq!(values.len(), Customer::WRITE_COLUMNS.len());
        assert!(matches!(&values[1], PgBindValue::Text(s) if s == "ann@x.com"));
    }
}
