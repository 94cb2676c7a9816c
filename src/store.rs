//! Store bootstrap: optional database creation and idempotent table DDL.
//! No migrations; schema drift is handled outside the service.

use crate::error::{AppError, ConfigError};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

/// Table DDL in dependency order: referenced tables before referencing ones.
pub const SCHEMA: &[(&str, &str)] = &[
    (
        "customers",
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            customer_id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            phone VARCHAR(15) NOT NULL
        )
        "#,
    ),
    (
        "customer_accounts",
        r#"
        CREATE TABLE IF NOT EXISTS customer_accounts (
            account_id SERIAL PRIMARY KEY,
            username VARCHAR(255) NOT NULL UNIQUE,
            password VARCHAR(255) NOT NULL,
            customer_id INTEGER NOT NULL UNIQUE REFERENCES customers (customer_id)
        )
        "#,
    ),
    (
        "products",
        r#"
        CREATE TABLE IF NOT EXISTS products (
            product_id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            price NUMERIC(10, 2) NOT NULL CHECK (price >= 0)
        )
        "#,
    ),
    (
        "orders",
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            order_id SERIAL PRIMARY KEY,
            date DATE NOT NULL,
            customer_id INTEGER NOT NULL REFERENCES customers (customer_id)
        )
        "#,
    ),
    (
        "order_product",
        r#"
        CREATE TABLE IF NOT EXISTS order_product (
            order_id INTEGER NOT NULL REFERENCES orders (order_id) ON DELETE CASCADE,
            product_id INTEGER NOT NULL REFERENCES products (product_id),
            PRIMARY KEY (order_id, product_id)
        )
        "#,
    ),
];

/// Create all tables if absent. Safe to run on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    for (table, ddl) in SCHEMA {
        tracing::debug!(table, "ensure table");
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!(tables = SCHEMA.len(), "schema ready");
    Ok(())
}

/// Connect to the `postgres` maintenance database and create the target database if missing.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| ConfigError::Load(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split a connection URL into (maintenance URL, database name). Query parameters are kept
/// on the maintenance URL.
fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let scheme_end = url
        .find("://")
        .ok_or_else(|| ConfigError::Load("DATABASE_URL: no scheme".into()))?
        + 3;
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| ConfigError::Load("DATABASE_URL: no path".into()))?;
    let path_and_query = &url[path_start..];
    let (db_name, query) = match path_and_query.split_once('?') {
        Some((name, q)) => (name.trim(), Some(q)),
        None => (path_and_query.trim(), None),
    };
    let mut admin_url = format!("{}postgres", &url[..path_start]);
    if let Some(q) = query {
        admin_url.push('?');
        admin_url.push_str(q);
    }
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_database_name() {
        let (admin, db) = parse_db_name_from_url("postgres://root:pw@localhost:5432/e_commerce_app_db").unwrap();
        assert_eq!(admin, "postgres://root:pw@localhost:5432/postgres");
        assert_eq!(db, "e_commerce_app_db");

        let (admin, db) = parse_db_name_from_url("postgres://localhost/shop?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres?sslmode=disable");
        assert_eq!(db, "shop");
    }

    #[test]
    fn url_without_path_is_rejected() {
        assert!(parse_db_name_from_url("postgres://localhost").is_err());
        assert!(parse_db_name_from_url("localhost/db").is_err());
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident(r#"we"ird"#), r#""we""ird""#);
    }

    #[test]
    fn referenced_tables_come_first() {
        let pos = |name: &str| SCHEMA.iter().position(|(t, _)| *t == name).unwrap();
        assert!(pos("customers") < pos("customer_accounts"));
        assert!(pos("customers") < pos("orders"));
        assert!(pos("orders") < pos("order_product"));
        assert!(pos("products") < pos("order_product"));
        assert!(SCHEMA.iter().all(|(_, ddl)| ddl.contains("IF NOT EXISTS")));
    }
}
