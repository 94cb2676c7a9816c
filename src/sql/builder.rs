//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from entity table metadata.
//! Identifiers come only from `Entity` constants; values are always parameters.

use super::params::PgBindValue;
use crate::model::Entity;

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn column_list(columns: &[&str]) -> String {
    columns.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ")
}

/// Same as `column_list` with every column prefixed by a table alias.
fn aliased_column_list(alias: &str, columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| format!("{}.{}", alias, quoted(c)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

/// SELECT every row, ordered by primary key.
pub fn select_all<E: Entity>() -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        column_list(E::SELECT_COLUMNS),
        quoted(E::TABLE),
        quoted(E::PRIMARY_KEY)
    )
}

/// SELECT by primary key (`$1`). `lock` adds FOR UPDATE for use inside a write transaction.
pub fn select_by_id<E: Entity>(lock: bool) -> String {
    let mut sql = format!(
        "SELECT {} FROM {} WHERE {} = $1",
        column_list(E::SELECT_COLUMNS),
        quoted(E::TABLE),
        quoted(E::PRIMARY_KEY)
    );
    if lock {
        sql.push_str(" FOR UPDATE");
    }
    sql
}

/// SELECT rows whose `column` equals `$1`, ordered by primary key. Used for foreign-key lookups.
pub fn select_where<E: Entity>(column: &str) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = $1 ORDER BY {}",
        column_list(E::SELECT_COLUMNS),
        quoted(E::TABLE),
        quoted(column),
        quoted(E::PRIMARY_KEY)
    )
}

/// SELECT rows of `E` reachable through a join table: `join_table.join_column = $1` and
/// `join_table.<E pk> = E.pk`.
pub fn select_through<E: Entity>(join_table: &str, join_column: &str) -> String {
    format!(
        "SELECT {} FROM {} t JOIN {} j ON j.{} = t.{} WHERE j.{} = $1 ORDER BY t.{}",
        aliased_column_list("t", E::SELECT_COLUMNS),
        quoted(E::TABLE),
        quoted(join_table),
        quoted(E::PRIMARY_KEY),
        quoted(E::PRIMARY_KEY),
        quoted(join_column),
        quoted(E::PRIMARY_KEY)
    )
}

/// INSERT all write columns; the store assigns the primary key. Returns the new row.
pub fn insert<E: Entity>(values: Vec<PgBindValue>) -> QueryBuf {
    let placeholders: Vec<String> = (1..=values.len()).map(|n| format!("${}", n)).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(E::TABLE),
        column_list(E::WRITE_COLUMNS),
        placeholders.join(", "),
        column_list(E::SELECT_COLUMNS)
    );
    QueryBuf { sql, params: values }
}

/// UPDATE by id: overwrite every write column. The id is bound last. Returns the updated row.
pub fn update<E: Entity>(id: i32, values: Vec<PgBindValue>) -> QueryBuf {
    let sets: Vec<String> = E::WRITE_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = ${}", quoted(c), i + 1))
        .collect();
    let id_param = values.len() + 1;
    let mut params = values;
    params.push(PgBindValue::Int(id));
    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(E::TABLE),
        sets.join(", "),
        quoted(E::PRIMARY_KEY),
        id_param,
        column_list(E::SELECT_COLUMNS)
    );
    QueryBuf { sql, params }
}

/// DELETE by id (`$1`). Returns the deleted primary key.
pub fn delete<E: Entity>() -> String {
    format!(
        "DELETE FROM {} WHERE {} = $1 RETURNING {}",
        quoted(E::TABLE),
        quoted(E::PRIMARY_KEY),
        quoted(E::PRIMARY_KEY)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Customer, CustomerAccount, Order, Product, ORDER_PRODUCT_TABLE};

    #[test]
    fn select_statements() {
        assert_eq!(
            select_all::<Customer>(),
            r#"SELECT "customer_id", "name", "email", "phone" FROM "customers" ORDER BY "customer_id""#
        );
        assert_eq!(
            select_by_id::<Product>(true),
            r#"SELECT "product_id", "name", "price" FROM "products" WHERE "product_id" = $1 FOR UPDATE"#
        );
        assert_eq!(
            select_where::<Order>("customer_id"),
            r#"SELECT "order_id", "date", "customer_id" FROM "orders" WHERE "customer_id" = $1 ORDER BY "order_id""#
        );
    }

    #[test]
    fn insert_binds_write_columns_and_returns_row() {
        let q = insert::<Customer>(vec![
            PgBindValue::Text("Ann".into()),
            PgBindValue::Text("ann@x.com".into()),
            PgBindValue::Text("555-0100".into()),
        ]);
        assert_eq!(
            q.sql,
            r#"INSERT INTO "customers" ("name", "email", "phone") VALUES ($1, $2, $3) RETURNING "customer_id", "name", "email", "phone""#
        );
        assert_eq!(q.params.len(), 3);
    }

    #[test]
    fn update_binds_id_last() {
        let q = update::<Customer>(
            42,
            vec![
                PgBindValue::Text("Ann".into()),
                PgBindValue::Text("ann@x.com".into()),
                PgBindValue::Text("555-0100".into()),
            ],
        );
        assert_eq!(
            q.sql,
            r#"UPDATE "customers" SET "name" = $1, "email" = $2, "phone" = $3 WHERE "customer_id" = $4 RETURNING "customer_id", "name", "email", "phone""#
        );
        assert_eq!(q.params.last(), Some(&PgBindValue::Int(42)));
    }

    #[test]
    fn account_rows_never_return_password() {
        let q = insert::<CustomerAccount>(Vec::new());
        let returning = q.sql.split("RETURNING").nth(1).unwrap();
        assert!(!returning.contains("password"));
    }

    #[test]
    fn join_and_delete_statements() {
        assert_eq!(
            select_through::<Product>(ORDER_PRODUCT_TABLE, "order_id"),
            r#"SELECT t."product_id", t."name", t."price" FROM "products" t JOIN "order_product" j ON j."product_id" = t."product_id" WHERE j."order_id" = $1 ORDER BY t."product_id""#
        );
        assert_eq!(
            delete::<Order>(),
            r#"DELETE FROM "orders" WHERE "order_id" = $1 RETURNING "order_id""#
        );
    }
}
