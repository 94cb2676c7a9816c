//! Generic CRUD execution against PostgreSQL. Every write runs in one transaction that is
//! committed only after all steps succeed; an early return drops it and rolls back.

use crate::error::AppError;
use crate::model::Entity;
use crate::service::RequestValidator;
use crate::sql::{delete, insert, select_all, select_by_id, select_through, select_where, update, QueryBuf};
use serde_json::Value;
use sqlx::{PgConnection, PgPool};

pub struct CrudService;

impl CrudService {
    /// All rows of the entity, ordered by primary key.
    pub async fn list<E: Entity>(pool: &PgPool) -> Result<Vec<E>, AppError> {
        let sql = select_all::<E>();
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, E>(&sql).fetch_all(pool).await?;
        Ok(rows)
    }

    /// Fetch one row by primary key.
    pub async fn read<E: Entity>(pool: &PgPool, id: i32) -> Result<Option<E>, AppError> {
        let sql = select_by_id::<E>(false);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, E>(&sql).bind(id).fetch_optional(pool).await?;
        Ok(row)
    }

    /// Fetch one row by primary key or fail with not found.
    pub async fn require<E: Entity>(pool: &PgPool, id: i32) -> Result<E, AppError> {
        Self::read::<E>(pool, id).await?.ok_or_else(|| not_found::<E>(id))
    }

    /// Rows whose foreign-key `column` equals `value`.
    pub async fn list_where<E: Entity>(pool: &PgPool, column: &str, value: i32) -> Result<Vec<E>, AppError> {
        let sql = select_where::<E>(column);
        tracing::debug!(sql = %sql, value, "query");
        let rows = sqlx::query_as::<_, E>(&sql).bind(value).fetch_all(pool).await?;
        Ok(rows)
    }

    /// The single row whose foreign-key `column` equals `value`, for one-to-one links.
    pub async fn find_where<E: Entity>(pool: &PgPool, column: &str, value: i32) -> Result<Option<E>, AppError> {
        let sql = select_where::<E>(column);
        tracing::debug!(sql = %sql, value, "query");
        let row = sqlx::query_as::<_, E>(&sql).bind(value).fetch_optional(pool).await?;
        Ok(row)
    }

    /// Rows of `E` linked to `owner_id` through `join_table.join_column`.
    pub async fn list_through<E: Entity>(
        pool: &PgPool,
        join_table: &str,
        join_column: &str,
        owner_id: i32,
    ) -> Result<Vec<E>, AppError> {
        let sql = select_through::<E>(join_table, join_column);
        tracing::debug!(sql = %sql, owner_id, "query");
        let rows = sqlx::query_as::<_, E>(&sql).bind(owner_id).fetch_all(pool).await?;
        Ok(rows)
    }

    /// Validate `body`, insert one row and its associations. Returns the created row.
    pub async fn create<E: Entity>(pool: &PgPool, body: Value) -> Result<E, AppError> {
        let payload: E::Payload = RequestValidator::parse(body, E::RULES)?;
        let q = insert::<E>(E::values(&payload).await?);
        let mut tx = pool.begin().await?;
        let row: E = fetch_one(&mut tx, q).await?;
        E::write_associations(&mut tx, row.id(), &payload).await?;
        tx.commit().await?;
        tracing::info!(entity = E::NAME, id = row.id(), "created");
        Ok(row)
    }

    /// Check the row exists, validate `body`, then lock the row and overwrite every field.
    /// Absent row is not found and nothing is written. The transaction only spans store I/O.
    pub async fn update<E: Entity>(pool: &PgPool, id: i32, body: Value) -> Result<E, AppError> {
        Self::require::<E>(pool, id).await?;
        let payload: E::Payload = RequestValidator::parse(body, E::RULES)?;
        let q = update::<E>(id, E::values(&payload).await?);

        let mut tx = pool.begin().await?;
        let lock = select_by_id::<E>(true);
        tracing::debug!(sql = %lock, id, "query (tx)");
        sqlx::query_as::<_, E>(&lock)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found::<E>(id))?;
        let row: E = fetch_one(&mut tx, q).await?;
        E::write_associations(&mut tx, id, &payload).await?;
        tx.commit().await?;
        tracing::info!(entity = E::NAME, id, "updated");
        Ok(row)
    }

    /// Delete one row by id. No matching row is not found.
    pub async fn delete<E: Entity>(pool: &PgPool, id: i32) -> Result<(), AppError> {
        let sql = delete::<E>();
        let mut tx = pool.begin().await?;
        tracing::debug!(sql = %sql, id, "query (tx)");
        let deleted: Option<(i32,)> = sqlx::query_as(&sql).bind(id).fetch_optional(&mut *tx).await?;
        if deleted.is_none() {
            return Err(not_found::<E>(id));
        }
        tx.commit().await?;
        tracing::info!(entity = E::NAME, id, "deleted");
        Ok(())
    }
}

async fn fetch_one<E: Entity>(conn: &mut PgConnection, q: QueryBuf) -> Result<E, AppError> {
    tracing::debug!(sql = %q.sql, "query (tx)");
    let mut query = sqlx::query_as::<_, E>(&q.sql);
    for p in q.params {
        query = query.bind(p);
    }
    let row = query.fetch_one(&mut *conn).await?;
    Ok(row)
}

fn not_found<E: Entity>(id: i32) -> AppError {
    AppError::NotFound(format!("{} {}", E::NAME, id))
}
