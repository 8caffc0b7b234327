//! PostgreSQL access.
//!
//! Generic read/delete helpers work for any [`Record`]; inserts are
//! implemented per payload through [`Insert`]. Documents have their own
//! repository because of the category join table and eager relations.

pub mod documents;
pub mod filter;

use std::future::Future;

use sqlx::error::ErrorKind;
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::model::Record;
use crate::validate::{Payload, ValidationError};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The database refused the write: unresolved foreign key, duplicate
    /// key, missing column value or a value it could not convert.
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl RepoError {
    pub fn not_found<T: Record>(id: Uuid) -> Self {
        RepoError::NotFound {
            entity: T::NAME,
            id,
        }
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let rejected = matches!(
                db.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            );
            // Class 22: data exceptions (bad text representation, value too long, ...)
            let bad_data = db.code().is_some_and(|code| code.starts_with("22"));
            if rejected || bad_data {
                return RepoError::Constraint(db.message().to_string());
            }
        }
        RepoError::Database(err)
    }
}

/// A validated payload that can be stored as a new row.
pub trait Insert: Payload + Send + 'static {
    type Record: Record;

    fn insert(
        self,
        pool: &PgPool,
    ) -> impl Future<Output = Result<Self::Record, RepoError>> + Send;
}

/// Insert a payload and log the new row.
#[instrument(skip_all, fields(table = <P::Record as Record>::TABLE))]
pub async fn create<P: Insert>(pool: &PgPool, payload: P) -> Result<P::Record, RepoError> {
    let row = payload.insert(pool).await?;
    tracing::info!("{} created", <P::Record as Record>::NAME);
    Ok(row)
}

/// All rows in insertion order.
#[instrument(skip(pool), fields(table = T::TABLE))]
pub async fn list_all<T: Record>(pool: &PgPool) -> Result<Vec<T>, RepoError> {
    let sql = format!("SELECT * FROM {} ORDER BY created_at, id", T::TABLE);
    let rows = sqlx::query_as::<_, T>(&sql).fetch_all(pool).await?;

    tracing::debug!(count = rows.len(), "Listed rows");
    Ok(rows)
}

#[instrument(skip(pool), fields(table = T::TABLE))]
pub async fn find_by_id<T: Record>(pool: &PgPool, id: Uuid) -> Result<Option<T>, RepoError> {
    let sql = format!("SELECT * FROM {} WHERE id = $1", T::TABLE);
    let row = sqlx::query_as::<_, T>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Like [`find_by_id`], but a missing row is an error.
pub async fn get<T: Record>(pool: &PgPool, id: Uuid) -> Result<T, RepoError> {
    find_by_id::<T>(pool, id)
        .await?
        .ok_or_else(|| RepoError::not_found::<T>(id))
}

/// Rows whose id is in `ids`, in no particular order.
pub async fn find_many<T: Record>(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<T>, RepoError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!("SELECT * FROM {} WHERE id = ANY($1)", T::TABLE);
    let rows = sqlx::query_as::<_, T>(&sql)
        .bind(ids)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Delete one row. Fails with `NotFound` when nothing matched and with
/// `Constraint` when dependent rows still reference it.
#[instrument(skip(pool), fields(table = T::TABLE))]
pub async fn delete_by_id<T: Record>(pool: &PgPool, id: Uuid) -> Result<(), RepoError> {
    let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::not_found::<T>(id));
    }

    tracing::info!(id = %id, "{} deleted", T::NAME);
    Ok(())
}
