use crate::error::{map_insert_error, map_sqlx_error};
use crate::sql::{self, id_from_sql, id_to_sql, read_mapping};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use stubby_core::error::Result;
use stubby_core::{Backend, Mapping, ReadBackend, ShortCode};
use tracing::debug;

const SCHEMA: &str = include_str!("../ddl/sqlite/url_list.sql");

/// SQLite implementation of the backend contract.
///
/// Mappings live in the `url_list` table. Engine-generated identifiers come
/// from the `INTEGER PRIMARY KEY` rowid, which SQLite hands out as one past
/// the current maximum.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    /// Creates a backend from an existing SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `database_url`, creating the database file if needed.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(map_sqlx_error)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;
        debug!(database_url, "connected to sqlite");
        Ok(Self::new(pool))
    }

    /// Opens a private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` sees its own database, so the
    /// pool is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect("sqlite::memory:")
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the `url_list` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("sqlite schema ready");
        Ok(())
    }
}

#[async_trait]
impl ReadBackend for SqliteBackend {
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Mapping>> {
        let row = sqlx::query(sql::FIND_BY_CODE)
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(read_mapping).transpose()
    }

    async fn max_id(&self) -> Result<Option<u64>> {
        let max: Option<i64> = sqlx::query_scalar(sql::MAX_ID)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        max.map(id_from_sql).transpose()
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    async fn insert(&self, mapping: &Mapping) -> Result<()> {
        let id = id_to_sql(mapping.id)?;

        sqlx::query(sql::INSERT)
            .bind(id)
            .bind(mapping.code.as_str())
            .bind(mapping.url.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, &mapping.code))?;

        Ok(())
    }

    async fn insert_generated(&self, url: &str) -> Result<Mapping> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let inserted = sqlx::query(sql::INSERT_URL_ONLY)
            .bind(url)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, "generated key"))?;

        let raw_id = inserted.last_insert_rowid();
        let mapping = Mapping::new(id_from_sql(raw_id)?, url);

        sqlx::query(sql::SET_CODE)
            .bind(mapping.code.as_str())
            .bind(raw_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, &mapping.code))?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(mapping)
    }
}
