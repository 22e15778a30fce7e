use crate::error::{map_insert_error, map_sqlx_error};
use crate::sql::{self, id_from_sql, id_to_sql, read_mapping};
use async_trait::async_trait;
use sqlx::MySqlPool;
use stubby_core::error::Result;
use stubby_core::{Backend, Mapping, ReadBackend, ShortCode};
use tracing::debug;

const SCHEMA: &str = include_str!("../ddl/mysql/url_list.sql");

/// MySQL implementation of the backend contract.
///
/// Meant for deployments where several processes share one database: the
/// `AUTO_INCREMENT` key gives every process distinct identifiers without any
/// coordination between them. The `hash` column uses a binary collation so
/// codes that differ only in case stay distinct.
#[derive(Debug, Clone)]
pub struct MySqlBackend {
    pool: MySqlPool,
}

impl MySqlBackend {
    /// Creates a backend from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a backend by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Creates the `url_list` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("mysql schema ready");
        Ok(())
    }
}

#[async_trait]
impl ReadBackend for MySqlBackend {
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
impl Backend for MySqlBackend {
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

        let id = inserted.last_insert_id();
        let mapping = Mapping::new(id, url);

        sqlx::query(sql::SET_CODE)
            .bind(mapping.code.as_str())
            .bind(id_to_sql(id)?)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, &mapping.code))?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(mapping)
    }
}
