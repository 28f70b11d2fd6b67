//! The shared database handle.
//!
//! A `Database` wraps a sqlx `PgPool` capped at one connection, so every
//! manager and queryset built from it talks over the same session. Reads run
//! directly on the pool; writes run in their own transaction and commit
//! before returning.

use quill_core::{SqlValue, Statement};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use crate::error::{OrmError, Result};
use crate::row::{build_query, decode_row};
use crate::settings::DatabaseSettings;

/// A cloneable handle to the shared connection.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new().max_connections(1)
}

impl Database {
    /// Connects with the given settings.
    ///
    /// # Errors
    ///
    /// [`OrmError::Database`] when the backend fails.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let pool = pool_options()
            .connect_with(settings.to_connect_options())
            .await?;
        info!(host = %settings.host, database = %settings.name, "connected");
        Ok(Self { pool })
    }

    /// Connects to a `postgres://` URL.
    ///
    /// # Errors
    ///
    /// [`OrmError::Database`] when the backend fails.
    pub async fn connect_url(url: &str) -> Result<Self> {
        let pool = pool_options().connect(url).await?;
        info!("connected");
        Ok(Self { pool })
    }

    /// Creates a handle that connects on first use.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn connect_lazy(settings: &DatabaseSettings) -> Self {
        Self {
            pool: pool_options().connect_lazy_with(settings.to_connect_options()),
        }
    }

    /// Wraps an existing pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Closes the connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Runs a query and decodes every row.
    ///
    /// # Errors
    ///
    /// [`OrmError::Database`] when the backend fails, and
    /// [`OrmError::UnsupportedType`] for a column it cannot decode.
    pub async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<Vec<SqlValue>>> {
        debug!(sql = %statement.sql, params = ?statement.params, "fetching rows");
        let rows = build_query(statement).fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }

    /// Executes a write in its own transaction; returns the affected row count.
    ///
    /// # Errors
    ///
    /// [`OrmError::Database`] when the backend fails.
    pub async fn execute(&self, statement: &Statement) -> Result<u64> {
        debug!(sql = %statement.sql, params = ?statement.params, "executing statement");
        let mut tx = self.pool.begin().await?;
        let result = build_query(statement).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    /// Executes an `INSERT ... RETURNING id` and returns the new id.
    ///
    /// # Errors
    ///
    /// [`OrmError::Database`] when the backend fails or returns no integer id.
    pub async fn insert_returning_id(&self, statement: &Statement) -> Result<i64> {
        debug!(sql = %statement.sql, params = ?statement.params, "inserting row");
        let mut tx = self.pool.begin().await?;
        let row = build_query(statement).fetch_one(&mut *tx).await?;
        let id = decode_row(&row)?
            .first()
            .and_then(SqlValue::as_i64)
            .ok_or_else(|| OrmError::Database(sqlx::Error::ColumnNotFound("id".to_string())))?;
        tx.commit().await?;
        Ok(id)
    }

    /// Executes a DDL statement in its own transaction.
    ///
    /// # Errors
    ///
    /// [`OrmError::Database`] when the backend fails.
    pub async fn execute_ddl(&self, sql: &str) -> Result<()> {
        info!(sql = %sql, "executing DDL");
        self.execute(&Statement::raw(sql)).await?;
        Ok(())
    }

    /// Lists the tables of the `public` schema.
    ///
    /// # Errors
    ///
    /// [`OrmError::Database`] when the backend fails.
    pub async fn tables(&self) -> Result<Vec<String>> {
        let sql = "SELECT table_name::text FROM information_schema.tables \
                   WHERE table_schema = 'public' ORDER BY table_name;";
        debug!(sql = %sql, "listing tables");
        let tables = sqlx::query_scalar::<_, String>(sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(tables)
    }
}
