//! PostgreSQL client
//!
//! Connection pooling and low-level query helpers for the record store.

use crate::config::schema::DatabaseConfig;
use crate::domain::{Result, ScribeError};
use deadpool_postgres::{Config as PoolConfig, Manager, ManagerConfig, Pool, RecyclingMethod};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::{NoTls, Row};

/// Pooled PostgreSQL client
///
/// Wraps a deadpool connection pool and provides query/execute helpers with
/// the configured statement timeout applied per checkout.
pub struct PostgresClient {
    pool: Pool,
    config: DatabaseConfig,
}

impl PostgresClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string does not parse or the pool
    /// cannot be built.
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        let pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .parse()
            .map_err(|e| {
                ScribeError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
            })?;

        let mut pool_config = PoolConfig::new();
        pool_config.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let manager = Manager::from_config(pg_config, NoTls, pool_config.manager.unwrap());

        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .create_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .recycle_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .build()
            .map_err(|e| ScribeError::Storage(format!("Failed to create connection pool: {e}")))?;

        Ok(Self { pool, config })
    }

    /// Test the connection by executing a trivial query
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| ScribeError::Storage(format!("Connection test failed: {e}")))?;

        tracing::info!("PostgreSQL connection test successful");
        Ok(())
    }

    /// Ensure the schema exists by running the embedded migration
    ///
    /// The migration is idempotent; tables and indexes are created only if
    /// absent.
    pub async fn ensure_schema(&self) -> Result<()> {
        let client = self.get_connection().await?;

        let migration_sql = include_str!("../../../migrations/001_initial_schema.sql");

        client
            .batch_execute(migration_sql)
            .await
            .map_err(|e| ScribeError::Storage(format!("Failed to execute migration: {e}")))?;

        tracing::info!("PostgreSQL schema initialized successfully");
        Ok(())
    }

    /// Get a connection from the pool
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| {
            ScribeError::Storage(format!("Failed to get connection from pool: {e}"))
        })
    }

    /// Execute a query and return all rows
    pub async fn query(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Row>> {
        let client = self.checkout_with_timeout().await?;

        client
            .query(query, params)
            .await
            .map_err(|e| ScribeError::Storage(format!("Query failed: {e}")))
    }

    /// Execute a query expected to return at most one row
    pub async fn query_opt(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Option<Row>> {
        let client = self.checkout_with_timeout().await?;

        client
            .query_opt(query, params)
            .await
            .map_err(|e| ScribeError::Storage(format!("Query failed: {e}")))
    }

    /// Execute a query expected to return exactly one row
    pub async fn query_one(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Row> {
        let client = self.checkout_with_timeout().await?;

        client
            .query_one(query, params)
            .await
            .map_err(|e| ScribeError::Storage(format!("Query failed: {e}")))
    }

    /// Execute a statement and return the number of affected rows
    pub async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<u64> {
        let client = self.checkout_with_timeout().await?;

        client
            .execute(statement, params)
            .await
            .map_err(|e| ScribeError::Storage(format!("Statement execution failed: {e}")))
    }

    async fn checkout_with_timeout(&self) -> Result<deadpool_postgres::Object> {
        let client = self.get_connection().await?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client
            .execute(&timeout_query, &[])
            .await
            .map_err(|e| ScribeError::Storage(format!("Failed to set statement timeout: {e}")))?;

        Ok(client)
    }

    /// Connection string with credentials redacted, for logs and status
    /// output
    pub fn connection_string_safe(&self) -> String {
        self.config
            .connection_string
            .expose_secret()
            .split('@')
            .next_back()
            .map(|s| format!("postgresql://***@{s}"))
            .unwrap_or_else(|| "postgresql://***".to_string())
    }

    /// Current pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}
