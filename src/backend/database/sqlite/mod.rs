use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

use crate::backend::database::DatabaseBackendConfig;
use crate::backend::Backend;
use crate::error::{AppError, AppResult};

pub mod schema;

mod car_impl;
mod driver_impl;

/// SQLite storage backend over a sqlx connection pool
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    async fn connect(config: &DatabaseBackendConfig) -> AppResult<Self> {
        config
            .validate()
            .map_err(AppError::Configuration)?;

        let url = if config.connection_url == ":memory:" {
            "sqlite::memory:".to_string()
        } else if config.connection_url.starts_with("sqlite:") {
            config.connection_url.clone()
        } else {
            format!("sqlite:{}", config.connection_url)
        };

        // An in-memory database exists per connection; a larger pool would
        // hand out empty databases.
        let max_connections = if config.is_memory_database() {
            1
        } else {
            config.max_connections
        };

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| AppError::Configuration(format!("Invalid SQLite URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to SQLite: {}", e)))?;

        Ok(Self { pool })
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Health check failed: {}", e)))?;

        Ok(())
    }

    async fn init_schema(&self) -> AppResult<()> {
        schema::init_schema(&self.pool).await
    }

    async fn cleanup(&self) -> AppResult<()> {
        self.pool.close().await;
        Ok(())
    }
}
