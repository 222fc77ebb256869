//! PostgreSQL-backed document store.
//!
//! All containers share one table:
//!
//! ```sql
//! CREATE TABLE documents (
//!     container  TEXT        NOT NULL,
//!     id         TEXT        NOT NULL,
//!     body       JSONB       NOT NULL,
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     PRIMARY KEY (container, id)
//! );
//! ```
#![allow(clippy::needless_raw_string_hashes)]

use super::{DatabaseConfig, DocumentStore, StoreError, StoreResult, document_id};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::time::Duration;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ringside::store::{Database, DatabaseConfig};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), sqlx::Error> {
    ///     let config = DatabaseConfig::from_env();
    ///     let db = Database::new(&config).await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check if the database connection is healthy
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// [`DocumentStore`] over a single JSONB table
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `documents` table if it does not exist
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                container  TEXT        NOT NULL,
                id         TEXT        NOT NULL,
                body       JSONB       NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (container, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, container: &str, id: &str) -> StoreResult<Option<Value>> {
        let row = sqlx::query("SELECT body FROM documents WHERE container = $1 AND id = $2")
            .bind(container)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get::<Value, _>("body")))
    }

    async fn create(&self, container: &str, document: Value) -> StoreResult<Value> {
        let id = document_id(container, &document)?;

        let result = sqlx::query(
            r#"
            INSERT INTO documents (container, id, body)
            VALUES ($1, $2, $3)
            ON CONFLICT (container, id) DO NOTHING
            "#,
        )
        .bind(container)
        .bind(&id)
        .bind(&document)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists {
                container: container.to_string(),
                id,
            });
        }

        Ok(document)
    }

    async fn update(&self, container: &str, id: &str, document: Value) -> StoreResult<Value> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET body = $3, updated_at = NOW()
            WHERE container = $1 AND id = $2
            "#,
        )
        .bind(container)
        .bind(id)
        .bind(&document)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(container, id));
        }

        Ok(document)
    }

    async fn upsert(&self, container: &str, id: &str, document: Value) -> StoreResult<Value> {
        sqlx::query(
            r#"
            INSERT INTO documents (container, id, body)
            VALUES ($1, $2, $3)
            ON CONFLICT (container, id) DO UPDATE SET body = EXCLUDED.body, updated_at = NOW()
            "#,
        )
        .bind(container)
        .bind(id)
        .bind(&document)
        .execute(&self.pool)
        .await?;

        Ok(document)
    }

    async fn delete(&self, container: &str, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE container = $1 AND id = $2")
            .bind(container)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(container, id));
        }

        Ok(())
    }

    async fn list(&self, container: &str) -> StoreResult<Vec<Value>> {
        let rows = sqlx::query("SELECT body FROM documents WHERE container = $1 ORDER BY id")
            .bind(container)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| r.get::<Value, _>("body")).collect())
    }
}
