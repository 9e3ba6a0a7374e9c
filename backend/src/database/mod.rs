//! Module for database connection setup.
//!
//! This module is responsible for initializing the database connection pool
//! and applying the bundled schema.

use crate::config::Config;
use anyhow::{Context, Result};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::time::Duration;
use tracing::info;

pub mod models;

#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    /// Initializes the database connection pool.
    pub async fn new(config: &Config) -> Result<Self> {
        Self::connect(
            &config.database_url,
            config.max_connections,
            Duration::from_secs(config.acquire_timeout_seconds),
        )
        .await
    }

    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await
            .with_context(|| format!("failed to connect to {}", database_url))?;

        Ok(Database { pool })
    }

    /// Applies the migrations under `backend/migrations`.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("failed to apply migrations")?;
        info!("Database schema is up to date");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed.");
    }
}

/// Single-connection in-memory database with the schema applied.
#[cfg(test)]
pub(crate) async fn test_database() -> Database {
    // Every in-memory connection is its own database, so keep exactly one.
    let db = Database::connect("sqlite::memory:", 1, Duration::from_secs(3))
        .await
        .unwrap();
    db.migrate().await.unwrap();
    db
}
