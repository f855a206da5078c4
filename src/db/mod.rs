//! Database module providing connection management, migrations, and queries.

pub mod gateway;
pub mod products;
pub mod relationships;
pub mod rules;

pub use gateway::{ResultsGateway, SuiteWithCases};

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::{Config, DatabaseConfig};
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration.
    pub async fn new(config: &Config) -> AppResult<Self> {
        Self::connect(&config.database).await
    }

    /// Connect using explicit database settings.
    pub async fn connect(database: &DatabaseConfig) -> AppResult<Self> {
        let mut options = ConnectOptions::new(database.url.clone());
        options
            .max_connections(database.max_connections)
            .min_connections(database.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to connect to database: {}", e)))?;

        info!(
            max_connections = database.max_connections,
            "Database pool created"
        );

        Ok(DbPool { conn })
    }

    /// Private in-memory SQLite database with all migrations applied.
    ///
    /// A single pooled connection keeps the database alive for the pool's lifetime.
    pub async fn in_memory() -> AppResult<Self> {
        let pool = Self::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        })
        .await?;
        pool.run_migrations().await?;
        Ok(pool)
    }

    /// Get access to the connection for executing queries.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Apply all pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to run migrations: {}", e)))
    }

    /// Check that the database answers.
    pub async fn ping(&self) -> AppResult<()> {
        self.conn
            .ping()
            .await
            .map_err(|e| AppError::Storage(format!("Database ping failed: {}", e)))
    }
}
