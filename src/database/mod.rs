// ABOUTME: SQLite storage for registered clients, tokens, and client-token associations
// ABOUTME: Owns the connection pool, schema migration, and transaction entry point
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! A single SQLite pool backs the Client Directory, the Client-Token
//! Association Store, and the bundled Token Service. Every protocol write goes
//! through [`Database::begin`] so the steps of one endpoint invocation share a
//! transaction.

mod client_tokens;
mod clients;
/// RAII transaction guard and lock-contention retry
pub mod transactions;

pub use client_tokens::{ClientTokenRepository, SqliteClientTokenRepository};
pub use clients::{ClientRepository, NewClient, SqliteClientRepository};
pub use transactions::{retry_transaction, SqliteTransactionGuard, TransactionGuard};

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::fs;
use tracing::{debug, info};

use crate::constants::storage;
use crate::errors::{AppError, AppResult};

/// Connection pool plus schema management
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database at `database_url` and migrate it
    ///
    /// `sqlite::memory:` URLs get a single long-lived connection, since every
    /// in-memory connection would otherwise see its own empty database.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unparsable URL, or a storage
    /// error if the database cannot be opened or migrated
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                AppError::config(format!("Invalid database URL '{database_url}'")).with_source(e)
            })?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(storage::BUSY_TIMEOUT_SECS));

        let in_memory = is_in_memory(database_url);
        if !in_memory {
            ensure_parent_dir(options.get_filename()).await?;
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(8)
        };

        let pool = pool_options.connect_with(options).await?;
        let database = Self { pool };
        database.migrate().await?;

        info!(in_memory = in_memory, "Database ready");
        Ok(database)
    }

    /// Get a reference to the database pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Begin a guarded transaction
    ///
    /// # Errors
    ///
    /// Returns a storage error if no connection can be acquired
    pub async fn begin(&self) -> AppResult<SqliteTransactionGuard<'static>> {
        let tx = self.pool.begin().await?;
        Ok(TransactionGuard::new(tx))
    }

    /// Create all tables and indexes (idempotent)
    ///
    /// # Errors
    ///
    /// Returns a storage error if any statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_clients().await?;
        self.migrate_tokens().await?;
        self.migrate_client_tokens().await?;
        debug!("Database migrations applied");
        Ok(())
    }

    async fn migrate_clients(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS oauth2_clients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                client_id TEXT NOT NULL UNIQUE,
                client_secret TEXT NOT NULL,
                name TEXT NOT NULL,
                redirect_uri TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'ACTIVE',
                date_created DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn migrate_tokens(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS oauth2_tokens (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                token_hash TEXT NOT NULL UNIQUE,
                token_type TEXT NOT NULL,
                user_ref INTEGER NOT NULL,
                date_created DATETIME NOT NULL,
                date_expired DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_oauth2_tokens_expired ON oauth2_tokens(date_expired)",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn migrate_client_tokens(&self) -> AppResult<()> {
        // token_ref has no foreign key: tokens may live in an external token service
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS oauth2_client_tokens (
                token_ref INTEGER PRIMARY KEY,
                client_ref INTEGER NOT NULL REFERENCES oauth2_clients(id) ON DELETE CASCADE
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_oauth2_client_tokens_client ON oauth2_client_tokens(client_ref)",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

async fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    fs::create_dir_all(parent).await.map_err(|e| {
        AppError::config(format!(
            "Cannot create database directory {}",
            parent.display()
        ))
        .with_source(e)
    })
}
